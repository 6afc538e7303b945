use marquee_config::{ConfigGuardRailError, ConfigLoadError};
use marquee_model::{Availability, CatalogKind, EntityId, IdentityKey, ModelError};
use thiserror::Error;

/// Failure talking to the remote request service.
///
/// No retry happens at the client layer; callers decide what a failure means.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("service responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("undecodable response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of the failed call, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short human readable reason, suitable for a notification body.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Status { status, message } if message.is_empty() => {
                format!("service responded {status}")
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(message) => message.clone(),
            ApiError::Decode { message, .. } => message.clone(),
            ApiError::InvalidRequest(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode {
                endpoint: err
                    .url()
                    .map(|url| url.path().to_string())
                    .unwrap_or_default(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum MarqueeError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{kind} entity {id} is not in the local catalog")]
    NotFound { kind: CatalogKind, id: EntityId },

    #[error("a request for {0} is already in flight")]
    DuplicateSubmission(IdentityKey),

    #[error("{key} cannot be requested while {availability}")]
    NotRequestable {
        key: IdentityKey,
        availability: Availability,
    },

    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error("configuration rejected: {0}")]
    InvalidConfig(#[from] ConfigGuardRailError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MarqueeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_prefers_service_message() {
        let err = ApiError::Status {
            status: 409,
            message: "already requested".into(),
        };
        assert_eq!(err.status_code(), Some(409));
        assert_eq!(err.reason(), "already requested");

        let bare = ApiError::Status {
            status: 502,
            message: String::new(),
        };
        assert_eq!(bare.reason(), "service responded 502");
        assert_eq!(ApiError::Transport("refused".into()).status_code(), None);
    }
}
