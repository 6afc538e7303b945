use std::fmt::{self, Display, Formatter};

/// Availability of a content item as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Availability {
    /// Already present in the local library.
    Available,
    /// Missing and requestable.
    NotAvailable,
    /// A request was submitted and the service has not answered yet.
    RequestPending,
    /// The service accepted a request for this item.
    Requested,
    /// The last submission failed; transient, settles to `NotAvailable`.
    RequestFailed,
}

impl Availability {
    /// Only items in this state expose a request affordance.
    pub fn is_requestable(self) -> bool {
        matches!(self, Availability::NotAvailable)
    }

    /// Collapse transient states into the state the item rests in.
    pub fn settle(self) -> Self {
        match self {
            Availability::RequestFailed => Availability::NotAvailable,
            other => other,
        }
    }

    /// Derive availability from the service's media status and whether the
    /// item is linked to a local library entry.
    pub fn derive(status: Option<MediaStatus>, in_library: bool) -> Self {
        if in_library {
            return Availability::Available;
        }
        match status {
            Some(MediaStatus::Available | MediaStatus::PartiallyAvailable) => {
                Availability::Available
            }
            Some(MediaStatus::Pending | MediaStatus::Processing) => {
                Availability::Requested
            }
            Some(MediaStatus::Unknown) | None => Availability::NotAvailable,
        }
    }
}

impl Display for Availability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Availability::Available => "Available",
            Availability::NotAvailable => "Not available",
            Availability::RequestPending => "Request pending",
            Availability::Requested => "Requested",
            Availability::RequestFailed => "Request failed",
        };
        f.write_str(label)
    }
}

/// Media status codes reported by the request service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaStatus {
    Unknown = 1,
    Pending = 2,
    Processing = 3,
    PartiallyAvailable = 4,
    Available = 5,
}

impl MediaStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => MediaStatus::Pending,
            3 => MediaStatus::Processing,
            4 => MediaStatus::PartiallyAvailable,
            5 => MediaStatus::Available,
            _ => MediaStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_link_wins_over_status() {
        assert_eq!(
            Availability::derive(Some(MediaStatus::Unknown), true),
            Availability::Available
        );
    }

    #[test]
    fn status_codes_map_onto_availability() {
        let derive = |code| Availability::derive(Some(MediaStatus::from_code(code)), false);
        assert_eq!(derive(5), Availability::Available);
        assert_eq!(derive(4), Availability::Available);
        assert_eq!(derive(3), Availability::Requested);
        assert_eq!(derive(2), Availability::Requested);
        assert_eq!(derive(1), Availability::NotAvailable);
        assert_eq!(derive(9), Availability::NotAvailable);
        assert_eq!(Availability::derive(None, false), Availability::NotAvailable);
    }

    #[test]
    fn failed_requests_become_requestable_again() {
        assert_eq!(
            Availability::RequestFailed.settle(),
            Availability::NotAvailable
        );
        assert!(Availability::RequestFailed.settle().is_requestable());
        assert!(!Availability::Requested.is_requestable());
    }
}
