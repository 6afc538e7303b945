//! # Marquee Core
//!
//! Catalog synchronization and request workflow engine.
//!
//! Marquee augments a media-library interface with browsing of external
//! catalog entities (networks and studios) and lets the user request missing
//! content from a remote request service.
//!
//! ## Architecture
//!
//! - [`api`]: typed client for the remote service behind the [`CatalogApi`] trait
//! - [`catalog`]: the two reference catalogs and the periodic refresh scheduler
//! - [`content`]: on-demand content lists scoped to a catalog entity
//! - [`router`]: navigation path resolution and view dispatch
//! - [`requests`]: identity-keyed availability store and the request state machine
//! - [`notify`]: transient, auto-expiring user feedback
//! - [`engine`]: owns every component and exposes the lifecycle
//!
//! ```no_run
//! use marquee_core::Engine;
//! use marquee_config::ConfigLoader;
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let load = ConfigLoader::new().load()?;
//!     let engine = Engine::new(load.config)?;
//!     engine.start();
//!     let view = engine.navigate("#/network/213").await;
//!     println!("{view:?}");
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod catalog;
pub mod content;
pub mod engine;
pub mod error;
pub mod notify;
pub mod requests;
pub mod router;

#[cfg(feature = "testing")]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub mod testing;

pub use api::{CatalogApi, HttpCatalogClient, RequestAck};
pub use catalog::{
    CacheStatus, Catalog, CatalogCache, CatalogOutcome, RefreshReport,
    RefreshScheduler,
};
pub use content::ContentFetcher;
pub use engine::Engine;
pub use error::{ApiError, MarqueeError, Result};
pub use notify::{Notification, NotificationPhase, NotificationService, Severity};
pub use requests::{
    AvailabilityStore, Representation, RequestOutcome, RequestWorkflow,
    TransitionEvent,
};
pub use router::{
    ContentCard, ContentState, DetailView, EntityListing, RouteOutcome,
    ViewDescriptor, ViewRouter, resolve,
};

pub use marquee_model as model;
