//! Reference catalogs (networks and studios) and their refresh cycle.

pub mod cache;
pub mod scheduler;

pub use cache::{
    CacheStatus, Catalog, CatalogCache, CatalogOutcome, RefreshReport,
};
pub use scheduler::RefreshScheduler;
