//! Application session: the full region-to-mirror workflow.
//!
//! [`MirrorSession`] owns one catalog resolver and one mirror reconciler and
//! runs the stages in a fixed order:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        MirrorSession                           │
//! │                                                                │
//! │  1. coverage::select_with_report(region, grid) ─► TileSelection│
//! │  2. SearchRequest + region footprint ──────────► SearchQuery   │
//! │  3. CatalogResolver::resolve (proxy failover) ─► ProductPaths  │
//! │  4. MirrorReconciler::sync ────────────────────► local mirror  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Geometry and query validation errors are raised before the first
//! network request. [`AppConfig`] is derived from the user's
//! [`ConfigFile`](crate::config::ConfigFile) and carries everything needed
//! to connect the real transports.
//!
//! # Example
//!
//! ```ignore
//! use sentinel_mirror::app::{AppConfig, MirrorSession, SearchRequest};
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let session = MirrorSession::connect(&config)?;
//! let request = SearchRequest::from_config(&config, start, end);
//! let summary = session.run(&region, &grid, &request, &|event| println!("{:?}", event))?;
//! ```

mod config;
mod error;
mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{
    MirrorSession, ReqwestMirrorSession, Resolution, SearchRequest, SessionSummary,
};
