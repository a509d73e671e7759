//! Sentinel Mirror - region-driven mirroring of Sentinel imagery products
//!
//! This library resolves the satellite products that cover an arbitrary
//! region of interest and mirrors them from the Copernicus Data Space object
//! store into a local directory, skipping products that are already complete.
//!
//! # Pipeline
//!
//! ```text
//! Region + Grid ──► coverage::select ──► TileSelection
//!                                            │
//! SearchQuery ──► query::build ──► FilterExpression
//!                                            │
//!                         catalog::CatalogResolver (proxy failover)
//!                                            │
//!                                    Vec<ProductPath>
//!                                            │
//!                         mirror::MirrorReconciler ──► local mirror
//! ```
//!
//! [`app::MirrorSession`] wires the stages together from a single
//! [`app::AppConfig`].

pub mod app;
pub mod catalog;
pub mod config;
pub mod coverage;
pub mod geometry;
pub mod logging;
pub mod mirror;
pub mod query;
pub mod store;

/// Library version, as declared in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
