//! Geometry model for regions of interest and tiling grids.
//!
//! The coverage selector works on two inputs that share a coordinate
//! reference system:
//!
//! - [`Region`]: the user's area of interest, reduced to a planar union
//! - [`Grid`]: the fixed satellite tiling grid, one [`Tile`] per cell
//!
//! Readers for the on-disk formats accepted by the CLI live in [`reader`].
//! No reprojection happens here; callers normalise both inputs to the same
//! [`Crs`] beforehand.

mod error;
pub mod reader;
mod types;

pub use error::{GeometryError, GeometryResult};
pub use reader::{read_grid, read_region};
pub use types::{Crs, Grid, Region, Tile};
