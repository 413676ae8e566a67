//! # Spatial Index
//!
//! Uniform-grid broad phase plus exact circle tests.
//!
//! ## Design Philosophy
//!
//! - One explicit radius per body; loose legacy size fields are resolved
//!   once at the boundary by [`LegacyShape`]
//! - Queries are deterministic: results are sorted by [`BodyId`]
//! - The grid is rebuilt every tick instead of tracked incrementally

mod body;
mod cell;
mod collision;
mod grid;

pub use body::{BodyId, Circle, LegacyShape, DEFAULT_BODY_RADIUS, MIN_BODY_RADIUS};
pub use cell::{CellKey, CellRange};
pub use collision::{check_collision, penetration};
pub use grid::{SpatialIndex, DEFAULT_CELL_SIZE, MAX_CELLS_PER_BODY, MIN_CELL_SIZE};
