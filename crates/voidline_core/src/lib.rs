//! # VOIDLINE Core
//!
//! Deterministic building blocks shared by generation and simulation:
//! - [`ZoneRng`]: seeded xorshift32 stream with weighted picks and forks
//! - [`SpatialIndex`]: uniform-grid index for circle proximity queries
//!
//! ## Architecture Rules
//!
//! 1. **No hidden entropy** - every random draw comes from an explicit seed
//! 2. **Same inputs, same bits** - query results are sorted, never hash-ordered
//! 3. **Recoverable misuse** - bad radii and unknown ids never panic
//!
//! ## Example
//!
//! ```rust,ignore
//! use voidline_core::{ZoneRng, ZoneSeed};
//!
//! let mut rng = ZoneRng::new(ZoneSeed::new(12345));
//! let roll = rng.range(0.0, 10.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod rng;
pub mod spatial;

pub use rng::{Weighted, ZoneRng, ZoneSeed};
pub use spatial::{check_collision, BodyId, Circle, LegacyShape, SpatialIndex};
