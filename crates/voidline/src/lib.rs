//! # VOIDLINE
//!
//! Ties generation and simulation together for one zone at a time.
//!
//! ## Flow
//!
//! ```text
//! act seed + zone index
//!        │
//!        ▼
//! ZoneSeed::for_zone ──> ZoneGenerator::generate ──> Zone
//!                                                     │
//!                                                     ▼
//!                                   ZoneSession (index rebuilt every tick)
//! ```
//!
//! ## Modules
//!
//! - `session`: zone ownership, dynamic bodies and per-tick queries

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod session;

// Re-export the layers
pub use voidline_core as core;
pub use voidline_procedural as procedural;

pub use session::{SessionConfig, TickStats, TickStatsAccumulator, ZoneSession, DYNAMIC_BODY_GROUP};
