//! # VOIDLINE Shared
//!
//! Plain value types used by every crate in the workspace.
//!
//! ## RULE
//!
//! This crate holds data and arithmetic only. No randomness, no
//! configuration, no logging.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Rect, Vec2};
