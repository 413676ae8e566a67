//! # VOIDLINE Procedural Generation
//!
//! Deterministic zone generation: the same tier, seed and options always
//! produce the same [`Zone`], bit for bit.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: one explicit seed, one stream per phase
//! 2. **Bounded**: every entity list is capped, every search has an attempt budget
//! 3. **Infallible**: bad tables fall back to defaults, crowded layouts shrink
//! 4. **Immutable output**: the zone is assembled once and handed over whole
//!
//! ## Core Components
//!
//! - `TierConfig` / `TuningTable` / `PackTemplateTable`: TOML-loadable tables
//! - `ZoneGenerator`: regular zones and boss arenas
//! - `Zone`: spawns, obstacles, decorations, POIs, objective, exits
//! - `ZoneWorker`: background generation over crossbeam channels
//!
//! ## Example
//!
//! ```rust,ignore
//! use voidline_procedural::{GenerateOptions, TierConfig, ZoneGenerator};
//! use voidline_core::ZoneSeed;
//!
//! let generator = ZoneGenerator::default();
//! let zone = generator.generate(&TierConfig::asteroid_belt(), ZoneSeed::new(12345), &GenerateOptions::at_depth(1));
//! println!("{:?}", zone.census());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ambient;
mod boss;
pub mod branch;
pub mod config;
pub mod density;
pub mod error;
pub mod generator;
pub mod objective;
pub(crate) mod placement;
pub mod worker;
pub mod zone;

pub use ambient::danger_tier;
pub use branch::{route_terms, BRANCH_EXIT_MIN_DEPTH};
pub use config::{
    ConfigTable, Difficulty, DensityMultipliers, PackComposition, PackTemplate, PackTemplateTable, SizeRange,
    TierConfig, TuningTable, ZoneModifier,
};
pub use density::{Budgets, Densities};
pub use error::{ConfigError, ConfigResult, WorkerError, WorkerResult};
pub use generator::{GenerateOptions, ZoneGenerator};
pub use objective::{eligible_objectives, ADVANCED_OBJECTIVE_DEPTH, OBJECTIVE_MIN_DEPTH};
pub use placement::pois::{archetypes_at, POI_RADIUS};
pub use placement::resources::resource_yield;
pub use worker::{Ticket, ZoneReady, ZoneShape, ZoneWorker};
pub use zone::{Obstacle, ObstacleKind, Zone, ZoneCensus};
