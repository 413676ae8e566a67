//! # Generation Tables
//!
//! Read-only inputs to the generator:
//! - [`TierConfig`]: what a tier looks like (densities, sizes, type pools)
//! - [`TuningTable`]: global multipliers, hard caps and distances
//! - [`PackTemplateTable`]: how enemies are grouped into packs
//!
//! All tables deserialize from TOML with every field defaulted. Values
//! that are present but unusable (negative densities, NaN distances,
//! inverted ranges) are repaired by `sanitized()` at the read site, so a
//! malformed table degrades the zone instead of failing generation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use voidline_procedural::config::{ConfigTable, TierConfig};
//!
//! let tier = TierConfig::load_or_default("data/tiers/belt.toml");
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use voidline_core::{Weighted, ZoneRng};

use crate::error::{ConfigError, ConfigResult};
use crate::zone::{
    BossKind, DecorationKind, EliteAffix, EnemyKind, Hazard, HazardKind, ObstacleClass,
};

// =============================================================================
// SANITIZERS
// =============================================================================

/// Finite and non-negative, else `default`.
#[inline]
pub(crate) fn sanitize_multiplier(value: f32, default: f32) -> f32 {
    if value.is_finite() && value >= 0.0 { value } else { default }
}

/// Finite and strictly positive, else `default`.
#[inline]
pub(crate) fn sanitize_positive(value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { default }
}

/// Clamped to `[0, 1]`; NaN becomes `default`.
#[inline]
pub(crate) fn sanitize_chance(value: f32, default: f32) -> f32 {
    if value.is_nan() { default } else { value.clamp(0.0, 1.0) }
}

/// Drops entries with unusable weights.
fn sanitize_pool<T: Clone>(pool: &[Weighted<T>]) -> Vec<Weighted<T>> {
    pool.iter()
        .filter(|entry| entry.weight.is_finite() && entry.weight > 0.0)
        .cloned()
        .collect()
}

// =============================================================================
// LOADING
// =============================================================================

/// Shared loading behavior of every table.
pub trait ConfigTable: DeserializeOwned + Default {
    /// Table name used in log lines.
    const KIND: &'static str;

    /// Rejects tables that parsed but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    fn validate(&self) -> ConfigResult<()>;

    /// Parses and validates a table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if validation fails.
    fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let table: Self = toml::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    /// Reads, parses and validates a table file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`from_toml_str`](Self::from_toml_str).
    fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Like [`load`](Self::load), falling back to defaults on any error.
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(table = Self::KIND, path = %path.display(), error = %err, "using default table");
                Self::default()
            }
        }
    }
}

// =============================================================================
// RUN OPTIONS
// =============================================================================

/// Difficulty lane chosen for the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Baseline.
    #[default]
    Normal,
    /// Denser and more elites.
    Veteran,
    /// Densest.
    Nightmare,
}

impl Difficulty {
    /// Depth-equivalent danger added by this lane.
    #[must_use]
    pub const fn danger_bonus(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Veteran => 2,
            Self::Nightmare => 4,
        }
    }
}

/// Per-category density multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityMultipliers {
    /// Regular enemies.
    pub enemies: f32,
    /// Elites.
    pub elites: f32,
    /// Obstacles.
    pub obstacles: f32,
    /// Decorations.
    pub decorations: f32,
}

impl Default for DensityMultipliers {
    fn default() -> Self {
        Self::ONE
    }
}

impl DensityMultipliers {
    /// Identity.
    pub const ONE: Self = Self { enemies: 1.0, elites: 1.0, obstacles: 1.0, decorations: 1.0 };

    const fn with(enemies: f32, elites: f32, obstacles: f32, decorations: f32) -> Self {
        Self { enemies, elites, obstacles, decorations }
    }

    fn sanitized(self) -> Self {
        Self {
            enemies: sanitize_multiplier(self.enemies, 1.0),
            elites: sanitize_multiplier(self.elites, 1.0),
            obstacles: sanitize_multiplier(self.obstacles, 1.0),
            decorations: sanitize_multiplier(self.decorations, 1.0),
        }
    }
}

/// Run modifiers that reshape zone density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneModifier {
    /// More enemies.
    Swarming,
    /// More elites.
    EliteHunt,
    /// More cover.
    Fortified,
    /// More obstacles, mostly mines.
    Minefield,
    /// Sparse obstacles and backdrop.
    Barren,
}

impl ZoneModifier {
    /// Density multipliers applied by this modifier.
    #[must_use]
    pub const fn multipliers(self) -> DensityMultipliers {
        match self {
            Self::Swarming => DensityMultipliers::with(1.5, 1.0, 1.0, 1.0),
            Self::EliteHunt => DensityMultipliers::with(1.0, 2.0, 1.0, 1.0),
            Self::Fortified => DensityMultipliers::with(1.0, 1.0, 1.4, 1.0),
            Self::Minefield => DensityMultipliers::with(1.0, 1.0, 1.2, 1.0),
            Self::Barren => DensityMultipliers::with(1.0, 1.0, 0.6, 0.5),
        }
    }
}

// =============================================================================
// TIER CONFIG
// =============================================================================

/// Inclusive range of a zone dimension. `min == max` means fixed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 2400.0, max: 3200.0 }
    }
}

impl SizeRange {
    /// Range with both bounds equal.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    /// Creates a range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a size. Fixed ranges consume no randomness.
    pub fn sample(&self, rng: &mut ZoneRng) -> f32 {
        if self.min == self.max {
            self.min
        } else {
            rng.range(self.min, self.max)
        }
    }

    fn sanitized(self, fallback: Self) -> Self {
        let min = sanitize_positive(self.min, fallback.min);
        let max = sanitize_positive(self.max, fallback.max);
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }
}

/// Everything that distinguishes one tier (biome) from another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Tier name.
    pub name: String,
    /// Biome id copied into every zone.
    pub biome: String,
    /// Zone width range.
    pub width: SizeRange,
    /// Zone height range.
    pub height: SizeRange,
    /// Regular enemies per square unit.
    pub enemy_density: f32,
    /// Elites per square unit.
    pub elite_density: f32,
    /// Obstacles per square unit.
    pub obstacle_density: f32,
    /// Decorations per square unit.
    pub decoration_density: f32,
    /// Enemy types.
    pub enemy_pool: Vec<Weighted<EnemyKind>>,
    /// Elite affixes.
    pub elite_affixes: Vec<Weighted<EliteAffix>>,
    /// Obstacle classes for clusters and scatter.
    pub obstacle_pool: Vec<Weighted<ObstacleClass>>,
    /// Mine detonation damage.
    pub mine_damage: f32,
    /// Hazards that can replace scatter obstacles.
    pub hazards: Vec<Weighted<Hazard>>,
    /// Chance a scatter obstacle becomes a hazard.
    pub hazard_chance: f32,
    /// Backdrop elements.
    pub decoration_pool: Vec<Weighted<DecorationKind>>,
    /// Boss of this tier.
    pub boss: BossKind,
    /// Edge length of the square boss arena.
    pub boss_arena_size: f32,
    /// Entry flavor text.
    pub ambient_lines: Vec<String>,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self::asteroid_belt()
    }
}

impl ConfigTable for TierConfig {
    const KIND: &'static str = "tier";

    fn validate(&self) -> ConfigResult<()> {
        if self.enemy_pool.is_empty() {
            return Err(ConfigError::Invalid(format!("tier '{}' has an empty enemy pool", self.name)));
        }
        if self.obstacle_pool.is_empty() {
            return Err(ConfigError::Invalid(format!("tier '{}' has an empty obstacle pool", self.name)));
        }
        Ok(())
    }
}

impl TierConfig {
    /// Default boss arena edge length.
    pub const DEFAULT_BOSS_ARENA: f32 = 1600.0;

    /// Open rock field. The gentle starting tier.
    #[must_use]
    pub fn asteroid_belt() -> Self {
        Self {
            name: "Asteroid Belt".into(),
            biome: "asteroid_belt".into(),
            width: SizeRange::new(2400.0, 3200.0),
            height: SizeRange::new(1600.0, 2200.0),
            enemy_density: 8.0e-6,
            elite_density: 6.0e-7,
            obstacle_density: 2.4e-5,
            decoration_density: 1.6e-5,
            enemy_pool: vec![
                Weighted::new(EnemyKind::Drone, 5.0),
                Weighted::new(EnemyKind::Raider, 3.0),
                Weighted::new(EnemyKind::Swarmer, 2.0),
            ],
            elite_affixes: vec![
                Weighted::new(EliteAffix::Shielded, 3.0),
                Weighted::new(EliteAffix::Hasted, 2.0),
                Weighted::new(EliteAffix::Regenerating, 1.0),
            ],
            obstacle_pool: vec![
                Weighted::new(ObstacleClass::Asteroid, 6.0),
                Weighted::new(ObstacleClass::Debris, 2.0),
                Weighted::new(ObstacleClass::Mine, 1.0),
            ],
            mine_damage: 25.0,
            hazards: vec![Weighted::new(
                Hazard { kind: HazardKind::Radiation, damage: 6.0, hunts_player: false, pulse_interval: None },
                1.0,
            )],
            hazard_chance: 0.05,
            decoration_pool: vec![
                Weighted::new(DecorationKind::Starfield, 4.0),
                Weighted::new(DecorationKind::DustCloud, 3.0),
                Weighted::new(DecorationKind::Beacon, 1.0),
            ],
            boss: BossKind::Warden,
            boss_arena_size: Self::DEFAULT_BOSS_ARENA,
            ambient_lines: vec![
                "Rocks tumble silently past the hull.".into(),
                "Mining beacons blink somewhere in the dust.".into(),
                "Sensor static hisses from the belt.".into(),
            ],
        }
    }

    /// Graveyard of wrecks. Dense cover and seeking hazards.
    #[must_use]
    pub fn derelict_fleet() -> Self {
        Self {
            name: "Derelict Fleet".into(),
            biome: "derelict_fleet".into(),
            width: SizeRange::new(2800.0, 3600.0),
            height: SizeRange::new(1800.0, 2400.0),
            enemy_density: 1.0e-5,
            elite_density: 9.0e-7,
            obstacle_density: 3.0e-5,
            decoration_density: 1.2e-5,
            enemy_pool: vec![
                Weighted::new(EnemyKind::Raider, 4.0),
                Weighted::new(EnemyKind::Gunship, 2.0),
                Weighted::new(EnemyKind::Sniper, 2.0),
                Weighted::new(EnemyKind::Bulwark, 1.0),
            ],
            elite_affixes: vec![
                Weighted::new(EliteAffix::Shielded, 2.0),
                Weighted::new(EliteAffix::Volatile, 2.0),
                Weighted::new(EliteAffix::Splitting, 1.0),
            ],
            obstacle_pool: vec![
                Weighted::new(ObstacleClass::Debris, 6.0),
                Weighted::new(ObstacleClass::Pillar, 2.0),
                Weighted::new(ObstacleClass::Mine, 2.0),
            ],
            mine_damage: 35.0,
            hazards: vec![
                Weighted::new(
                    Hazard { kind: HazardKind::PlasmaVent, damage: 18.0, hunts_player: false, pulse_interval: Some(2.5) },
                    2.0,
                ),
                Weighted::new(
                    Hazard { kind: HazardKind::SeekerCloud, damage: 10.0, hunts_player: true, pulse_interval: None },
                    1.0,
                ),
            ],
            hazard_chance: 0.08,
            decoration_pool: vec![
                Weighted::new(DecorationKind::Wreckage, 5.0),
                Weighted::new(DecorationKind::Starfield, 2.0),
                Weighted::new(DecorationKind::Beacon, 1.0),
            ],
            boss: BossKind::Dreadnought,
            boss_arena_size: 1800.0,
            ambient_lines: vec![
                "Hulls drift in formation, crews long gone.".into(),
                "A distress call loops on an ancient band.".into(),
                "Reactor glow flickers inside a broken spine.".into(),
            ],
        }
    }

    /// Deep nebula. Many elites and gravity wells.
    #[must_use]
    pub fn nebula_core() -> Self {
        Self {
            name: "Nebula Core".into(),
            biome: "nebula_core".into(),
            width: SizeRange::new(3200.0, 4000.0),
            height: SizeRange::new(2200.0, 2800.0),
            enemy_density: 1.1e-5,
            elite_density: 1.4e-6,
            obstacle_density: 2.0e-5,
            decoration_density: 2.2e-5,
            enemy_pool: vec![
                Weighted::new(EnemyKind::Swarmer, 4.0),
                Weighted::new(EnemyKind::Sniper, 2.0),
                Weighted::new(EnemyKind::Gunship, 2.0),
                Weighted::new(EnemyKind::Bulwark, 2.0),
            ],
            elite_affixes: vec![
                Weighted::new(EliteAffix::Volatile, 2.0),
                Weighted::new(EliteAffix::Regenerating, 2.0),
                Weighted::new(EliteAffix::Splitting, 2.0),
                Weighted::new(EliteAffix::Hasted, 1.0),
            ],
            obstacle_pool: vec![
                Weighted::new(ObstacleClass::Asteroid, 3.0),
                Weighted::new(ObstacleClass::Pillar, 1.0),
                Weighted::new(ObstacleClass::Mine, 2.0),
            ],
            mine_damage: 45.0,
            hazards: vec![
                Weighted::new(
                    Hazard { kind: HazardKind::GravityWell, damage: 4.0, hunts_player: false, pulse_interval: None },
                    2.0,
                ),
                Weighted::new(
                    Hazard { kind: HazardKind::Radiation, damage: 12.0, hunts_player: false, pulse_interval: Some(1.0) },
                    1.0,
                ),
            ],
            hazard_chance: 0.12,
            decoration_pool: vec![
                Weighted::new(DecorationKind::Nebula, 5.0),
                Weighted::new(DecorationKind::DustCloud, 2.0),
                Weighted::new(DecorationKind::Starfield, 1.0),
            ],
            boss: BossKind::Hivemind,
            boss_arena_size: 2000.0,
            ambient_lines: vec![
                "Ionized gas paints the canopy violet.".into(),
                "Something vast moves behind the clouds.".into(),
            ],
        }
    }

    /// Copy with every unusable value replaced by its documented default.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let fallback = Self::asteroid_belt();
        let mut enemy_pool = sanitize_pool(&self.enemy_pool);
        if enemy_pool.is_empty() {
            enemy_pool = fallback.enemy_pool;
        }
        let mut obstacle_pool = sanitize_pool(&self.obstacle_pool);
        if obstacle_pool.is_empty() {
            obstacle_pool = fallback.obstacle_pool;
        }
        let mut elite_affixes = sanitize_pool(&self.elite_affixes);
        if elite_affixes.is_empty() {
            elite_affixes = fallback.elite_affixes;
        }
        let mut decoration_pool = sanitize_pool(&self.decoration_pool);
        if decoration_pool.is_empty() {
            decoration_pool = fallback.decoration_pool;
        }

        Self {
            name: self.name.clone(),
            biome: self.biome.clone(),
            width: self.width.sanitized(fallback.width),
            height: self.height.sanitized(fallback.height),
            enemy_density: sanitize_multiplier(self.enemy_density, 0.0),
            elite_density: sanitize_multiplier(self.elite_density, 0.0),
            obstacle_density: sanitize_multiplier(self.obstacle_density, 0.0),
            decoration_density: sanitize_multiplier(self.decoration_density, 0.0),
            enemy_pool,
            elite_affixes,
            obstacle_pool,
            mine_damage: sanitize_multiplier(self.mine_damage, fallback.mine_damage),
            hazards: sanitize_pool(&self.hazards),
            hazard_chance: sanitize_chance(self.hazard_chance, 0.0),
            decoration_pool,
            boss: self.boss,
            boss_arena_size: sanitize_positive(self.boss_arena_size, Self::DEFAULT_BOSS_ARENA),
            ambient_lines: self.ambient_lines.clone(),
        }
    }
}

// =============================================================================
// TUNING TABLE
// =============================================================================

/// Density multipliers per difficulty lane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyLanes {
    /// Normal lane.
    pub normal: DensityMultipliers,
    /// Veteran lane.
    pub veteran: DensityMultipliers,
    /// Nightmare lane.
    pub nightmare: DensityMultipliers,
}

impl Default for DifficultyLanes {
    fn default() -> Self {
        Self {
            normal: DensityMultipliers::ONE,
            veteran: DensityMultipliers::with(1.25, 1.5, 1.1, 1.0),
            nightmare: DensityMultipliers::with(1.6, 2.0, 1.2, 1.0),
        }
    }
}

impl DifficultyLanes {
    /// Multipliers for a lane.
    #[must_use]
    pub const fn lane(&self, difficulty: Difficulty) -> DensityMultipliers {
        match difficulty {
            Difficulty::Normal => self.normal,
            Difficulty::Veteran => self.veteran,
            Difficulty::Nightmare => self.nightmare,
        }
    }
}

/// Ceiling applied to every per-zone entity cap.
pub const ENTITY_CAP_CEILING: u32 = 4096;

/// Ceiling applied to `poi_max`.
pub const POI_CEILING: u32 = 16;

/// Ceiling applied to `resource_nodes_max`.
pub const RESOURCE_NODE_CEILING: u32 = 32;

/// Ceiling applied to `attempts_per_member`.
pub const MEMBER_ATTEMPTS_CEILING: u32 = 64;

/// Ceiling applied to the size of a free pack.
pub const PACK_SIZE_CEILING: u32 = 32;

/// Global knobs shared by every tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningTable {
    /// Global override applied last.
    pub density: DensityMultipliers,
    /// Difficulty lanes.
    pub difficulty: DifficultyLanes,
    /// Ramp added per depth.
    pub depth_ramp_per_depth: f32,
    /// Ceiling of the ramp bonus.
    pub depth_ramp_cap: f32,
    /// Hard cap on regular enemies.
    pub max_enemy_spawns_per_zone: u32,
    /// Hard cap on elites.
    pub max_elite_spawns_per_zone: u32,
    /// Hard cap on obstacles of every kind.
    pub max_obstacles_per_zone: u32,
    /// Hard cap on decorations.
    pub max_decorations_per_zone: u32,
    /// Obstacle slots kept free for POIs, resource nodes and generators.
    pub obstacle_reserve: u32,
    /// Global zone size scale.
    pub map_scale: f32,
    /// Smallest allowed zone edge.
    pub min_zone_size: f32,
    /// Distance kept from map edges.
    pub edge_margin: f32,
    /// Minimum distance of spawns and nodes from the player start.
    pub spawn_clearance: f32,
    /// Minimum distance of spawns and nodes from any exit.
    pub exit_clearance: f32,
    /// Minimum distance of obstacles from the player start and exits.
    pub obstacle_clearance: f32,
    /// Minimum distance between regular enemies.
    pub enemy_spacing: f32,
    /// Minimum distance between elites.
    pub elite_spacing: f32,
    /// Minimum distance between resource nodes.
    pub resource_spacing: f32,
    /// Fewest points of interest.
    pub poi_min: u32,
    /// Most points of interest.
    pub poi_max: u32,
    /// Way-point jitter as a fraction of the shorter zone edge.
    pub poi_jitter: f32,
    /// Fewest resource nodes.
    pub resource_nodes_min: u32,
    /// Most resource nodes.
    pub resource_nodes_max: u32,
    /// Chance the vault exit is omitted below `vault_guaranteed_depth`.
    pub vault_skip_chance: f32,
    /// Depth from which the vault exit always appears.
    pub vault_guaranteed_depth: u32,
}

impl Default for TuningTable {
    fn default() -> Self {
        Self {
            density: DensityMultipliers::ONE,
            difficulty: DifficultyLanes::default(),
            depth_ramp_per_depth: 0.1,
            depth_ramp_cap: 1.0,
            max_enemy_spawns_per_zone: 80,
            max_elite_spawns_per_zone: 8,
            max_obstacles_per_zone: 220,
            max_decorations_per_zone: 160,
            obstacle_reserve: 16,
            map_scale: 1.0,
            min_zone_size: 800.0,
            edge_margin: 80.0,
            spawn_clearance: 300.0,
            exit_clearance: 200.0,
            obstacle_clearance: 150.0,
            enemy_spacing: 90.0,
            elite_spacing: 260.0,
            resource_spacing: 200.0,
            poi_min: 2,
            poi_max: 4,
            poi_jitter: 0.15,
            resource_nodes_min: 3,
            resource_nodes_max: 6,
            vault_skip_chance: 0.5,
            vault_guaranteed_depth: 6,
        }
    }
}

impl ConfigTable for TuningTable {
    const KIND: &'static str = "tuning";

    fn validate(&self) -> ConfigResult<()> {
        if self.poi_min > self.poi_max {
            return Err(ConfigError::Invalid(format!(
                "poi_min {} exceeds poi_max {}",
                self.poi_min, self.poi_max
            )));
        }
        if self.resource_nodes_min > self.resource_nodes_max {
            return Err(ConfigError::Invalid(format!(
                "resource_nodes_min {} exceeds resource_nodes_max {}",
                self.resource_nodes_min, self.resource_nodes_max
            )));
        }
        Ok(())
    }
}

impl TuningTable {
    /// Copy with every unusable value replaced by its documented default.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let (poi_min, poi_max) = ordered_within(self.poi_min, self.poi_max, POI_CEILING);
        let (resource_nodes_min, resource_nodes_max) =
            ordered_within(self.resource_nodes_min, self.resource_nodes_max, RESOURCE_NODE_CEILING);
        let max_obstacles_per_zone = self.max_obstacles_per_zone.min(ENTITY_CAP_CEILING);
        Self {
            density: self.density.sanitized(),
            difficulty: DifficultyLanes {
                normal: self.difficulty.normal.sanitized(),
                veteran: self.difficulty.veteran.sanitized(),
                nightmare: self.difficulty.nightmare.sanitized(),
            },
            depth_ramp_per_depth: sanitize_multiplier(self.depth_ramp_per_depth, d.depth_ramp_per_depth),
            depth_ramp_cap: sanitize_multiplier(self.depth_ramp_cap, d.depth_ramp_cap),
            max_enemy_spawns_per_zone: self.max_enemy_spawns_per_zone.min(ENTITY_CAP_CEILING),
            max_elite_spawns_per_zone: self.max_elite_spawns_per_zone.min(ENTITY_CAP_CEILING),
            max_obstacles_per_zone,
            max_decorations_per_zone: self.max_decorations_per_zone.min(ENTITY_CAP_CEILING),
            obstacle_reserve: self.obstacle_reserve.min(max_obstacles_per_zone),
            map_scale: sanitize_positive(self.map_scale, d.map_scale),
            min_zone_size: sanitize_positive(self.min_zone_size, d.min_zone_size),
            edge_margin: sanitize_multiplier(self.edge_margin, d.edge_margin),
            spawn_clearance: sanitize_multiplier(self.spawn_clearance, d.spawn_clearance),
            exit_clearance: sanitize_multiplier(self.exit_clearance, d.exit_clearance),
            obstacle_clearance: sanitize_multiplier(self.obstacle_clearance, d.obstacle_clearance),
            enemy_spacing: sanitize_multiplier(self.enemy_spacing, d.enemy_spacing),
            elite_spacing: sanitize_multiplier(self.elite_spacing, d.elite_spacing),
            resource_spacing: sanitize_multiplier(self.resource_spacing, d.resource_spacing),
            poi_min,
            poi_max,
            poi_jitter: sanitize_chance(self.poi_jitter, d.poi_jitter),
            resource_nodes_min,
            resource_nodes_max,
            vault_skip_chance: sanitize_chance(self.vault_skip_chance, d.vault_skip_chance),
            vault_guaranteed_depth: self.vault_guaranteed_depth,
        }
    }

    /// Saturating depth multiplier: `1 + min(depth * per_depth, cap)`.
    #[must_use]
    pub fn depth_ramp(&self, depth: u32) -> f32 {
        1.0 + (depth as f32 * self.depth_ramp_per_depth).min(self.depth_ramp_cap)
    }
}

const fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Ordered pair with both ends held at or below `ceiling`.
fn ordered_within(a: u32, b: u32, ceiling: u32) -> (u32, u32) {
    let (lo, hi) = ordered(a, b);
    (lo.min(ceiling), hi.min(ceiling))
}

// =============================================================================
// PACK TEMPLATES
// =============================================================================

/// Member composition of a pack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PackComposition {
    /// Exactly these members, in order. The first one is the anchor.
    Fixed {
        /// Member kinds.
        members: Vec<EnemyKind>,
    },
    /// A random size drawn from a type pool.
    Free {
        /// Fewest members.
        size_min: u32,
        /// Most members.
        size_max: u32,
        /// Kinds to draw from; empty means the tier's enemy pool.
        #[serde(default)]
        pool: Vec<EnemyKind>,
    },
}

/// One weighted pack template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackTemplate {
    /// Template name.
    pub name: String,
    /// Selection weight.
    pub weight: f32,
    /// Member composition.
    pub composition: PackComposition,
}

/// Pack grouping tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackTemplateTable {
    /// Fraction of placed enemies regrouped into packs.
    pub pack_fraction: f32,
    /// Minimum distance between members of one pack.
    pub member_spacing: f32,
    /// Largest distance of a member from its anchor.
    pub pack_radius: f32,
    /// Position attempts per member before it stays where it was.
    pub attempts_per_member: u32,
    /// Weighted templates.
    pub templates: Vec<PackTemplate>,
}

impl Default for PackTemplateTable {
    fn default() -> Self {
        Self {
            pack_fraction: 0.35,
            member_spacing: 40.0,
            pack_radius: 160.0,
            attempts_per_member: 8,
            templates: vec![
                PackTemplate {
                    name: "drone_escort".into(),
                    weight: 3.0,
                    composition: PackComposition::Fixed {
                        members: vec![EnemyKind::Gunship, EnemyKind::Drone, EnemyKind::Drone],
                    },
                },
                PackTemplate {
                    name: "raider_wing".into(),
                    weight: 2.0,
                    composition: PackComposition::Fixed {
                        members: vec![EnemyKind::Raider, EnemyKind::Raider, EnemyKind::Raider, EnemyKind::Sniper],
                    },
                },
                PackTemplate {
                    name: "mixed_swarm".into(),
                    weight: 3.0,
                    composition: PackComposition::Free { size_min: 3, size_max: 6, pool: Vec::new() },
                },
            ],
        }
    }
}

impl ConfigTable for PackTemplateTable {
    const KIND: &'static str = "packs";

    fn validate(&self) -> ConfigResult<()> {
        for template in &self.templates {
            match &template.composition {
                PackComposition::Fixed { members } if members.is_empty() => {
                    return Err(ConfigError::Invalid(format!("pack '{}' has no members", template.name)));
                }
                PackComposition::Free { size_min, size_max, .. } if size_min > size_max => {
                    return Err(ConfigError::Invalid(format!(
                        "pack '{}' size_min {} exceeds size_max {}",
                        template.name, size_min, size_max
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl PackTemplateTable {
    /// Copy with unusable values repaired and unusable templates dropped.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let templates = self
            .templates
            .iter()
            .filter(|t| t.weight.is_finite() && t.weight > 0.0)
            .filter_map(|t| {
                let composition = match &t.composition {
                    PackComposition::Fixed { members } if members.is_empty() => return None,
                    PackComposition::Free { size_min, size_max, pool } => {
                        let (size_min, size_max) = ordered_within(*size_min, *size_max, PACK_SIZE_CEILING);
                        PackComposition::Free { size_min, size_max, pool: pool.clone() }
                    }
                    fixed @ PackComposition::Fixed { .. } => fixed.clone(),
                };
                Some(PackTemplate { name: t.name.clone(), weight: t.weight, composition })
            })
            .collect();
        Self {
            pack_fraction: sanitize_chance(self.pack_fraction, d.pack_fraction),
            member_spacing: sanitize_multiplier(self.member_spacing, d.member_spacing),
            pack_radius: sanitize_positive(self.pack_radius, d.pack_radius),
            attempts_per_member: self.attempts_per_member.min(MEMBER_ATTEMPTS_CEILING),
            templates,
        }
    }

    /// Templates as weighted entries for [`ZoneRng::pick_weighted`].
    #[must_use]
    pub fn weighted(&self) -> Vec<Weighted<&PackTemplate>> {
        self.templates.iter().map(|t| Weighted::new(t, t.weight)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(TierConfig::asteroid_belt().validate().is_ok());
        assert!(TierConfig::derelict_fleet().validate().is_ok());
        assert!(TierConfig::nebula_core().validate().is_ok());
        assert!(TuningTable::default().validate().is_ok());
        assert!(PackTemplateTable::default().validate().is_ok());
    }

    #[test]
    fn test_depth_ramp_saturates() {
        let tuning = TuningTable::default();
        assert_eq!(tuning.depth_ramp(0), 1.0);
        assert!((tuning.depth_ramp(5) - 1.5).abs() < 1e-6);
        assert_eq!(tuning.depth_ramp(10), 2.0);
        assert_eq!(tuning.depth_ramp(500), 2.0);
    }

    #[test]
    fn test_size_range_repair() {
        let repaired = SizeRange::new(f32::NAN, -5.0).sanitized(SizeRange::new(100.0, 200.0));
        assert_eq!(repaired, SizeRange::new(100.0, 200.0));

        let swapped = SizeRange::new(900.0, 300.0).sanitized(SizeRange::default());
        assert_eq!(swapped, SizeRange::new(300.0, 900.0));
    }

    #[test]
    fn test_fixed_size_consumes_no_draws() {
        let mut rng = ZoneRng::new(voidline_core::ZoneSeed::new(5));
        assert_eq!(SizeRange::fixed(1234.0).sample(&mut rng), 1234.0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_tier_sanitize_fills_empty_pools() {
        let mut tier = TierConfig::nebula_core();
        tier.enemy_pool.clear();
        tier.obstacle_pool = vec![Weighted::new(ObstacleClass::Pillar, f32::NAN)];
        tier.enemy_density = -1.0;
        tier.hazard_chance = 7.0;

        let clean = tier.sanitized();
        assert!(!clean.enemy_pool.is_empty());
        assert_eq!(clean.obstacle_pool, TierConfig::asteroid_belt().obstacle_pool);
        assert_eq!(clean.enemy_density, 0.0);
        assert_eq!(clean.hazard_chance, 1.0);
    }

    #[test]
    fn test_tuning_sanitize() {
        let tuning = TuningTable {
            map_scale: 0.0,
            enemy_spacing: f32::NAN,
            poi_min: 5,
            poi_max: 1,
            obstacle_reserve: 999,
            ..TuningTable::default()
        };
        let clean = tuning.sanitized();
        assert_eq!(clean.map_scale, 1.0);
        assert_eq!(clean.enemy_spacing, TuningTable::default().enemy_spacing);
        assert_eq!((clean.poi_min, clean.poi_max), (1, 5));
        assert_eq!(clean.obstacle_reserve, clean.max_obstacles_per_zone);
    }

    #[test]
    fn test_tuning_sanitize_applies_ceilings() {
        let tuning = TuningTable {
            max_enemy_spawns_per_zone: u32::MAX,
            max_elite_spawns_per_zone: u32::MAX,
            max_obstacles_per_zone: u32::MAX,
            max_decorations_per_zone: u32::MAX,
            obstacle_reserve: u32::MAX,
            poi_min: u32::MAX,
            poi_max: u32::MAX,
            resource_nodes_max: u32::MAX,
            ..TuningTable::default()
        };
        let clean = tuning.sanitized();
        assert_eq!(clean.max_enemy_spawns_per_zone, ENTITY_CAP_CEILING);
        assert_eq!(clean.max_elite_spawns_per_zone, ENTITY_CAP_CEILING);
        assert_eq!(clean.max_obstacles_per_zone, ENTITY_CAP_CEILING);
        assert_eq!(clean.max_decorations_per_zone, ENTITY_CAP_CEILING);
        assert_eq!(clean.obstacle_reserve, ENTITY_CAP_CEILING);
        assert_eq!((clean.poi_min, clean.poi_max), (POI_CEILING, POI_CEILING));
        assert_eq!(clean.resource_nodes_max, RESOURCE_NODE_CEILING);

        let untouched = TuningTable::default();
        assert_eq!(untouched.sanitized(), untouched);
    }

    #[test]
    fn test_pack_sanitize_applies_ceilings() {
        let table = PackTemplateTable {
            attempts_per_member: u32::MAX,
            templates: vec![PackTemplate {
                name: "horde".into(),
                weight: 1.0,
                composition: PackComposition::Free { size_min: 2, size_max: u32::MAX, pool: Vec::new() },
            }],
            ..PackTemplateTable::default()
        };
        let clean = table.sanitized();
        assert_eq!(clean.attempts_per_member, MEMBER_ATTEMPTS_CEILING);
        assert_eq!(
            clean.templates[0].composition,
            PackComposition::Free { size_min: 2, size_max: PACK_SIZE_CEILING, pool: Vec::new() }
        );
    }

    #[test]
    fn test_modifier_multipliers() {
        assert_eq!(ZoneModifier::Swarming.multipliers().enemies, 1.5);
        assert_eq!(ZoneModifier::Barren.multipliers().decorations, 0.5);
        assert_eq!(DifficultyLanes::default().lane(Difficulty::Normal), DensityMultipliers::ONE);
    }
}
