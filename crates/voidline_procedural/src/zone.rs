//! # Zone Value Types
//!
//! Everything a generated zone contains. A [`Zone`] is assembled once at
//! the end of generation and never touched by the generator again; the
//! simulation only flips lifecycle flags (`active`, `killed`, `triggered`,
//! `cleared`, `collected`, `completed`).
//!
//! Entity categories are closed enums carrying only the fields they use.

use serde::{Deserialize, Serialize};
use voidline_core::spatial::{BodyId, Circle};
use voidline_core::ZoneSeed;
use voidline_shared::Vec2;

/// Body group used by [`Zone::colliders`].
pub const OBSTACLE_BODY_GROUP: u32 = 0;

// =============================================================================
// ENEMIES
// =============================================================================

/// Regular enemy archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Cheap fodder.
    Drone,
    /// Fast melee skirmisher.
    Raider,
    /// Slow, heavily armed.
    Gunship,
    /// Comes in numbers.
    Swarmer,
    /// Long-range.
    Sniper,
    /// Shield carrier.
    Bulwark,
}

/// How an enemy moves before it notices the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolStyle {
    /// Holds position.
    Idle,
    /// Drifts randomly inside the patrol radius.
    Wander,
    /// Orbits its spawn point.
    Circle,
    /// Stays near a point of interest.
    Guard,
}

/// Patrol contract handed to the AI.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    /// Movement pattern.
    pub style: PatrolStyle,
    /// Radius around the spawn point.
    pub radius: f32,
}

/// One regular enemy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemySpawn {
    /// World position.
    pub position: Vec2,
    /// Archetype.
    pub kind: EnemyKind,
    /// Pre-aggro movement.
    pub patrol: Patrol,
    /// Still participating in the simulation.
    pub active: bool,
    /// Destroyed by the player.
    pub killed: bool,
    /// Pack this enemy belongs to.
    pub pack_id: Option<u32>,
    /// Point of interest that injected this enemy.
    pub poi_id: Option<u32>,
}

impl EnemySpawn {
    /// Fresh spawn with initial lifecycle flags.
    #[must_use]
    pub const fn new(position: Vec2, kind: EnemyKind, patrol: Patrol) -> Self {
        Self { position, kind, patrol, active: true, killed: false, pack_id: None, poi_id: None }
    }
}

/// Modifiers carried by elite enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliteAffix {
    /// Regenerating shield.
    Shielded,
    /// Explodes on death.
    Volatile,
    /// Moves and fires faster.
    Hasted,
    /// Heals over time.
    Regenerating,
    /// Splits into drones on death.
    Splitting,
}

/// Elite enemy: a regular spawn plus an affix.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EliteSpawn {
    /// Underlying spawn.
    pub spawn: EnemySpawn,
    /// Elite modifier.
    pub affix: EliteAffix,
}

/// Boss archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    /// Capital ship.
    Dreadnought,
    /// Swarm controller.
    Hivemind,
    /// Fortress platform.
    Warden,
}

/// Boss encounter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BossSpawn {
    /// World position.
    pub position: Vec2,
    /// Archetype.
    pub kind: BossKind,
    /// Still participating in the simulation.
    pub active: bool,
    /// Destroyed by the player.
    pub killed: bool,
}

// =============================================================================
// OBSTACLES
// =============================================================================

/// Hazard flavors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    /// Damage-over-time field.
    Radiation,
    /// Periodic plasma discharge.
    PlasmaVent,
    /// Pulls ships in.
    GravityWell,
    /// Drifting mine swarm that follows the player.
    SeekerCloud,
}

/// Damaging area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hazard {
    /// Flavor.
    pub kind: HazardKind,
    /// Damage per hit or pulse.
    pub damage: f32,
    /// Moves toward the player.
    pub hunts_player: bool,
    /// Seconds between damage pulses; `None` means continuous.
    pub pulse_interval: Option<f32>,
}

impl Default for Hazard {
    fn default() -> Self {
        Self { kind: HazardKind::Radiation, damage: 8.0, hunts_player: false, pulse_interval: None }
    }
}

/// Mineable resource types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Common ore.
    Ore,
    /// Crystal.
    Crystal,
    /// Rare crystal.
    RareCrystal,
}

/// What a resource node yields when mined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceYield {
    /// Resource type.
    pub kind: ResourceKind,
    /// Yield multiplier.
    pub multiplier: f32,
    /// Chance of a secondary drop, zero for ore.
    pub bonus_drop_chance: f32,
}

/// Obstacle category. Damage and yield only exist where they apply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Rock.
    Asteroid,
    /// Wreckage.
    Debris,
    /// Indestructible cover.
    Pillar,
    /// Proximity mine.
    Mine {
        /// Detonation damage.
        damage: f32,
    },
    /// Damaging area.
    Hazard(Hazard),
    /// Mineable node.
    Resource(ResourceYield),
    /// Lockdown generator.
    Generator,
}

/// Obstacle classes a tier can scatter. Resource nodes, hazards and
/// generators are placed by their own passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleClass {
    /// Rock.
    Asteroid,
    /// Wreckage.
    Debris,
    /// Indestructible cover.
    Pillar,
    /// Proximity mine.
    Mine,
}

/// Static collider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Obstacle {
    /// World position.
    pub position: Vec2,
    /// Category.
    pub kind: ObstacleKind,
    /// Collision radius.
    pub radius: f32,
    /// Facing in radians.
    pub rotation: f32,
    /// Can be shot down.
    pub destructible: bool,
    /// Starting hit points; zero for indestructible obstacles.
    pub hit_points: f32,
}

impl Obstacle {
    /// Bounding circle.
    #[inline]
    #[must_use]
    pub const fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Returns true for hazard obstacles.
    #[inline]
    #[must_use]
    pub const fn is_hazard(&self) -> bool {
        matches!(self.kind, ObstacleKind::Hazard(_))
    }
}

// =============================================================================
// DECORATIONS
// =============================================================================

/// Cosmetic backdrop elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Distant star cluster.
    Starfield,
    /// Dust haze.
    DustCloud,
    /// Far-off hulk.
    Wreckage,
    /// Gas cloud.
    Nebula,
    /// Blinking nav beacon.
    Beacon,
}

/// Deepest decoration layer.
pub const MAX_DECORATION_LAYER: u8 = 3;

/// Cosmetic element. No collision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decoration {
    /// World position.
    pub position: Vec2,
    /// Look.
    pub kind: DecorationKind,
    /// Visual depth, `0..=MAX_DECORATION_LAYER`; 0 is nearest.
    pub layer: u8,
    /// Sprite scale.
    pub scale: f32,
    /// Rotation in radians.
    pub rotation: f32,
}

// =============================================================================
// POINTS OF INTEREST
// =============================================================================

/// Micro-encounter archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    /// Enemies ringed around a cache.
    GuardRing,
    /// Lightly guarded loot.
    Treasure,
    /// Idle enemies that wake up together.
    Ambush,
    /// Elite surrounded by cover.
    EliteArena,
    /// Rock cluster worth mining.
    MiningCluster,
    /// Wrecked ship with salvage.
    Derelict,
}

impl PoiKind {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GuardRing => "Guarded Cache",
            Self::Treasure => "Drifting Cache",
            Self::Ambush => "Silent Contacts",
            Self::EliteArena => "Champion's Ring",
            Self::MiningCluster => "Mineral Cluster",
            Self::Derelict => "Derelict Hulk",
        }
    }

    /// Map icon id.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::GuardRing => "poi_guard",
            Self::Treasure => "poi_cache",
            Self::Ambush => "poi_unknown",
            Self::EliteArena => "poi_skull",
            Self::MiningCluster => "poi_ore",
            Self::Derelict => "poi_wreck",
        }
    }
}

/// Loot granted when a point of interest is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PoiReward {
    /// Extra loot rolls.
    pub loot_rolls: u32,
    /// Loot quality multiplier.
    pub loot_multiplier: f32,
}

/// Structured encounter placed on the journey from spawn to exit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Poi {
    /// Index in [`Zone::pois`].
    pub id: u32,
    /// Center.
    pub position: Vec2,
    /// Trigger radius.
    pub radius: f32,
    /// Archetype.
    pub kind: PoiKind,
    /// Display label.
    pub label: String,
    /// Map icon id.
    pub icon: String,
    /// Reward, if any.
    pub reward: Option<PoiReward>,
    /// Indices into [`Zone::enemy_spawns`] injected by this POI.
    pub enemy_indices: Vec<usize>,
    /// Indices into [`Zone::elite_spawns`] injected by this POI.
    pub elite_indices: Vec<usize>,
    /// Indices into [`Zone::obstacles`] injected by this POI.
    pub obstacle_indices: Vec<usize>,
    /// Player entered the trigger radius.
    pub triggered: bool,
    /// All injected enemies are dead.
    pub cleared: bool,
    /// Reward picked up.
    pub collected: bool,
}

/// Mineable node. Also present in [`Zone::obstacles`] for collision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceNode {
    /// Index of the matching obstacle.
    pub obstacle_index: usize,
    /// World position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Yield descriptor.
    pub resource: ResourceYield,
}

// =============================================================================
// OBJECTIVES AND EXITS
// =============================================================================

/// Objective archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Kill quota.
    Exterminate,
    /// Survive for a duration.
    Survival,
    /// Reach the exit before the timer runs out.
    TimeTrial,
    /// Danger escalates until the corruption meter fills.
    Corruption,
    /// Destroy the generators.
    Lockdown,
}

/// Bonus for completing the objective.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BonusReward {
    /// Loot quality multiplier.
    pub loot_multiplier: f32,
    /// Extra loot rolls.
    pub extra_rolls: u32,
}

/// Zone objective.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Objective {
    /// Archetype.
    pub kind: ObjectiveKind,
    /// Current progress, starts at zero.
    pub progress: f32,
    /// Progress needed to complete (kills, seconds or generators).
    pub target: f32,
    /// Completed.
    pub completed: bool,
    /// Exit stays sealed until completion.
    pub locks_exit: bool,
    /// Completion bonus.
    pub bonus: BonusReward,
    /// Generator obstacles for [`ObjectiveKind::Lockdown`].
    pub generator_indices: Vec<usize>,
}

/// Branch-exit route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Fewer modifiers next zone.
    Safe,
    /// More modifiers, better loot.
    Risky,
    /// Most modifiers, best loot.
    Vault,
}

/// One of several exits leading to different next zones.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BranchExit {
    /// World position.
    pub position: Vec2,
    /// Trigger radius.
    pub radius: f32,
    /// Route.
    pub route: Route,
    /// Change in modifier count for the next zone.
    pub modifier_delta: i32,
    /// Loot multiplier for the next zone.
    pub loot_multiplier: f32,
}

/// Coarse danger rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DangerTier {
    /// Early depths.
    Calm,
    /// Mid depths.
    Tense,
    /// Deep.
    Hostile,
    /// Deepest, or high difficulty.
    Lethal,
}

/// Flavor text shown on zone entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ambient {
    /// Description line.
    pub description: String,
    /// Danger rating.
    pub danger: DangerTier,
}

// =============================================================================
// ZONE
// =============================================================================

/// One generated play area.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Zone {
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
    /// Biome id.
    pub biome: String,
    /// Depth the zone was generated for.
    pub depth: u32,
    /// Seed the zone was generated from.
    pub seed: ZoneSeed,
    /// Player start.
    pub spawn: Vec2,
    /// Main exit. With branch exits this is the safe route.
    pub exit: Vec2,
    /// Regular enemies, POI recipes included.
    pub enemy_spawns: Vec<EnemySpawn>,
    /// Elites, POI recipes included.
    pub elite_spawns: Vec<EliteSpawn>,
    /// Boss, only in boss zones.
    pub boss_spawn: Option<BossSpawn>,
    /// Colliders: walls, clusters, scatter, POI cover, resource nodes and
    /// generators.
    pub obstacles: Vec<Obstacle>,
    /// Cosmetic backdrop.
    pub decorations: Vec<Decoration>,
    /// Points of interest.
    pub pois: Vec<Poi>,
    /// Mineable nodes.
    pub resource_nodes: Vec<ResourceNode>,
    /// Objective, absent in early depths and boss zones.
    pub objective: Option<Objective>,
    /// Route choices, absent in early depths.
    pub branch_exits: Option<Vec<BranchExit>>,
    /// Flavor text.
    pub ambient: Ambient,
}

/// Entity counts of a zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ZoneCensus {
    /// Regular enemies.
    pub enemies: usize,
    /// Elites.
    pub elites: usize,
    /// Bosses.
    pub bosses: usize,
    /// Obstacles of every kind.
    pub obstacles: usize,
    /// Hazard obstacles.
    pub hazards: usize,
    /// Decorations.
    pub decorations: usize,
    /// Points of interest.
    pub pois: usize,
    /// Resource nodes.
    pub resource_nodes: usize,
    /// Branch exits.
    pub branch_exits: usize,
}

impl Zone {
    /// Counts every entity category.
    #[must_use]
    pub fn census(&self) -> ZoneCensus {
        ZoneCensus {
            enemies: self.enemy_spawns.len(),
            elites: self.elite_spawns.len(),
            bosses: usize::from(self.boss_spawn.is_some()),
            obstacles: self.obstacles.len(),
            hazards: self.obstacles.iter().filter(|o| o.is_hazard()).count(),
            decorations: self.decorations.len(),
            pois: self.pois.len(),
            resource_nodes: self.resource_nodes.len(),
            branch_exits: self.branch_exits.as_ref().map_or(0, Vec::len),
        }
    }

    /// Obstacles as index bodies, keyed by obstacle index in
    /// [`OBSTACLE_BODY_GROUP`].
    pub fn colliders(&self) -> impl Iterator<Item = (BodyId, Circle)> + '_ {
        self.obstacles
            .iter()
            .enumerate()
            .map(|(i, o)| (BodyId::new(i as u32, OBSTACLE_BODY_GROUP), o.circle()))
    }

    /// Area in square world units.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
