//! # Zone Generator
//!
//! Single pass from `(tier, seed, options)` to an immutable [`Zone`].
//!
//! Every phase draws from its own forked stream, so a change in how many
//! draws one phase consumes never shifts the layout of the phases after
//! it. The generator holds only immutable tables and is `Send + Sync`.

use voidline_core::{ZoneRng, ZoneSeed};
use voidline_shared::Vec2;

use crate::ambient::describe;
use crate::boss::build_arena;
use crate::branch::plan_branch_exits;
use crate::config::{Difficulty, PackTemplateTable, TierConfig, TuningTable, ZoneModifier};
use crate::density::{resolve_densities, zone_dimensions};
use crate::objective::select_objective;
use crate::placement::decorations::place_decorations;
use crate::placement::obstacles::place_obstacles;
use crate::placement::packs::group_into_packs;
use crate::placement::pois::{place_pois, ZoneLists};
use crate::placement::resources::place_resources;
use crate::placement::spawns::{pick_endpoints, place_elites, place_enemies};
use crate::placement::{Caps, Clearance, Layout};
use crate::zone::Zone;

// Stream purposes. Values are part of the seed contract: changing one
// changes every zone.
const STREAM_SIZE: u32 = 0x01;
const STREAM_ENDPOINTS: u32 = 0x02;
const STREAM_BRANCHES: u32 = 0x03;
const STREAM_ENEMIES: u32 = 0x10;
const STREAM_ELITES: u32 = 0x11;
const STREAM_PACKS: u32 = 0x12;
const STREAM_OBSTACLES: u32 = 0x20;
const STREAM_DECORATIONS: u32 = 0x21;
const STREAM_POIS: u32 = 0x30;
const STREAM_RESOURCES: u32 = 0x31;
const STREAM_OBJECTIVE: u32 = 0x40;
const STREAM_AMBIENT: u32 = 0x50;
const STREAM_BOSS: u32 = 0x60;

/// Per-call generation inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerateOptions {
    /// Run depth, 0 for the first zone.
    pub depth: u32,
    /// Active modifiers, applied in order.
    pub modifiers: Vec<ZoneModifier>,
    /// Difficulty lane.
    pub difficulty: Difficulty,
}

impl GenerateOptions {
    /// Normal difficulty, no modifiers.
    #[must_use]
    pub fn at_depth(depth: u32) -> Self {
        Self { depth, ..Self::default() }
    }
}

/// Deterministic zone generator.
///
/// ```rust,ignore
/// let generator = ZoneGenerator::default();
/// let zone = generator.generate(&TierConfig::asteroid_belt(), ZoneSeed::new(12345), &GenerateOptions::at_depth(1));
/// assert_eq!(zone, generator.generate(&TierConfig::asteroid_belt(), ZoneSeed::new(12345), &GenerateOptions::at_depth(1)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneGenerator {
    tuning: TuningTable,
    packs: PackTemplateTable,
}

impl ZoneGenerator {
    /// Creates a generator. Both tables are sanitized once here.
    #[must_use]
    pub fn new(tuning: &TuningTable, packs: &PackTemplateTable) -> Self {
        Self { tuning: tuning.sanitized(), packs: packs.sanitized() }
    }

    /// Sanitized tuning table.
    #[must_use]
    pub const fn tuning(&self) -> &TuningTable {
        &self.tuning
    }

    /// Sanitized pack templates.
    #[must_use]
    pub const fn packs(&self) -> &PackTemplateTable {
        &self.packs
    }

    /// Generates a regular zone. Never fails: bad tier values fall back to
    /// defaults and crowded layouts yield fewer entities.
    #[must_use]
    pub fn generate(&self, tier: &TierConfig, seed: ZoneSeed, options: &GenerateOptions) -> Zone {
        let tier = tier.sanitized();
        let tuning = &self.tuning;
        let root = ZoneRng::new(seed);
        let depth = options.depth;
        let caps = Caps::from_tuning(tuning);

        let (width, height) = zone_dimensions(&tier, tuning, &mut root.fork(STREAM_SIZE));
        let budgets = resolve_densities(&tier, tuning, options).budgets(width * height, tuning);
        let margin = tuning.edge_margin.min(width * 0.5).min(height * 0.5);

        let ends = pick_endpoints(width, height, margin, &mut root.fork(STREAM_ENDPOINTS));
        let branch_exits =
            plan_branch_exits(&ends, width, height, tuning, depth, &mut root.fork(STREAM_BRANCHES));
        let (exit, exits): (Vec2, Vec<Vec2>) = match &branch_exits {
            Some(routes) if !routes.is_empty() => {
                (routes[0].position, routes.iter().map(|b| b.position).collect())
            }
            _ => (ends.exit, vec![ends.exit]),
        };
        let layout = Layout::new(width, height, margin, ends.spawn, exits);

        let mut enemies =
            place_enemies(&layout, &tier, tuning, budgets.enemies, &mut root.fork(STREAM_ENEMIES));
        let mut elites =
            place_elites(&layout, &tier, tuning, budgets.elites, &mut root.fork(STREAM_ELITES));
        let packs = group_into_packs(
            &mut enemies,
            &layout,
            Clearance::actors(tuning),
            &self.packs,
            &tier.enemy_pool,
            &mut root.fork(STREAM_PACKS),
        );

        let mut obstacles = place_obstacles(
            &layout,
            &tier,
            Clearance::obstacles(tuning),
            budgets.obstacles,
            &mut root.fork(STREAM_OBSTACLES),
        );
        let decorations =
            place_decorations(&layout, &tier, budgets.decorations, &mut root.fork(STREAM_DECORATIONS));

        let pois = place_pois(
            &layout,
            &tier,
            tuning,
            depth,
            caps,
            &mut ZoneLists { enemies: &mut enemies, elites: &mut elites, obstacles: &mut obstacles },
            &mut root.fork(STREAM_POIS),
        );
        let resource_nodes =
            place_resources(&layout, tuning, depth, caps, &mut obstacles, &mut root.fork(STREAM_RESOURCES));
        let objective = select_objective(
            &layout,
            tuning,
            depth,
            enemies.len() + elites.len(),
            caps,
            &mut obstacles,
            &mut root.fork(STREAM_OBJECTIVE),
        );
        let ambient = describe(&tier, depth, options.difficulty, &mut root.fork(STREAM_AMBIENT));

        let zone = Zone {
            width,
            height,
            biome: tier.biome.clone(),
            depth,
            seed,
            spawn: ends.spawn,
            exit,
            enemy_spawns: enemies,
            elite_spawns: elites,
            boss_spawn: None,
            obstacles,
            decorations,
            pois,
            resource_nodes,
            objective,
            branch_exits,
            ambient,
        };
        log_zone(&zone, packs);
        zone
    }

    /// Generates a boss arena: square, boss in the center, mirrored
    /// pillar cover, no objective and no branch exits.
    #[must_use]
    pub fn generate_boss(&self, tier: &TierConfig, seed: ZoneSeed, options: &GenerateOptions) -> Zone {
        let tier = tier.sanitized();
        let tuning = &self.tuning;
        let root = ZoneRng::new(seed);

        let arena = build_arena(&tier, tuning, &mut root.fork(STREAM_BOSS));
        let margin = tuning.edge_margin.min(arena.size * 0.5);
        let layout = Layout::new(arena.size, arena.size, margin, arena.spawn, vec![arena.exit]);
        let budgets = resolve_densities(&tier, tuning, options).budgets(arena.size * arena.size, tuning);
        let decorations =
            place_decorations(&layout, &tier, budgets.decorations, &mut root.fork(STREAM_DECORATIONS));
        let ambient = describe(&tier, options.depth, options.difficulty, &mut root.fork(STREAM_AMBIENT));

        let zone = Zone {
            width: arena.size,
            height: arena.size,
            biome: tier.biome.clone(),
            depth: options.depth,
            seed,
            spawn: arena.spawn,
            exit: arena.exit,
            enemy_spawns: Vec::new(),
            elite_spawns: Vec::new(),
            boss_spawn: Some(arena.boss),
            obstacles: arena.obstacles,
            decorations,
            pois: Vec::new(),
            resource_nodes: Vec::new(),
            objective: None,
            branch_exits: None,
            ambient,
        };
        log_zone(&zone, 0);
        zone
    }
}

fn log_zone(zone: &Zone, packs: u32) {
    let census = zone.census();
    tracing::debug!(
        seed = zone.seed.value(),
        depth = zone.depth,
        width = zone.width,
        height = zone.height,
        enemies = census.enemies,
        elites = census.elites,
        bosses = census.bosses,
        packs,
        obstacles = census.obstacles,
        hazards = census.hazards,
        decorations = census.decorations,
        pois = census.pois,
        resource_nodes = census.resource_nodes,
        branch_exits = census.branch_exits,
        "zone generated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forked_streams_are_distinct() {
        let streams = [
            STREAM_SIZE,
            STREAM_ENDPOINTS,
            STREAM_BRANCHES,
            STREAM_ENEMIES,
            STREAM_ELITES,
            STREAM_PACKS,
            STREAM_OBSTACLES,
            STREAM_DECORATIONS,
            STREAM_POIS,
            STREAM_RESOURCES,
            STREAM_OBJECTIVE,
            STREAM_AMBIENT,
            STREAM_BOSS,
        ];
        for (i, a) in streams.iter().enumerate() {
            for b in &streams[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_options_default() {
        let options = GenerateOptions::at_depth(4);
        assert_eq!(options.depth, 4);
        assert!(options.modifiers.is_empty());
        assert_eq!(options.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_generator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ZoneGenerator>();
    }

    #[test]
    fn test_exit_is_safe_route() {
        let generator = ZoneGenerator::default();
        let zone = generator.generate(&TierConfig::asteroid_belt(), ZoneSeed::new(77), &GenerateOptions::at_depth(6));
        let exits = zone.branch_exits.unwrap_or_default();
        assert!(!exits.is_empty());
        assert_eq!(exits[0].position, zone.exit);
    }
}
