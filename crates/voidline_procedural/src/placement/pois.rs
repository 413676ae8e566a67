//! Points of interest.
//!
//! Way-points are spread along the line from spawn to exit with bounded
//! sideways jitter, so the encounters read as a journey rather than
//! scatter. Each way-point gets a depth-gated archetype whose recipe
//! appends enemies and obstacles straight into the zone's main lists,
//! within whatever room the hard caps leave.

use std::f32::consts::TAU;

use voidline_core::{Weighted, ZoneRng};
use voidline_shared::Vec2;

use super::obstacles::{class_obstacle, pillar};
use super::spawns::{roll_affix, roll_enemy_kind, roll_rotation};
use super::{Caps, Clearance, Layout};
use crate::config::{TierConfig, TuningTable};
use crate::zone::{
    EliteSpawn, EnemySpawn, Obstacle, ObstacleClass, Patrol, PatrolStyle, Poi, PoiKind, PoiReward,
};

/// Trigger radius of every point of interest.
pub const POI_RADIUS: f32 = 220.0;

/// Archetype, minimum depth, weight.
const ARCHETYPES: [(PoiKind, u32, f32); 6] = [
    (PoiKind::GuardRing, 0, 25.0),
    (PoiKind::Treasure, 0, 20.0),
    (PoiKind::Ambush, 2, 20.0),
    (PoiKind::MiningCluster, 2, 15.0),
    (PoiKind::Derelict, 3, 12.0),
    (PoiKind::EliteArena, 4, 8.0),
];

/// Archetypes available at `depth`.
#[must_use]
pub fn archetypes_at(depth: u32) -> Vec<Weighted<PoiKind>> {
    ARCHETYPES
        .iter()
        .filter(|(_, min_depth, _)| depth >= *min_depth)
        .map(|&(kind, _, weight)| Weighted::new(kind, weight))
        .collect()
}

/// Lists the recipes write into.
pub(crate) struct ZoneLists<'a> {
    pub enemies: &'a mut Vec<EnemySpawn>,
    pub elites: &'a mut Vec<EliteSpawn>,
    pub obstacles: &'a mut Vec<Obstacle>,
}

/// Places points of interest and their recipes.
pub(crate) fn place_pois(
    layout: &Layout,
    tier: &TierConfig,
    tuning: &TuningTable,
    depth: u32,
    caps: Caps,
    lists: &mut ZoneLists<'_>,
    rng: &mut ZoneRng,
) -> Vec<Poi> {
    let Some(&exit) = layout.exits.first() else {
        return Vec::new();
    };
    let count = rng.int(tuning.poi_min as i32, tuning.poi_max as i32).max(0) as u32;
    let archetypes = archetypes_at(depth);
    let side = (exit - layout.spawn).normalize_or_zero().perp();
    let jitter = tuning.poi_jitter * layout.short_edge();

    let mut pois = Vec::with_capacity(count as usize);
    for i in 0..count {
        // Keep way-points in the middle half of the journey.
        let t = 0.25 + 0.5 * (i as f32 + 0.5) / count as f32;
        let center = layout
            .bounds
            .clamp(layout.spawn.lerp(exit, t) + side * rng.range(-jitter, jitter));
        let kind = rng.pick_weighted(&archetypes).copied().unwrap_or(PoiKind::GuardRing);

        let mut poi = Poi {
            id: i,
            position: center,
            radius: POI_RADIUS,
            kind,
            label: kind.label().to_string(),
            icon: kind.icon().to_string(),
            reward: None,
            enemy_indices: Vec::new(),
            elite_indices: Vec::new(),
            obstacle_indices: Vec::new(),
            triggered: false,
            cleared: false,
            collected: false,
        };
        let mut recipe = Recipe { layout, tier, tuning, caps, poi: &mut poi, lists: &mut *lists };
        recipe.build(rng);
        pois.push(poi);
    }
    pois
}

struct Recipe<'p, 'l, 'a> {
    layout: &'p Layout,
    tier: &'p TierConfig,
    tuning: &'p TuningTable,
    caps: Caps,
    poi: &'p mut Poi,
    lists: &'l mut ZoneLists<'a>,
}

impl Recipe<'_, '_, '_> {
    fn build(&mut self, rng: &mut ZoneRng) {
        let center = self.poi.position;
        match self.poi.kind {
            PoiKind::GuardRing => {
                self.ring_of_enemies(4, 110.0, PatrolStyle::Guard, rng);
                self.poi.reward = Some(PoiReward { loot_rolls: 1, loot_multiplier: 1.2 });
            }
            PoiKind::Treasure => {
                self.ring_of_enemies(2, 80.0, PatrolStyle::Guard, rng);
                for k in 0..2 {
                    let p = center + Vec2::from_angle(k as f32 * TAU * 0.5) * 140.0;
                    self.add_obstacle(class_obstacle(ObstacleClass::Debris, p, self.tier, rng));
                }
                self.poi.reward = Some(PoiReward { loot_rolls: 2, loot_multiplier: 1.25 });
            }
            PoiKind::Ambush => {
                for _ in 0..5 {
                    let p = center + Vec2::from_angle(rng.range(0.0, TAU)) * rng.range(40.0, 150.0);
                    self.add_enemy(p, PatrolStyle::Idle, rng);
                }
                self.poi.reward = Some(PoiReward { loot_rolls: 1, loot_multiplier: 1.1 });
            }
            PoiKind::EliteArena => {
                self.add_elite(center, rng);
                let phase = rng.range(0.0, TAU);
                for k in 0..4 {
                    let p = center + Vec2::from_angle(phase + k as f32 * TAU * 0.25) * 180.0;
                    self.add_obstacle(pillar(p, 36.0, roll_rotation(rng)));
                }
                self.poi.reward = Some(PoiReward { loot_rolls: 3, loot_multiplier: 1.5 });
            }
            PoiKind::MiningCluster => {
                for _ in 0..5 {
                    let p = center + Vec2::from_angle(rng.range(0.0, TAU)) * rng.range(0.0, 160.0);
                    self.add_obstacle(class_obstacle(ObstacleClass::Asteroid, p, self.tier, rng));
                }
                self.ring_of_enemies(1, 120.0, PatrolStyle::Wander, rng);
            }
            PoiKind::Derelict => {
                let phase = rng.range(0.0, TAU);
                for k in 0..6 {
                    let p = center + Vec2::from_angle(phase + k as f32 * TAU / 6.0) * 130.0;
                    self.add_obstacle(class_obstacle(ObstacleClass::Debris, p, self.tier, rng));
                }
                self.ring_of_enemies(2, 60.0, PatrolStyle::Guard, rng);
                self.poi.reward = Some(PoiReward { loot_rolls: 2, loot_multiplier: 1.3 });
            }
        }
    }

    fn ring_of_enemies(&mut self, count: u32, radius: f32, style: PatrolStyle, rng: &mut ZoneRng) {
        let phase = rng.range(0.0, TAU);
        for k in 0..count {
            let angle = phase + k as f32 * TAU / count as f32;
            self.add_enemy(self.poi.position + Vec2::from_angle(angle) * radius, style, rng);
        }
    }

    fn add_enemy(&mut self, p: Vec2, style: PatrolStyle, rng: &mut ZoneRng) {
        let p = self.layout.bounds.clamp(p);
        if self.lists.enemies.len() >= self.caps.enemies || !self.layout.is_clear(p, Clearance::actors(self.tuning)) {
            return;
        }
        let mut spawn = EnemySpawn::new(p, roll_enemy_kind(self.tier, rng), Patrol { style, radius: 60.0 });
        spawn.poi_id = Some(self.poi.id);
        self.poi.enemy_indices.push(self.lists.enemies.len());
        self.lists.enemies.push(spawn);
    }

    fn add_elite(&mut self, p: Vec2, rng: &mut ZoneRng) {
        let p = self.layout.bounds.clamp(p);
        if self.lists.elites.len() >= self.caps.elites || !self.layout.is_clear(p, Clearance::actors(self.tuning)) {
            return;
        }
        let mut spawn = EnemySpawn::new(p, roll_enemy_kind(self.tier, rng), Patrol { style: PatrolStyle::Guard, radius: 90.0 });
        spawn.poi_id = Some(self.poi.id);
        self.poi.elite_indices.push(self.lists.elites.len());
        self.lists.elites.push(EliteSpawn { spawn, affix: roll_affix(self.tier, rng) });
    }

    fn add_obstacle(&mut self, mut obstacle: Obstacle) {
        obstacle.position = self.layout.bounds.clamp(obstacle.position);
        if self.lists.obstacles.len() >= self.caps.obstacles
            || !self.layout.is_clear(obstacle.position, Clearance::obstacles(self.tuning))
        {
            return;
        }
        self.poi.obstacle_indices.push(self.lists.obstacles.len());
        self.lists.obstacles.push(obstacle);
    }
}
