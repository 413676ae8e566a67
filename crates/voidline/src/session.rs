//! # Zone Session
//!
//! Owns one generated zone while it is being played:
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. GAMEPLAY WRITES                                                  │
//! │    ├─ spawn / move / despawn dynamic bodies                         │
//! │    └─ destroy obstacles                                             │
//! │                                                                     │
//! │ 2. BEGIN TICK                                                       │
//! │    └─ Rebuild the index: standing obstacles + live bodies           │
//! │                                                                     │
//! │ 3. QUERIES (read-only until the next begin_tick)                    │
//! │    ├─ nearby: who is within a radius                                │
//! │    ├─ overlapping: who touches a given body                         │
//! │    └─ contacts: every touching pair                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries see the world as of the last `begin_tick`. Moves made after it
//! show up on the next one.

use std::collections::BTreeMap;
use std::time::Instant;

use voidline_core::spatial::{BodyId, Circle, SpatialIndex, DEFAULT_CELL_SIZE};
use voidline_core::ZoneSeed;
use voidline_procedural::{GenerateOptions, TierConfig, Zone, ZoneGenerator};
use voidline_shared::Vec2;

/// Body group of live dynamic bodies. Obstacles use group 0.
pub const DYNAMIC_BODY_GROUP: u32 = 1;

/// Session tunables.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Edge length of an index cell.
    pub cell_size: f32,
    /// Log a line per tick.
    pub enable_tick_logs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { cell_size: DEFAULT_CELL_SIZE, enable_tick_logs: false }
    }
}

/// What one index rebuild did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick number, starting at 0.
    pub tick: u64,
    /// Standing obstacles indexed.
    pub static_bodies: usize,
    /// Live dynamic bodies indexed.
    pub dynamic_bodies: usize,
    /// Occupied grid cells after the rebuild.
    pub occupied_cells: usize,
    /// Rebuild time in microseconds.
    pub rebuild_us: u64,
}

/// Running totals over every tick.
#[derive(Clone, Debug, Default)]
pub struct TickStatsAccumulator {
    /// Ticks recorded.
    pub ticks_recorded: u64,
    /// Sum of rebuild times.
    pub rebuild_us_sum: u64,
    /// Slowest rebuild.
    pub max_rebuild_us: u64,
    /// Most bodies indexed in one tick.
    pub peak_bodies: usize,
}

impl TickStatsAccumulator {
    /// Records one tick.
    pub fn record(&mut self, stats: TickStats) {
        self.ticks_recorded += 1;
        self.rebuild_us_sum += stats.rebuild_us;
        self.max_rebuild_us = self.max_rebuild_us.max(stats.rebuild_us);
        self.peak_bodies = self.peak_bodies.max(stats.static_bodies + stats.dynamic_bodies);
    }

    /// Mean rebuild time in microseconds.
    #[must_use]
    pub fn avg_rebuild_us(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.rebuild_us_sum as f64 / self.ticks_recorded as f64
    }
}

/// A zone in play.
pub struct ZoneSession {
    zone: Zone,
    config: SessionConfig,
    index: SpatialIndex,
    destroyed: Vec<bool>,
    bodies: BTreeMap<BodyId, Circle>,
    next_body: u32,
    tick: u64,
    last_stats: TickStats,
    stats: TickStatsAccumulator,
}

impl ZoneSession {
    /// Derives the zone seed from the act seed and zone index, generates
    /// the zone and wraps it in a session.
    #[must_use]
    pub fn start(
        generator: &ZoneGenerator,
        tier: &TierConfig,
        act_seed: ZoneSeed,
        zone_index: u32,
        options: &GenerateOptions,
        config: SessionConfig,
    ) -> Self {
        let seed = ZoneSeed::for_zone(act_seed, zone_index);
        let zone = generator.generate(tier, seed, options);
        tracing::debug!(seed = seed.value(), zone_index, depth = options.depth, "zone session started");
        Self::from_zone(zone, config)
    }

    /// Wraps an already generated zone.
    #[must_use]
    pub fn from_zone(zone: Zone, config: SessionConfig) -> Self {
        let destroyed = vec![false; zone.obstacles.len()];
        Self {
            index: SpatialIndex::new(config.cell_size),
            zone,
            config,
            destroyed,
            bodies: BTreeMap::new(),
            next_body: 0,
            tick: 0,
            last_stats: TickStats::default(),
            stats: TickStatsAccumulator::default(),
        }
    }

    /// The zone being played.
    #[inline]
    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    /// The index as of the last [`begin_tick`](Self::begin_tick).
    #[inline]
    #[must_use]
    pub const fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Ticks begun so far.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Stats of the most recent tick.
    #[must_use]
    pub const fn last_stats(&self) -> TickStats {
        self.last_stats
    }

    /// Totals over every tick.
    #[must_use]
    pub const fn stats(&self) -> &TickStatsAccumulator {
        &self.stats
    }

    /// Adds a dynamic body. It is indexed from the next tick on.
    pub fn spawn_body(&mut self, circle: Circle) -> BodyId {
        let id = BodyId::new(self.next_body, DYNAMIC_BODY_GROUP);
        self.next_body = self.next_body.wrapping_add(1);
        self.bodies.insert(id, circle);
        id
    }

    /// Moves a dynamic body. Returns false for unknown ids.
    pub fn move_body(&mut self, id: BodyId, center: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(circle) => {
                circle.center = center;
                true
            }
            None => false,
        }
    }

    /// Removes a dynamic body. Returns false for unknown ids.
    pub fn despawn_body(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    /// Current shape of a dynamic body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<Circle> {
        self.bodies.get(&id).copied()
    }

    /// Live dynamic bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Marks an obstacle destroyed; it drops out of the next rebuild.
    /// Returns false if the index is out of range or already destroyed.
    pub fn destroy_obstacle(&mut self, index: usize) -> bool {
        match self.destroyed.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// True if the obstacle at `index` is still standing.
    #[must_use]
    pub fn is_standing(&self, index: usize) -> bool {
        self.destroyed.get(index).is_some_and(|d| !d)
    }

    /// Rebuilds the index from standing obstacles and live bodies.
    pub fn begin_tick(&mut self) -> TickStats {
        let start = Instant::now();

        let destroyed = &self.destroyed;
        let standing = self.zone.colliders().filter(|(id, _)| !destroyed[id.index() as usize]);
        let live = self.bodies.iter().map(|(id, circle)| (*id, *circle));
        self.index.rebuild(standing.chain(live));

        let dynamic_bodies = self.bodies.len();
        let stats = TickStats {
            tick: self.tick,
            static_bodies: self.index.len() - dynamic_bodies,
            dynamic_bodies,
            occupied_cells: self.index.occupied_cells(),
            rebuild_us: start.elapsed().as_micros() as u64,
        };

        if self.config.enable_tick_logs {
            tracing::trace!(
                tick = stats.tick,
                static_bodies = stats.static_bodies,
                dynamic_bodies = stats.dynamic_bodies,
                occupied_cells = stats.occupied_cells,
                rebuild_us = stats.rebuild_us,
                "index rebuilt"
            );
        }

        self.tick += 1;
        self.last_stats = stats;
        self.stats.record(stats);
        stats
    }

    /// Bodies within `radius` of `center`, obstacles included.
    #[must_use]
    pub fn nearby(&self, center: Vec2, radius: f32) -> Vec<BodyId> {
        self.index.query_circle(center.x, center.y, radius)
    }

    /// Bodies touching `id`, excluding `id` itself. Empty if `id` was not
    /// indexed at the last tick.
    #[must_use]
    pub fn overlapping(&self, id: BodyId) -> Vec<BodyId> {
        let Some(circle) = self.index.circle(id) else {
            return Vec::new();
        };
        let mut hits = self.index.query_circle(circle.center.x, circle.center.y, circle.radius);
        hits.retain(|other| *other != id);
        hits
    }

    /// Every touching pair, `(lower id, higher id)`, sorted.
    #[must_use]
    pub fn contacts(&self) -> Vec<(BodyId, BodyId)> {
        self.index.collision_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_procedural::zone::OBSTACLE_BODY_GROUP;

    fn session() -> ZoneSession {
        ZoneSession::start(
            &ZoneGenerator::default(),
            &TierConfig::asteroid_belt(),
            ZoneSeed::new(2024),
            3,
            &GenerateOptions::at_depth(3),
            SessionConfig::default(),
        )
    }

    #[test]
    fn test_start_uses_derived_seed() {
        let s = session();
        assert_eq!(s.zone().seed, ZoneSeed::for_zone(ZoneSeed::new(2024), 3));
        assert_eq!(s.tick_count(), 0);
        assert!(s.index().is_empty());
    }

    #[test]
    fn test_begin_tick_indexes_obstacles_and_bodies() {
        let mut s = session();
        // Outside the zone, so no obstacle can touch them.
        let a = s.spawn_body(Circle::at(-500.0, -500.0, 5.0));
        let b = s.spawn_body(Circle::at(-496.0, -500.0, 5.0));

        let stats = s.begin_tick();
        assert_eq!(stats.tick, 0);
        assert_eq!(stats.static_bodies, s.zone().obstacles.len());
        assert_eq!(stats.dynamic_bodies, 2);
        assert_eq!(s.tick_count(), 1);

        assert_eq!(s.overlapping(a), vec![b]);
        assert!(s.contacts().contains(&(a, b)));
        assert!(s.nearby(Vec2::new(-500.0, -500.0), 1.0).contains(&a));
    }

    #[test]
    fn test_destroyed_obstacles_drop_out() {
        let mut s = session();
        assert!(!s.zone().obstacles.is_empty());
        let target = BodyId::new(0, OBSTACLE_BODY_GROUP);

        s.begin_tick();
        assert!(s.index().contains(target));

        assert!(s.destroy_obstacle(0));
        assert!(!s.destroy_obstacle(0));
        assert!(!s.destroy_obstacle(usize::MAX));
        assert!(!s.is_standing(0));

        let stats = s.begin_tick();
        assert!(!s.index().contains(target));
        assert_eq!(stats.static_bodies, s.zone().obstacles.len() - 1);
    }

    #[test]
    fn test_moves_apply_on_next_tick() {
        let mut s = session();
        let id = s.spawn_body(Circle::at(100.0, 100.0, 4.0));
        s.begin_tick();
        assert!(s.move_body(id, Vec2::new(900.0, 900.0)));
        assert_eq!(s.index().circle(id).map(|c| c.center), Some(Vec2::new(100.0, 100.0)));

        s.begin_tick();
        assert_eq!(s.index().circle(id).map(|c| c.center), Some(Vec2::new(900.0, 900.0)));

        assert!(s.despawn_body(id));
        assert!(!s.despawn_body(id));
        assert!(!s.move_body(id, Vec2::ZERO));
        s.begin_tick();
        assert!(!s.index().contains(id));
        assert!(s.overlapping(id).is_empty());
    }

    #[test]
    fn test_stats_accumulate() {
        let mut s = session();
        for _ in 0..3 {
            s.begin_tick();
        }
        assert_eq!(s.stats().ticks_recorded, 3);
        assert_eq!(s.last_stats().tick, 2);
        assert!(s.stats().peak_bodies >= s.zone().obstacles.len());
    }
}
