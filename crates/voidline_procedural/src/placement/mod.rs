//! # Seeded Placement
//!
//! Rejection sampling shared by every placement pass: propose a random
//! point, reject it if it is too close to the player start, an exit or an
//! accepted peer, and stop at the budget or after `3 x budget` attempts.
//! Exhaustion yields fewer entities, never a hang.

pub(crate) mod decorations;
pub(crate) mod obstacles;
pub(crate) mod packs;
pub(crate) mod pois;
pub(crate) mod resources;
pub(crate) mod spawns;

use voidline_core::spatial::{BodyId, Circle, SpatialIndex};
use voidline_core::ZoneRng;
use voidline_shared::{Rect, Vec2};

use crate::config::TuningTable;

/// Attempts allowed per budgeted entity.
pub(crate) const ATTEMPTS_PER_SLOT: u32 = 3;

/// Fixed geometry every pass places against.
#[derive(Clone, Debug)]
pub(crate) struct Layout {
    /// Zone width.
    pub width: f32,
    /// Zone height.
    pub height: f32,
    /// Playable area, inset from the edges.
    pub bounds: Rect,
    /// Player start.
    pub spawn: Vec2,
    /// Every exit, branch exits included.
    pub exits: Vec<Vec2>,
}

impl Layout {
    pub fn new(width: f32, height: f32, margin: f32, spawn: Vec2, exits: Vec<Vec2>) -> Self {
        Self { width, height, bounds: Rect::from_size(width, height).inset(margin), spawn, exits }
    }

    /// Uniform point inside the playable area.
    pub fn random_point(&self, rng: &mut ZoneRng) -> Vec2 {
        Vec2::new(
            rng.range(self.bounds.min.x, self.bounds.max.x),
            rng.range(self.bounds.min.y, self.bounds.max.y),
        )
    }

    /// True if `p` keeps the required distance from the start and every exit.
    pub fn is_clear(&self, p: Vec2, clearance: Clearance) -> bool {
        p.distance(self.spawn) >= clearance.spawn
            && self.exits.iter().all(|exit| p.distance(*exit) >= clearance.exit)
    }

    /// Shorter zone edge.
    pub fn short_edge(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Distances kept from the start and the exits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Clearance {
    pub spawn: f32,
    pub exit: f32,
}

impl Clearance {
    /// No exclusion at all.
    pub const NONE: Self = Self { spawn: 0.0, exit: 0.0 };

    /// Clearance for enemies, elites and resource nodes.
    pub fn actors(tuning: &TuningTable) -> Self {
        Self { spawn: tuning.spawn_clearance, exit: tuning.exit_clearance }
    }

    /// Clearance for obstacles.
    pub fn obstacles(tuning: &TuningTable) -> Self {
        Self { spawn: tuning.obstacle_clearance, exit: tuning.obstacle_clearance }
    }
}

/// Hard caps on the final entity lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Caps {
    pub enemies: usize,
    pub elites: usize,
    pub obstacles: usize,
}

impl Caps {
    pub fn from_tuning(tuning: &TuningTable) -> Self {
        Self {
            enemies: tuning.max_enemy_spawns_per_zone as usize,
            elites: tuning.max_elite_spawns_per_zone as usize,
            obstacles: tuning.max_obstacles_per_zone as usize,
        }
    }
}

/// Accepted points of one category, kept on a grid for spacing checks.
pub(crate) struct PeerGrid {
    index: SpatialIndex,
    spacing: f32,
    scratch: Vec<BodyId>,
}

impl PeerGrid {
    pub fn new(spacing: f32) -> Self {
        Self { index: SpatialIndex::new(spacing.max(1.0) * 2.0), spacing, scratch: Vec::new() }
    }

    /// True if no accepted peer is within `spacing` of `p`.
    pub fn is_clear(&mut self, p: Vec2) -> bool {
        if self.spacing <= 0.0 {
            return true;
        }
        self.index.query_circle_into(p.x, p.y, self.spacing, &mut self.scratch);
        self.scratch.is_empty()
    }

    pub fn add(&mut self, p: Vec2) {
        let id = BodyId::new(self.index.len() as u32, 0);
        self.index.insert(id, Circle::new(p, 0.0));
    }
}

/// Rejection-samples up to `budget` points.
pub(crate) fn scatter(
    layout: &Layout,
    budget: u32,
    spacing: f32,
    clearance: Clearance,
    rng: &mut ZoneRng,
) -> Vec<Vec2> {
    let mut accepted = Vec::new();
    let mut peers = PeerGrid::new(spacing);
    let attempts = budget.saturating_mul(ATTEMPTS_PER_SLOT);

    for _ in 0..attempts {
        if accepted.len() >= budget as usize {
            break;
        }
        let p = layout.random_point(rng);
        if !layout.is_clear(p, clearance) || !peers.is_clear(p) {
            continue;
        }
        peers.add(p);
        accepted.push(p);
    }

    if accepted.len() < budget as usize {
        tracing::trace!(budget, placed = accepted.len(), spacing, "placement exhausted its attempts");
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::ZoneSeed;

    fn layout() -> Layout {
        Layout::new(2000.0, 1500.0, 50.0, Vec2::new(60.0, 750.0), vec![Vec2::new(1940.0, 750.0)])
    }

    #[test]
    fn test_scatter_respects_constraints() {
        let layout = layout();
        let clearance = Clearance { spawn: 300.0, exit: 200.0 };
        let mut rng = ZoneRng::new(ZoneSeed::new(9));
        let points = scatter(&layout, 60, 90.0, clearance, &mut rng);

        assert!(!points.is_empty());
        assert!(points.len() <= 60);
        for (i, p) in points.iter().enumerate() {
            assert!(layout.bounds.contains(*p));
            assert!(layout.is_clear(*p, clearance));
            for q in &points[i + 1..] {
                assert!(p.distance(*q) >= 90.0);
            }
        }
    }

    #[test]
    fn test_scatter_terminates_when_impossible() {
        let layout = layout();
        let mut rng = ZoneRng::new(ZoneSeed::new(9));
        let points = scatter(&layout, 500, 5000.0, Clearance::NONE, &mut rng);
        assert_eq!(points.len(), 1);
        assert!(rng.draws() <= 2 * 500 * u64::from(ATTEMPTS_PER_SLOT));
    }

    #[test]
    fn test_zero_budget_draws_nothing() {
        let mut rng = ZoneRng::new(ZoneSeed::new(1));
        assert!(scatter(&layout(), 0, 10.0, Clearance::NONE, &mut rng).is_empty());
        assert_eq!(rng.draws(), 0);
    }
}
