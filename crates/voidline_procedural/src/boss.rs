//! # Boss Arena
//!
//! Fixed square arena: boss in the center, player entering from the
//! south, exit to the north, pillar cover mirrored into all four
//! quadrants.

use voidline_core::ZoneRng;
use voidline_shared::Vec2;

use crate::config::{TierConfig, TuningTable};
use crate::placement::obstacles::pillar;
use crate::placement::spawns::roll_rotation;
use crate::placement::{Clearance, Layout};
use crate::zone::{BossSpawn, Obstacle};

/// Closest a pillar may stand to the boss, per axis.
const PILLAR_MIN_OFFSET: f32 = 200.0;

/// Arena geometry and contents.
pub(crate) struct BossArena {
    pub size: f32,
    pub spawn: Vec2,
    pub exit: Vec2,
    pub boss: BossSpawn,
    pub obstacles: Vec<Obstacle>,
}

pub(crate) fn build_arena(tier: &TierConfig, tuning: &TuningTable, rng: &mut ZoneRng) -> BossArena {
    let size = tier.boss_arena_size.max(tuning.min_zone_size);
    let center = Vec2::new(size * 0.5, size * 0.5);
    let margin = tuning.edge_margin.min(size * 0.5);
    let spawn = Vec2::new(center.x, size - margin);
    let exit = Vec2::new(center.x, margin);
    let layout = Layout::new(size, size, margin, spawn, vec![exit]);
    let clearance = Clearance::obstacles(tuning);

    let max_sets = tuning.max_obstacles_per_zone as usize / 4;
    let sets = (rng.int(2, 4) as usize).min(max_sets);
    let reach = (size * 0.4).max(PILLAR_MIN_OFFSET);

    let mut obstacles = Vec::with_capacity(sets * 4);
    for _ in 0..sets {
        let dx = rng.range(PILLAR_MIN_OFFSET, reach);
        let dy = rng.range(PILLAR_MIN_OFFSET, reach);
        let radius = rng.range(36.0, 60.0);
        let rotation = roll_rotation(rng);
        let corners = [
            Vec2::new(center.x + dx, center.y + dy),
            Vec2::new(center.x - dx, center.y + dy),
            Vec2::new(center.x + dx, center.y - dy),
            Vec2::new(center.x - dx, center.y - dy),
        ];
        // All four or none, so the cover stays symmetric.
        if corners.iter().all(|p| layout.bounds.contains(*p) && layout.is_clear(*p, clearance)) {
            obstacles.extend(corners.iter().map(|p| pillar(*p, radius, rotation)));
        }
    }

    BossArena {
        size,
        spawn,
        exit,
        boss: BossSpawn { position: center, kind: tier.boss, active: true, killed: false },
        obstacles,
    }
}
