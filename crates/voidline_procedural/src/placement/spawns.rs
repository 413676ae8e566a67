//! Player start, exit and free-standing enemies.

use std::f32::consts::TAU;

use voidline_core::{Weighted, ZoneRng};
use voidline_shared::Vec2;

use super::{scatter, Clearance, Layout};
use crate::config::{TierConfig, TuningTable};
use crate::zone::{EliteAffix, EliteSpawn, EnemyKind, EnemySpawn, Patrol, PatrolStyle};

/// Map edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    West,
    North,
    South,
    East,
}

impl Edge {
    /// Edges the player can start on.
    pub const SPAWN_EDGES: [Self; 3] = [Self::West, Self::North, Self::South];

    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::East => Self::West,
            Self::North => Self::South,
            Self::South => Self::North,
        }
    }

    /// Point on this edge, `margin` inside the zone, at fraction `t` along it.
    pub fn point(self, width: f32, height: f32, margin: f32, t: f32) -> Vec2 {
        match self {
            Self::West => Vec2::new(margin, height * t),
            Self::East => Vec2::new(width - margin, height * t),
            Self::North => Vec2::new(width * t, margin),
            Self::South => Vec2::new(width * t, height - margin),
        }
    }
}

/// Start and exit on opposite edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Endpoints {
    pub spawn: Vec2,
    pub exit: Vec2,
    pub exit_edge: Edge,
}

/// Picks the start on the west, north or south edge and the exit on the
/// opposite one.
pub(crate) fn pick_endpoints(width: f32, height: f32, margin: f32, rng: &mut ZoneRng) -> Endpoints {
    let spawn_edge = rng.pick(&Edge::SPAWN_EDGES).copied().unwrap_or(Edge::West);
    let exit_edge = spawn_edge.opposite();
    let margin = margin.min(width * 0.5).min(height * 0.5);
    Endpoints {
        spawn: spawn_edge.point(width, height, margin, rng.range(0.2, 0.8)),
        exit: exit_edge.point(width, height, margin, rng.range(0.2, 0.8)),
        exit_edge,
    }
}

const PATROL_STYLES: [Weighted<PatrolStyle>; 3] = [
    Weighted::new(PatrolStyle::Idle, 1.0),
    Weighted::new(PatrolStyle::Wander, 3.0),
    Weighted::new(PatrolStyle::Circle, 2.0),
];

pub(crate) fn roll_patrol(rng: &mut ZoneRng) -> Patrol {
    let style = rng.pick_weighted(&PATROL_STYLES).copied().unwrap_or(PatrolStyle::Wander);
    Patrol { style, radius: rng.range(60.0, 180.0) }
}

pub(crate) fn roll_enemy_kind(tier: &TierConfig, rng: &mut ZoneRng) -> EnemyKind {
    rng.pick_weighted(&tier.enemy_pool).copied().unwrap_or(EnemyKind::Drone)
}

pub(crate) fn roll_affix(tier: &TierConfig, rng: &mut ZoneRng) -> EliteAffix {
    rng.pick_weighted(&tier.elite_affixes).copied().unwrap_or(EliteAffix::Shielded)
}

/// Free-standing regular enemies.
pub(crate) fn place_enemies(
    layout: &Layout,
    tier: &TierConfig,
    tuning: &TuningTable,
    budget: u32,
    rng: &mut ZoneRng,
) -> Vec<EnemySpawn> {
    scatter(layout, budget, tuning.enemy_spacing, Clearance::actors(tuning), rng)
        .into_iter()
        .map(|position| {
            let kind = roll_enemy_kind(tier, rng);
            EnemySpawn::new(position, kind, roll_patrol(rng))
        })
        .collect()
}

/// Free-standing elites.
pub(crate) fn place_elites(
    layout: &Layout,
    tier: &TierConfig,
    tuning: &TuningTable,
    budget: u32,
    rng: &mut ZoneRng,
) -> Vec<EliteSpawn> {
    scatter(layout, budget, tuning.elite_spacing, Clearance::actors(tuning), rng)
        .into_iter()
        .map(|position| {
            let kind = roll_enemy_kind(tier, rng);
            let patrol = Patrol { style: PatrolStyle::Circle, radius: rng.range(80.0, 200.0) };
            EliteSpawn { spawn: EnemySpawn::new(position, kind, patrol), affix: roll_affix(tier, rng) }
        })
        .collect()
}

/// Random facing.
#[inline]
pub(crate) fn roll_rotation(rng: &mut ZoneRng) -> f32 {
    rng.range(0.0, TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::ZoneSeed;

    #[test]
    fn test_exit_on_opposite_edge() {
        for seed in 0..64 {
            let mut rng = ZoneRng::new(ZoneSeed::new(seed));
            let ends = pick_endpoints(3000.0, 2000.0, 80.0, &mut rng);
            match ends.exit_edge {
                Edge::East => {
                    assert_eq!(ends.spawn.x, 80.0);
                    assert_eq!(ends.exit.x, 2920.0);
                }
                Edge::South => {
                    assert_eq!(ends.spawn.y, 80.0);
                    assert_eq!(ends.exit.y, 1920.0);
                }
                Edge::North => {
                    assert_eq!(ends.spawn.y, 1920.0);
                    assert_eq!(ends.exit.y, 80.0);
                }
                Edge::West => panic!("exit never sits on the west edge"),
            }
        }
    }

    #[test]
    fn test_every_spawn_edge_used() {
        let mut seen = [false; 3];
        for seed in 0..200 {
            let mut rng = ZoneRng::new(ZoneSeed::new(seed));
            let edge = pick_endpoints(3000.0, 2000.0, 80.0, &mut rng).exit_edge.opposite();
            if let Some(i) = Edge::SPAWN_EDGES.iter().position(|e| *e == edge) {
                seen[i] = true;
            }
        }
        assert_eq!(seen, [true; 3]);
    }
}
