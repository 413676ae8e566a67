//! Obstacle placement in three phases sharing one budget:
//! corridor walls (40%), dense clusters (30%) and uniform scatter for
//! whatever is left.

use std::f32::consts::TAU;

use voidline_core::ZoneRng;
use voidline_shared::Vec2;

use super::spawns::roll_rotation;
use super::{scatter, Clearance, Layout};
use crate::config::TierConfig;
use crate::zone::{Hazard, Obstacle, ObstacleClass, ObstacleKind, ResourceYield};

/// Half the width of a corridor between its two walls.
const CORRIDOR_HALF_WIDTH: f32 = 140.0;
/// Sideways wobble of each wall segment.
const CORRIDOR_JITTER: f32 = 40.0;
/// Radius around a cluster center.
const CLUSTER_RADIUS: f32 = 180.0;

pub(crate) fn class_obstacle(class: ObstacleClass, position: Vec2, tier: &TierConfig, rng: &mut ZoneRng) -> Obstacle {
    let rotation = roll_rotation(rng);
    match class {
        ObstacleClass::Asteroid => {
            let radius = rng.range(24.0, 56.0);
            Obstacle { position, kind: ObstacleKind::Asteroid, radius, rotation, destructible: true, hit_points: radius * 4.0 }
        }
        ObstacleClass::Debris => Obstacle {
            position,
            kind: ObstacleKind::Debris,
            radius: rng.range(12.0, 28.0),
            rotation,
            destructible: true,
            hit_points: 40.0,
        },
        ObstacleClass::Pillar => pillar(position, rng.range(30.0, 50.0), rotation),
        ObstacleClass::Mine => Obstacle {
            position,
            kind: ObstacleKind::Mine { damage: tier.mine_damage },
            radius: 14.0,
            rotation,
            destructible: true,
            hit_points: 10.0,
        },
    }
}

pub(crate) const fn pillar(position: Vec2, radius: f32, rotation: f32) -> Obstacle {
    Obstacle { position, kind: ObstacleKind::Pillar, radius, rotation, destructible: false, hit_points: 0.0 }
}

pub(crate) fn hazard_obstacle(hazard: Hazard, position: Vec2, rng: &mut ZoneRng) -> Obstacle {
    Obstacle {
        position,
        kind: ObstacleKind::Hazard(hazard),
        radius: rng.range(60.0, 110.0),
        rotation: roll_rotation(rng),
        destructible: false,
        hit_points: 0.0,
    }
}

pub(crate) fn resource_obstacle(resource: ResourceYield, position: Vec2, rng: &mut ZoneRng) -> Obstacle {
    Obstacle {
        position,
        kind: ObstacleKind::Resource(resource),
        radius: rng.range(28.0, 40.0),
        rotation: roll_rotation(rng),
        destructible: true,
        hit_points: 80.0,
    }
}

pub(crate) fn generator_obstacle(position: Vec2, rng: &mut ZoneRng) -> Obstacle {
    Obstacle {
        position,
        kind: ObstacleKind::Generator,
        radius: 40.0,
        rotation: roll_rotation(rng),
        destructible: true,
        hit_points: 400.0,
    }
}

fn roll_class(tier: &TierConfig, rng: &mut ZoneRng) -> ObstacleClass {
    rng.pick_weighted(&tier.obstacle_pool).copied().unwrap_or(ObstacleClass::Asteroid)
}

/// Places up to `budget` obstacles.
pub(crate) fn place_obstacles(
    layout: &Layout,
    tier: &TierConfig,
    clearance: Clearance,
    budget: u32,
    rng: &mut ZoneRng,
) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();

    let wall_budget = share_of(budget, 2, 5);
    let cluster_budget = share_of(budget, 3, 10);
    place_corridor_walls(layout, tier, clearance, wall_budget, rng, &mut obstacles);
    place_clusters(layout, tier, clearance, cluster_budget, rng, &mut obstacles);

    let remaining = budget.saturating_sub(obstacles.len() as u32);
    for position in scatter(layout, remaining, 0.0, clearance, rng) {
        let hazard = if rng.chance(tier.hazard_chance) {
            rng.pick_weighted(&tier.hazards).copied()
        } else {
            None
        };
        let obstacle = match hazard {
            Some(hazard) => hazard_obstacle(hazard, position, rng),
            None => class_obstacle(roll_class(tier, rng), position, tier, rng),
        };
        obstacles.push(obstacle);
    }

    obstacles
}

/// `budget * num / den` without overflow.
fn share_of(budget: u32, num: u64, den: u64) -> u32 {
    (u64::from(budget) * num / den) as u32
}

/// Two walls along each of 2-4 jittered paths across the zone.
fn place_corridor_walls(
    layout: &Layout,
    tier: &TierConfig,
    clearance: Clearance,
    budget: u32,
    rng: &mut ZoneRng,
    out: &mut Vec<Obstacle>,
) {
    if budget == 0 {
        return;
    }
    let paths = rng.int(2, 4) as u32;
    for path in 0..paths {
        let share = budget / paths + u32::from(path < budget % paths);
        if share == 0 {
            continue;
        }
        let start = layout.random_point(rng);
        let end = layout.random_point(rng);
        let side = (end - start).normalize_or_zero().perp();
        let segments = share.div_ceil(2);

        for j in 0..share {
            let t = ((j / 2) as f32 + 0.5) / segments as f32;
            let wall = if j % 2 == 0 { 1.0 } else { -1.0 };
            let offset = wall * CORRIDOR_HALF_WIDTH + rng.range(-CORRIDOR_JITTER, CORRIDOR_JITTER);
            let p = layout.bounds.clamp(start.lerp(end, t) + side * offset);
            if !layout.is_clear(p, clearance) {
                continue;
            }
            let class = match roll_class(tier, rng) {
                ObstacleClass::Mine => ObstacleClass::Pillar,
                other => other,
            };
            out.push(class_obstacle(class, p, tier, rng));
        }
    }
}

/// 3-6 dense clumps of 8-20 obstacles.
fn place_clusters(
    layout: &Layout,
    tier: &TierConfig,
    clearance: Clearance,
    budget: u32,
    rng: &mut ZoneRng,
    out: &mut Vec<Obstacle>,
) {
    let mut remaining = budget;
    let clusters = rng.int(3, 6);
    for _ in 0..clusters {
        if remaining == 0 {
            break;
        }
        let size = (rng.int(8, 20) as u32).min(remaining);
        remaining -= size;
        let center = layout.random_point(rng);
        for _ in 0..size {
            let offset = Vec2::from_angle(rng.range(0.0, TAU)) * rng.range(0.0, CLUSTER_RADIUS);
            let p = layout.bounds.clamp(center + offset);
            if layout.is_clear(p, clearance) {
                out.push(class_obstacle(roll_class(tier, rng), p, tier, rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::ZoneSeed;

    fn layout() -> Layout {
        Layout::new(3000.0, 2000.0, 80.0, Vec2::new(80.0, 1000.0), vec![Vec2::new(2920.0, 1000.0)])
    }

    #[test]
    fn test_obstacles_within_budget_and_clear() {
        let tier = TierConfig::derelict_fleet();
        let clearance = Clearance { spawn: 150.0, exit: 150.0 };
        for seed in 0..16 {
            let mut rng = ZoneRng::new(ZoneSeed::new(seed));
            let obstacles = place_obstacles(&layout(), &tier, clearance, 120, &mut rng);
            assert!(obstacles.len() <= 120);
            assert!(obstacles.len() > 60);
            for o in &obstacles {
                assert!(layout().bounds.contains(o.position));
                assert!(layout().is_clear(o.position, clearance));
                assert!(o.radius > 0.0);
            }
        }
    }

    #[test]
    fn test_budget_split_holds_at_the_top_of_the_range() {
        assert_eq!(share_of(100, 2, 5), 40);
        assert_eq!(share_of(100, 3, 10), 30);
        assert_eq!(share_of(u32::MAX, 2, 5), 1_717_986_918);
        assert_eq!(share_of(u32::MAX, 3, 10), 1_288_490_188);
    }

    #[test]
    fn test_hazards_carry_their_data() {
        let mut tier = TierConfig::derelict_fleet();
        tier.hazard_chance = 1.0;
        let mut rng = ZoneRng::new(ZoneSeed::new(4));
        let obstacles = place_obstacles(&layout(), &tier, Clearance::NONE, 100, &mut rng);

        let hazards: Vec<&Obstacle> = obstacles.iter().filter(|o| o.is_hazard()).collect();
        assert!(!hazards.is_empty());
        for o in hazards {
            assert!(!o.destructible);
            if let ObstacleKind::Hazard(h) = o.kind {
                assert!(h.damage > 0.0);
            }
        }
    }

    #[test]
    fn test_zero_budget() {
        let mut rng = ZoneRng::new(ZoneSeed::new(4));
        assert!(place_obstacles(&layout(), &TierConfig::default(), Clearance::NONE, 0, &mut rng).is_empty());
    }
}
