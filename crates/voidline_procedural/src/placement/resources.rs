//! Mineable resource nodes, independent of points of interest.

use voidline_core::{Weighted, ZoneRng};

use super::obstacles::resource_obstacle;
use super::{scatter, Caps, Clearance, Layout};
use crate::config::TuningTable;
use crate::zone::{Obstacle, ResourceKind, ResourceNode, ResourceYield};

const KINDS: [Weighted<ResourceKind>; 3] = [
    Weighted::new(ResourceKind::Ore, 60.0),
    Weighted::new(ResourceKind::Crystal, 30.0),
    Weighted::new(ResourceKind::RareCrystal, 10.0),
];

/// Yield for a node kind at a given depth. Crystal kinds carry a bonus
/// drop chance; ore does not.
#[must_use]
pub fn resource_yield(kind: ResourceKind, depth: u32) -> ResourceYield {
    let depth_bonus = (depth as f32 * 0.05).min(1.0);
    let (base, bonus_drop_chance) = match kind {
        ResourceKind::Ore => (1.0, 0.0),
        ResourceKind::Crystal => (1.5, 0.15),
        ResourceKind::RareCrystal => (2.5, 0.35),
    };
    ResourceYield { kind, multiplier: base + depth_bonus, bonus_drop_chance }
}

/// Places nodes, appending each as a resource obstacle as well.
pub(crate) fn place_resources(
    layout: &Layout,
    tuning: &TuningTable,
    depth: u32,
    caps: Caps,
    obstacles: &mut Vec<Obstacle>,
    rng: &mut ZoneRng,
) -> Vec<ResourceNode> {
    let wanted = rng.int(tuning.resource_nodes_min as i32, tuning.resource_nodes_max as i32).max(0) as usize;
    let headroom = caps.obstacles.saturating_sub(obstacles.len());
    let budget = wanted.min(headroom) as u32;

    scatter(layout, budget, tuning.resource_spacing, Clearance::actors(tuning), rng)
        .into_iter()
        .map(|position| {
            let kind = rng.pick_weighted(&KINDS).copied().unwrap_or(ResourceKind::Ore);
            let obstacle = resource_obstacle(resource_yield(kind, depth), position, rng);
            let node = ResourceNode {
                obstacle_index: obstacles.len(),
                position,
                radius: obstacle.radius,
                resource: resource_yield(kind, depth),
            };
            obstacles.push(obstacle);
            node
        })
        .collect()
}
