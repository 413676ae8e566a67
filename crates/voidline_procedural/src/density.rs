//! # Density and Sizing
//!
//! Turns tier densities into hard entity budgets and picks zone
//! dimensions. Multipliers are applied in a fixed order: depth ramp,
//! modifiers, difficulty lane, global tuning override. The final clamp to
//! the configured maximum is the real safety net.

use voidline_core::ZoneRng;

use crate::config::{DensityMultipliers, TierConfig, TuningTable};
use crate::generator::GenerateOptions;

/// Resolved densities, entities per square unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Densities {
    /// Regular enemies.
    pub enemies: f32,
    /// Elites.
    pub elites: f32,
    /// Obstacles.
    pub obstacles: f32,
    /// Decorations.
    pub decorations: f32,
}

/// Hard entity budgets for one zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Budgets {
    /// Regular enemies from scatter placement.
    pub enemies: u32,
    /// Elites from scatter placement.
    pub elites: u32,
    /// Obstacles from walls, clusters and scatter. Leaves the obstacle
    /// reserve free for later injections.
    pub obstacles: u32,
    /// Decorations.
    pub decorations: u32,
}

/// Applies ramp, modifiers, difficulty and the global override to the
/// tier's base densities.
#[must_use]
pub fn resolve_densities(tier: &TierConfig, tuning: &TuningTable, options: &GenerateOptions) -> Densities {
    let ramp = tuning.depth_ramp(options.depth);
    let mut d = Densities {
        enemies: tier.enemy_density * ramp,
        elites: tier.elite_density * ramp,
        obstacles: tier.obstacle_density * ramp,
        decorations: tier.decoration_density,
    };

    for modifier in &options.modifiers {
        d.apply(modifier.multipliers());
    }
    d.apply(tuning.difficulty.lane(options.difficulty));
    d.apply(tuning.density);
    d
}

impl Densities {
    fn apply(&mut self, m: DensityMultipliers) {
        self.enemies *= m.enemies;
        self.elites *= m.elites;
        self.obstacles *= m.obstacles;
        self.decorations *= m.decorations;
    }

    /// `floor(area * density)` per category, clamped to the caps.
    #[must_use]
    pub fn budgets(&self, area: f32, tuning: &TuningTable) -> Budgets {
        let obstacle_cap = tuning.max_obstacles_per_zone.saturating_sub(tuning.obstacle_reserve);
        Budgets {
            enemies: count_for(area, self.enemies, tuning.max_enemy_spawns_per_zone),
            elites: count_for(area, self.elites, tuning.max_elite_spawns_per_zone),
            obstacles: count_for(area, self.obstacles, obstacle_cap),
            decorations: count_for(area, self.decorations, tuning.max_decorations_per_zone),
        }
    }
}

/// `floor(area * density)` clamped to `[0, max]`. Non-finite products
/// count as zero.
#[must_use]
pub fn count_for(area: f32, density: f32, max: u32) -> u32 {
    let raw = (f64::from(area) * f64::from(density)).floor();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    if raw >= f64::from(max) { max } else { raw as u32 }
}

/// Picks zone width and height: sampled, scaled, floored.
pub fn zone_dimensions(tier: &TierConfig, tuning: &TuningTable, rng: &mut ZoneRng) -> (f32, f32) {
    let width = (tier.width.sample(rng) * tuning.map_scale).max(tuning.min_zone_size);
    let height = (tier.height.sample(rng) * tuning.map_scale).max(tuning.min_zone_size);
    (width, height)
}
