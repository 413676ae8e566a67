//! Cosmetic backdrop. Uses the same sampler as everything else but with
//! no exclusion zones, since decorations never collide.

use voidline_core::ZoneRng;

use super::spawns::roll_rotation;
use super::{scatter, Clearance, Layout};
use crate::config::TierConfig;
use crate::zone::{Decoration, DecorationKind, MAX_DECORATION_LAYER};

pub(crate) fn place_decorations(layout: &Layout, tier: &TierConfig, budget: u32, rng: &mut ZoneRng) -> Vec<Decoration> {
    scatter(layout, budget, 0.0, Clearance::NONE, rng)
        .into_iter()
        .map(|position| {
            let kind = rng.pick_weighted(&tier.decoration_pool).copied().unwrap_or(DecorationKind::Starfield);
            let layer = rng.int(0, i32::from(MAX_DECORATION_LAYER)) as u8;
            // Deeper layers read smaller on screen.
            let scale = rng.range(0.6, 1.4) / (1.0 + f32::from(layer) * 0.35);
            Decoration { position, kind, layer, scale, rotation: roll_rotation(rng) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::ZoneSeed;
    use voidline_shared::Vec2;

    #[test]
    fn test_layers_in_range_and_budget_met() {
        let layout = Layout::new(2000.0, 2000.0, 0.0, Vec2::ZERO, vec![Vec2::new(2000.0, 2000.0)]);
        let mut rng = ZoneRng::new(ZoneSeed::new(8));
        let decorations = place_decorations(&layout, &TierConfig::nebula_core(), 50, &mut rng);

        assert_eq!(decorations.len(), 50);
        assert!(decorations.iter().all(|d| d.layer <= MAX_DECORATION_LAYER));
        assert!(decorations.iter().all(|d| d.scale > 0.0));
    }
}
