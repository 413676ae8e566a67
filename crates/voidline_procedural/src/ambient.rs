//! Entry flavor text and danger rating.

use voidline_core::ZoneRng;

use crate::config::{Difficulty, TierConfig};
use crate::zone::{Ambient, DangerTier};

/// Danger from depth plus the difficulty lane's bonus.
#[must_use]
pub fn danger_tier(depth: u32, difficulty: Difficulty) -> DangerTier {
    match depth.saturating_add(difficulty.danger_bonus()) {
        0..=2 => DangerTier::Calm,
        3..=5 => DangerTier::Tense,
        6..=8 => DangerTier::Hostile,
        _ => DangerTier::Lethal,
    }
}

pub(crate) fn describe(tier: &TierConfig, depth: u32, difficulty: Difficulty, rng: &mut ZoneRng) -> Ambient {
    let description = rng
        .pick(&tier.ambient_lines)
        .cloned()
        .unwrap_or_else(|| format!("{}, depth {depth}.", tier.name));
    Ambient { description, danger: danger_tier(depth, difficulty) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::ZoneSeed;

    #[test]
    fn test_danger_rises() {
        assert_eq!(danger_tier(0, Difficulty::Normal), DangerTier::Calm);
        assert_eq!(danger_tier(0, Difficulty::Nightmare), DangerTier::Tense);
        assert_eq!(danger_tier(7, Difficulty::Normal), DangerTier::Hostile);
        assert_eq!(danger_tier(7, Difficulty::Veteran), DangerTier::Lethal);
        assert_eq!(danger_tier(u32::MAX, Difficulty::Nightmare), DangerTier::Lethal);
    }

    #[test]
    fn test_fallback_line() {
        let mut tier = TierConfig::asteroid_belt();
        tier.ambient_lines.clear();
        let mut rng = ZoneRng::new(ZoneSeed::new(1));
        let ambient = describe(&tier, 4, Difficulty::Normal, &mut rng);
        assert_eq!(ambient.description, "Asteroid Belt, depth 4.");
    }
}
