//! # Objectives
//!
//! Weighted choice among five archetypes. The first depths are a tutorial
//! buffer with no objective; the two harshest archetypes wait for deeper
//! zones. Lockdown places its own generator obstacles and falls back to
//! Exterminate when none fit. A zone with nothing to kill never gets a
//! kill quota: Exterminate is dropped from the draw and the Lockdown
//! fallback becomes a TimeTrial.

use voidline_core::{Weighted, ZoneRng};

use crate::config::TuningTable;
use crate::placement::obstacles::generator_obstacle;
use crate::placement::{scatter, Caps, Clearance, Layout};
use crate::zone::{BonusReward, Objective, ObjectiveKind, Obstacle};

/// Shallowest depth that gets an objective.
pub const OBJECTIVE_MIN_DEPTH: u32 = 3;

/// Shallowest depth where Survival and Corruption can appear.
pub const ADVANCED_OBJECTIVE_DEPTH: u32 = 5;

/// Minimum distance between lockdown generators.
const GENERATOR_SPACING: f32 = 320.0;

/// Archetypes eligible at `depth` with their weights.
#[must_use]
pub fn eligible_objectives(depth: u32) -> Vec<Weighted<ObjectiveKind>> {
    if depth < OBJECTIVE_MIN_DEPTH {
        return Vec::new();
    }
    let advanced = depth >= ADVANCED_OBJECTIVE_DEPTH;
    [
        (ObjectiveKind::Exterminate, 30.0, false),
        (ObjectiveKind::Survival, 20.0, true),
        (ObjectiveKind::TimeTrial, 20.0, false),
        (ObjectiveKind::Corruption, 15.0, true),
        (ObjectiveKind::Lockdown, 15.0, false),
    ]
    .into_iter()
    .filter(|&(_, _, gated)| advanced || !gated)
    .map(|(kind, weight, _)| Weighted::new(kind, weight))
    .collect()
}

/// Picks the zone objective, appending lockdown generators to `obstacles`.
/// `killable` counts regular enemies and elites.
pub(crate) fn select_objective(
    layout: &Layout,
    tuning: &TuningTable,
    depth: u32,
    killable: usize,
    caps: Caps,
    obstacles: &mut Vec<Obstacle>,
    rng: &mut ZoneRng,
) -> Option<Objective> {
    let mut eligible = eligible_objectives(depth);
    if killable == 0 {
        eligible.retain(|w| w.value != ObjectiveKind::Exterminate);
    }
    let kind = *rng.pick_weighted(&eligible)?;

    if kind == ObjectiveKind::Lockdown {
        let wanted = rng.int(2, 4) as usize;
        let budget = wanted.min(caps.obstacles.saturating_sub(obstacles.len())) as u32;
        let positions = scatter(layout, budget, GENERATOR_SPACING, Clearance::actors(tuning), rng);
        if !positions.is_empty() {
            let mut generator_indices = Vec::with_capacity(positions.len());
            for p in positions {
                generator_indices.push(obstacles.len());
                obstacles.push(generator_obstacle(p, rng));
            }
            let target = generator_indices.len() as f32;
            return Some(objective(ObjectiveKind::Lockdown, target, true, 1.5, 1, generator_indices));
        }
        tracing::trace!(killable, "no room for lockdown generators, falling back");
        return Some(exterminate(killable).unwrap_or_else(|| time_trial(layout)));
    }

    match kind {
        ObjectiveKind::Survival => {
            let seconds = (60.0 + depth as f32 * 5.0).min(150.0);
            Some(objective(kind, seconds, true, 1.4, 1, Vec::new()))
        }
        ObjectiveKind::TimeTrial => Some(time_trial(layout)),
        ObjectiveKind::Corruption => Some(objective(kind, 100.0, false, 1.6, 2, Vec::new())),
        ObjectiveKind::Exterminate | ObjectiveKind::Lockdown => exterminate(killable),
    }
}

/// Kill quota of 80% of `killable`, rounded up. `None` with nothing to kill.
fn exterminate(killable: usize) -> Option<Objective> {
    if killable == 0 {
        return None;
    }
    let quota = ((killable as f32 * 0.8).ceil()).clamp(1.0, killable as f32);
    Some(objective(ObjectiveKind::Exterminate, quota, true, 1.25, 1, Vec::new()))
}

fn time_trial(layout: &Layout) -> Objective {
    let seconds = 90.0 + layout.width.max(layout.height) / 40.0;
    objective(ObjectiveKind::TimeTrial, seconds, false, 1.5, 2, Vec::new())
}

fn objective(
    kind: ObjectiveKind,
    target: f32,
    locks_exit: bool,
    loot_multiplier: f32,
    extra_rolls: u32,
    generator_indices: Vec<usize>,
) -> Objective {
    Objective {
        kind,
        progress: 0.0,
        target,
        completed: false,
        locks_exit,
        bonus: BonusReward { loot_multiplier, extra_rolls },
        generator_indices,
    }
}
