//! # Branch Exits
//!
//! From [`BRANCH_EXIT_MIN_DEPTH`] on, the single exit becomes a choice of
//! routes spread along the exit edge. The vault can be missing at low
//! depth.

use voidline_core::ZoneRng;

use crate::config::TuningTable;
use crate::placement::spawns::Endpoints;
use crate::zone::{BranchExit, Route};

/// Shallowest depth with branch exits.
pub const BRANCH_EXIT_MIN_DEPTH: u32 = 3;

/// Trigger radius of a branch exit.
pub const BRANCH_EXIT_RADIUS: f32 = 60.0;

/// Slots along the exit edge.
const SLOTS: [f32; 3] = [1.0 / 6.0, 0.5, 5.0 / 6.0];

/// Modifier delta and loot multiplier of a route.
#[must_use]
pub const fn route_terms(route: Route) -> (i32, f32) {
    match route {
        Route::Safe => (-1, 1.0),
        Route::Risky => (1, 1.5),
        Route::Vault => (2, 2.0),
    }
}

/// Plans branch exits. The safe route comes first.
pub(crate) fn plan_branch_exits(
    ends: &Endpoints,
    width: f32,
    height: f32,
    tuning: &TuningTable,
    depth: u32,
    rng: &mut ZoneRng,
) -> Option<Vec<BranchExit>> {
    if depth < BRANCH_EXIT_MIN_DEPTH {
        return None;
    }

    let mut slots = SLOTS;
    rng.shuffle(&mut slots);
    let skip_vault = depth < tuning.vault_guaranteed_depth && rng.chance(tuning.vault_skip_chance);

    let margin = tuning.edge_margin.min(width * 0.5).min(height * 0.5);
    let exits = [Route::Safe, Route::Risky, Route::Vault]
        .into_iter()
        .zip(slots)
        .filter(|(route, _)| !(skip_vault && *route == Route::Vault))
        .map(|(route, t)| {
            let (modifier_delta, loot_multiplier) = route_terms(route);
            BranchExit {
                position: ends.exit_edge.point(width, height, margin, t),
                radius: BRANCH_EXIT_RADIUS,
                route,
                modifier_delta,
                loot_multiplier,
            }
        })
        .collect();
    Some(exits)
}
