//! Move ordering - rank candidates so pruning bites early
//!
//! The estimate is a cheap heuristic, not an admissible bound: it can
//! drop the true best move past the truncation width. Accepted tradeoff
//! for time-bounded play.

use ordered_float::OrderedFloat;

use crate::battle::{effectiveness, Action, Side, Snapshot, Unit};
use crate::search::candidates::legal_actions;

/// Estimated value of an action against a specific defender
///
/// Switches and status moves score 0; attacks score
/// base power times the type matchup against the defender's one or two
/// elements.
pub fn estimate(action: &Action, defender: &Unit) -> f64 {
    let Action::Attack { spec, .. } = action else {
        return 0.0;
    };
    let Some(power) = spec.base_power else {
        return 0.0;
    };

    let mut matchup = effectiveness(spec.element, defender.primary_type);
    if let Some(secondary) = defender.secondary_type {
        matchup *= effectiveness(spec.element, secondary);
    }

    power as f64 * matchup
}

/// Legal actions for a side, best-estimate first, truncated to the
/// configured branching width
///
/// The sort is stable, so equal estimates keep generation order.
pub fn ordered_actions(snapshot: &Snapshot, side: Side, max_branch: usize) -> Vec<Action> {
    let defender = snapshot.active(side.rival());
    let mut actions = legal_actions(snapshot, side);
    actions.sort_by_key(|action| std::cmp::Reverse(OrderedFloat(estimate(action, defender))));
    actions.truncate(max_branch);
    actions
}
