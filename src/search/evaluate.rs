//! Static position evaluation in [-1, 1]

use crate::battle::{Side, Snapshot};

/// Score a snapshot from one side's perspective
///
/// Finished battles score exactly +1 or -1, decided by whether the
/// rival's active unit is the one that went down. Running battles score
/// the normalized share of remaining hit points. Both rosters at zero
/// combined HP is defined as a neutral 0.
pub fn evaluate(snapshot: &Snapshot, perspective: Side) -> f64 {
    if snapshot.is_over() {
        // A trade that ends the battle still removed the rival's last
        // unit, so the rival's active is checked first.
        if snapshot.active(perspective.rival()).is_fainted() {
            return 1.0;
        }
        return -1.0;
    }

    let own = snapshot.hp_total(perspective) as f64;
    let opp = snapshot.hp_total(perspective.rival()) as f64;
    if own + opp == 0.0 {
        return 0.0;
    }

    2.0 * (own / (own + opp)) - 1.0
}
