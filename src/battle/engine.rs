//! The dynamics seam between the search and whatever resolves actions
//!
//! The search core never knows how an action plays out; it hands a
//! snapshot to an [`Engine`] and gets back a probability distribution
//! over successor snapshots. Tests substitute stubs here.

use crate::battle::moves::Action;
use crate::battle::state::Snapshot;
use crate::battle::types::Side;
use crate::core::error::Result;

/// One probability-weighted successor of applying an action
#[derive(Debug, Clone)]
pub struct Outcome {
    pub probability: f64,
    pub snapshot: Snapshot,
}

impl Outcome {
    pub fn new(probability: f64, snapshot: Snapshot) -> Self {
        Self {
            probability,
            snapshot,
        }
    }

    /// A lone outcome that happens for certain
    pub fn certain(snapshot: Snapshot) -> Vec<Outcome> {
        vec![Outcome::new(1.0, snapshot)]
    }
}

/// Summed probability mass of an outcome set
///
/// Must be 1.0 within [`crate::battle::constants::PROBABILITY_TOLERANCE`]
/// for every well-formed engine response.
pub fn total_probability(outcomes: &[Outcome]) -> f64 {
    outcomes.iter().map(|o| o.probability).sum()
}

/// Resolves battle dynamics for the search
///
/// Implementations must be pure with respect to the snapshot: the input
/// is never mutated, every successor is a fresh value. Failures are
/// fatal for the current decision; the search does not retry.
pub trait Engine {
    /// Apply one action for one side, enumerating every outcome
    fn apply_action(&self, snapshot: &Snapshot, acting: Side, action: &Action)
        -> Result<Vec<Outcome>>;

    /// Resolve end-of-turn effects, branching over forced replacements
    fn apply_post_turn(&self, snapshot: &Snapshot) -> Result<Vec<Snapshot>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Team;
    use crate::battle::types::ElementType;
    use crate::battle::unit::{StatBlock, Unit};

    fn tiny_snapshot() -> Snapshot {
        let unit = || Unit::new("pawn", ElementType::Normal, StatBlock::new(10, 10, 10, 10));
        Snapshot::new(Team::new(vec![unit()]), Team::new(vec![unit()]))
    }

    #[test]
    fn test_certain_outcome_carries_all_mass() {
        let outcomes = Outcome::certain(tiny_snapshot());
        assert_eq!(outcomes.len(), 1);
        assert_eq!(total_probability(&outcomes), 1.0);
    }

    #[test]
    fn test_total_probability_sums() {
        let snap = tiny_snapshot();
        let outcomes = vec![
            Outcome::new(0.3, snap.clone()),
            Outcome::new(0.7, snap),
        ];
        assert!((total_probability(&outcomes) - 1.0).abs() < 1e-12);
    }
}
