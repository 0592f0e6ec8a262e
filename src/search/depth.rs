//! Depth budget that grows as the match thins out
//!
//! Early turns are wide, so search shallow; every faint narrows the
//! state space and buys a deeper look.

use crate::battle::constants::{MAX_SEARCH_DEPTH, MIN_SEARCH_DEPTH};
use crate::battle::Snapshot;

/// Depth bound for a given number of fainted units since the baseline
pub fn compute_depth(fainted: u32) -> u32 {
    (3 * (1 + fainted / 4)).clamp(MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH)
}

/// Tracks the alive-unit baseline across a match
///
/// The first call fixes the baseline; every later call recomputes the
/// bound fresh from the current snapshot. Nothing is cached between
/// decisions.
#[derive(Debug, Clone, Default)]
pub struct DepthController {
    baseline: Option<u32>,
}

impl DepthController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth bound for this decision
    pub fn depth_for(&mut self, snapshot: &Snapshot) -> u32 {
        let alive = snapshot.alive_count() as u32;
        let baseline = *self.baseline.get_or_insert(alive);
        compute_depth(baseline.saturating_sub(alive))
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_depth_always_clamped(fainted in 0u32..1000) {
            let depth = compute_depth(fainted);
            prop_assert!((MIN_SEARCH_DEPTH..=MAX_SEARCH_DEPTH).contains(&depth));
        }

        #[test]
        fn prop_depth_monotone_in_faints(fainted in 0u32..999) {
            prop_assert!(compute_depth(fainted + 1) >= compute_depth(fainted));
        }
    }
}
