//! Root-level decision making
//!
//! Scores every ordered candidate for the acting side and keeps the
//! best. The opponent's same-turn reply is not enumerated at the root;
//! it is folded in by the deterministic nodes one cycle down.

use std::time::Duration;

use crate::battle::{Action, Engine, Side, Snapshot};
use crate::core::config::SearchConfig;
use crate::core::error::{AgentError, Result};
use crate::search::cancel::CancelToken;
use crate::search::candidates::legal_switches;
use crate::search::ordering::ordered_actions;
use crate::search::tree::{node_value, AfterResolution, SearchContext, SearchNode};

/// The decision handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenAction {
    pub action: Action,
    pub elapsed: Duration,
}

/// Single-decision search over one engine
#[derive(Debug, Clone)]
pub struct SearchDriver<E: Engine> {
    engine: E,
    side: Side,
    config: SearchConfig,
}

impl<E: Engine> SearchDriver<E> {
    pub fn new(engine: E, side: Side, config: SearchConfig) -> Result<Self> {
        config.validate().map_err(AgentError::InvalidConfig)?;
        Ok(Self {
            engine,
            side,
            config,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Pick the best action for this side at the given depth bound
    ///
    /// First-seen wins ties, so move ordering decides between equally
    /// valued candidates.
    pub fn choose_action(
        &self,
        snapshot: &Snapshot,
        max_depth: u32,
        cancel: &CancelToken,
    ) -> Result<Action> {
        let ctx = SearchContext {
            engine: &self.engine,
            me: self.side,
            max_depth,
            max_branch: self.config.max_branch,
            cancel,
        };

        let candidates = ordered_actions(snapshot, self.side, self.config.max_branch);
        if candidates.is_empty() {
            return Err(AgentError::NoLegalActions(self.side));
        }

        let mut best: Option<(Action, f64)> = None;
        for action in candidates {
            let node = SearchNode::MoveResolution {
                snapshot: snapshot.clone(),
                depth: 0,
                acting: self.side,
                action: action.clone(),
                after: AfterResolution::EndTurn,
            };
            let value = node_value(&ctx, node, f64::NEG_INFINITY, f64::INFINITY)?;
            tracing::debug!(?action, value, "scored root candidate");

            let better = match &best {
                None => true,
                Some((_, best_value)) => value > *best_value,
            };
            if better {
                best = Some((action, value));
            }
        }

        let (action, value) = best.ok_or(AgentError::NoLegalActions(self.side))?;
        tracing::info!(?action, value, max_depth, "chose action");
        Ok(action)
    }

    /// Pick the best replacement after this side's active unit fainted
    ///
    /// Same machinery, entered one step into the turn cycle: each legal
    /// switch is applied and its continuations are valued as fresh
    /// turn-order nodes. None when there is nothing left to send out.
    pub fn choose_replacement(
        &self,
        snapshot: &Snapshot,
        max_depth: u32,
        cancel: &CancelToken,
    ) -> Result<Option<Action>> {
        let ctx = SearchContext {
            engine: &self.engine,
            me: self.side,
            max_depth,
            max_branch: self.config.max_branch,
            cancel,
        };

        let switches = legal_switches(snapshot, self.side);
        if switches.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(Action, f64)> = None;
        for action in switches {
            let outcomes = self.engine.apply_action(snapshot, self.side, &action)?;
            let mut expected = 0.0;
            for outcome in outcomes {
                let node = SearchNode::TurnOrder {
                    snapshot: outcome.snapshot,
                    depth: 0,
                };
                expected += outcome.probability
                    * node_value(&ctx, node, f64::NEG_INFINITY, f64::INFINITY)?;
            }
            tracing::debug!(?action, expected, "scored replacement");

            let better = match &best {
                None => true,
                Some((_, best_value)) => expected > *best_value,
            };
            if better {
                best = Some((action, expected));
            }
        }

        Ok(best.map(|(action, _)| action))
    }
}
