//! The search tree - four node kinds, one recursive value function
//!
//! A turn cycles through turn-order chance, a deterministic choice for
//! the side still to move, per-action resolution chance, and post-turn
//! chance, then repeats one level deeper. Nodes are plain values built
//! on demand and dropped once their value is computed; no tree survives
//! the call.

use crate::battle::constants::{
    CONFUSION_SELF_HIT_CHANCE, PARALYSIS_ACT_CHANCE, PROBABILITY_TOLERANCE,
};
use crate::battle::engine::total_probability;
use crate::battle::{Action, Engine, Side, Snapshot, Status, Unit};
use crate::core::error::{AgentError, Result};
use crate::search::cancel::CancelToken;
use crate::search::evaluate::evaluate;
use crate::search::ordering::ordered_actions;

/// Everything a recursive walk needs, shared by reference
pub struct SearchContext<'a, E: Engine> {
    pub engine: &'a E,
    pub me: Side,
    pub max_depth: u32,
    pub max_branch: usize,
    pub cancel: &'a CancelToken,
}

/// What still has to happen after a resolution node finishes
#[derive(Debug, Clone)]
pub enum AfterResolution {
    /// The other side's action resolves next, on whatever came out
    Chained { side: Side, action: Action },
    /// Both actions are done; the turn ends
    EndTurn,
}

/// One node of the search tree
///
/// Each node owns its snapshot; sibling branches never share state.
#[derive(Debug, Clone)]
pub enum SearchNode {
    /// Averages over move pairings and turn-order ambiguity
    TurnOrder { snapshot: Snapshot, depth: u32 },
    /// First action fixed, the remaining side chooses: minimax with
    /// alpha-beta pruning
    Deterministic {
        snapshot: Snapshot,
        depth: u32,
        first_side: Side,
        first_action: Action,
        second_side: Side,
    },
    /// Expectation over the execution chances of one fixed action
    MoveResolution {
        snapshot: Snapshot,
        depth: u32,
        acting: Side,
        action: Action,
        after: AfterResolution,
    },
    /// End-of-turn effects and forced replacements
    PostTurn { snapshot: Snapshot, depth: u32 },
}

/// Compute the backed-up value of a node
///
/// Alpha-beta bounds travel down the whole recursion; only
/// deterministic nodes tighten or act on them.
pub fn node_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    node: SearchNode,
    alpha: f64,
    beta: f64,
) -> Result<f64> {
    if ctx.cancel.is_cancelled() {
        return Err(AgentError::Cancelled);
    }

    match node {
        SearchNode::TurnOrder { snapshot, depth } => turn_order_value(ctx, snapshot, depth),
        SearchNode::Deterministic {
            snapshot,
            depth,
            first_side,
            first_action,
            second_side,
        } => deterministic_value(ctx, snapshot, depth, first_side, first_action, second_side, alpha, beta),
        SearchNode::MoveResolution {
            snapshot,
            depth,
            acting,
            action,
            after,
        } => move_resolution_value(ctx, snapshot, depth, acting, action, after, alpha, beta),
        SearchNode::PostTurn { snapshot, depth } => {
            post_turn_value(ctx, snapshot, depth, alpha, beta)
        }
    }
}

/// Possible resolution orders for one pairing of declared actions
///
/// Priority decides, speed breaks priority ties (after the paralysis
/// penalty), and an exact speed tie yields both orderings.
pub fn resolution_orders(
    snapshot: &Snapshot,
    side_a: Side,
    action_a: &Action,
    side_b: Side,
    action_b: &Action,
) -> Vec<(Side, Action, Side)> {
    let a_first = vec![(side_a, action_a.clone(), side_b)];
    let b_first = vec![(side_b, action_b.clone(), side_a)];

    if action_a.priority() > action_b.priority() {
        return a_first;
    }
    if action_b.priority() > action_a.priority() {
        return b_first;
    }

    let speed_a = snapshot.active(side_a).effective_speed();
    let speed_b = snapshot.active(side_b).effective_speed();
    if speed_a > speed_b {
        a_first
    } else if speed_b > speed_a {
        b_first
    } else {
        vec![
            (side_a, action_a.clone(), side_b),
            (side_b, action_b.clone(), side_a),
        ]
    }
}

fn turn_order_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    snapshot: Snapshot,
    depth: u32,
) -> Result<f64> {
    if snapshot.is_over() || depth >= ctx.max_depth {
        return Ok(evaluate(&snapshot, ctx.me));
    }

    let mine = ordered_actions(&snapshot, ctx.me, ctx.max_branch);
    let theirs = ordered_actions(&snapshot, ctx.me.rival(), ctx.max_branch);
    if mine.is_empty() || theirs.is_empty() {
        return Ok(evaluate(&snapshot, ctx.me));
    }

    let mut total = 0.0;
    let mut count = 0u32;
    for my_action in &mine {
        for their_action in &theirs {
            for (first_side, first_action, second_side) in
                resolution_orders(&snapshot, ctx.me, my_action, ctx.me.rival(), their_action)
            {
                let child = SearchNode::Deterministic {
                    snapshot: snapshot.clone(),
                    depth: depth + 1,
                    first_side,
                    first_action,
                    second_side,
                };
                total += node_value(ctx, child, f64::NEG_INFINITY, f64::INFINITY)?;
                count += 1;
            }
        }
    }

    Ok(total / f64::from(count))
}

#[allow(clippy::too_many_arguments)]
fn deterministic_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    snapshot: Snapshot,
    depth: u32,
    first_side: Side,
    first_action: Action,
    second_side: Side,
    mut alpha: f64,
    mut beta: f64,
) -> Result<f64> {
    if snapshot.is_over() || depth >= ctx.max_depth {
        return Ok(evaluate(&snapshot, ctx.me));
    }

    let maximizing = second_side == ctx.me;
    let candidates = ordered_actions(&snapshot, second_side, ctx.max_branch);

    // A side with nothing legal left just watches the fixed action land
    if candidates.is_empty() {
        let child = SearchNode::MoveResolution {
            snapshot,
            depth,
            acting: first_side,
            action: first_action,
            after: AfterResolution::EndTurn,
        };
        return node_value(ctx, child, alpha, beta);
    }

    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for candidate in candidates {
        let child = SearchNode::MoveResolution {
            snapshot: snapshot.clone(),
            depth,
            acting: first_side,
            action: first_action.clone(),
            after: AfterResolution::Chained {
                side: second_side,
                action: candidate,
            },
        };
        let value = node_value(ctx, child, alpha, beta)?;

        if maximizing {
            best = best.max(value);
            alpha = alpha.max(best);
        } else {
            best = best.min(value);
            beta = beta.min(best);
        }
        if alpha >= beta {
            break;
        }
    }

    Ok(best)
}

/// Chance the acting unit executes anything at all, and the chance the
/// executed thing is a confusion self-hit
fn execution_chances(unit: &Unit, action: &Action) -> (f64, f64) {
    // Switching out is never blocked by status or flinch
    if action.is_switch() {
        return (1.0, 0.0);
    }

    let success = if unit.flags.flinched {
        0.0
    } else {
        match unit.status {
            Status::Sleep | Status::Freeze => 0.0,
            Status::Paralysis => PARALYSIS_ACT_CHANCE,
            _ => 1.0,
        }
    };

    let confuse = if unit.flags.confused {
        CONFUSION_SELF_HIT_CHANCE
    } else {
        0.0
    };

    (success, confuse)
}

#[allow(clippy::too_many_arguments)]
fn move_resolution_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    snapshot: Snapshot,
    depth: u32,
    acting: Side,
    action: Action,
    after: AfterResolution,
    alpha: f64,
    beta: f64,
) -> Result<f64> {
    if snapshot.is_over() {
        return Ok(evaluate(&snapshot, ctx.me));
    }

    // A unit knocked out earlier in the turn takes no action
    if snapshot.active(acting).is_fainted() {
        return continuation_value(ctx, snapshot, depth, after, alpha, beta);
    }

    let (success, confuse) = execution_chances(snapshot.active(acting), &action);
    let correct_chance = success * (1.0 - confuse);
    let self_hit_chance = success * confuse;
    let fail_chance = 1.0 - success;
    debug_assert!(
        (correct_chance + self_hit_chance + fail_chance - 1.0).abs() < PROBABILITY_TOLERANCE
    );

    let mut expected = 0.0;

    if correct_chance > 0.0 {
        expected += correct_chance
            * resolved_outcomes_value(ctx, &snapshot, depth, acting, &action, &after, alpha, beta)?;
    }

    if self_hit_chance > 0.0 {
        let self_hit = Action::confusion_self_hit();
        expected += self_hit_chance
            * resolved_outcomes_value(ctx, &snapshot, depth, acting, &self_hit, &after, alpha, beta)?;
    }

    if fail_chance > 0.0 {
        expected +=
            fail_chance * continuation_value(ctx, snapshot, depth, after, alpha, beta)?;
    }

    Ok(expected)
}

/// Expectation over the engine's outcomes of one concrete action
#[allow(clippy::too_many_arguments)]
fn resolved_outcomes_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    snapshot: &Snapshot,
    depth: u32,
    acting: Side,
    action: &Action,
    after: &AfterResolution,
    alpha: f64,
    beta: f64,
) -> Result<f64> {
    let outcomes = ctx.engine.apply_action(snapshot, acting, action)?;
    debug_assert!((total_probability(&outcomes) - 1.0).abs() < PROBABILITY_TOLERANCE);

    let mut expected = 0.0;
    for outcome in outcomes {
        let value =
            continuation_value(ctx, outcome.snapshot, depth, after.clone(), alpha, beta)?;
        expected += outcome.probability * value;
    }
    Ok(expected)
}

fn continuation_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    snapshot: Snapshot,
    depth: u32,
    after: AfterResolution,
    alpha: f64,
    beta: f64,
) -> Result<f64> {
    match after {
        AfterResolution::Chained { side, action } => {
            let child = SearchNode::MoveResolution {
                snapshot,
                depth,
                acting: side,
                action,
                after: AfterResolution::EndTurn,
            };
            node_value(ctx, child, alpha, beta)
        }
        AfterResolution::EndTurn => {
            let child = SearchNode::PostTurn {
                snapshot,
                depth: depth + 1,
            };
            node_value(ctx, child, alpha, beta)
        }
    }
}

fn post_turn_value<E: Engine>(
    ctx: &SearchContext<'_, E>,
    snapshot: Snapshot,
    depth: u32,
    alpha: f64,
    beta: f64,
) -> Result<f64> {
    if snapshot.is_over() || depth >= ctx.max_depth {
        return Ok(evaluate(&snapshot, ctx.me));
    }

    let continuations = ctx.engine.apply_post_turn(&snapshot)?;

    // An engine returning nothing means nothing happened
    if continuations.is_empty() {
        let child = SearchNode::TurnOrder { snapshot, depth };
        return node_value(ctx, child, alpha, beta);
    }

    let count = continuations.len() as f64;
    let mut total = 0.0;
    for next in continuations {
        let child = SearchNode::TurnOrder {
            snapshot: next,
            depth,
        };
        total += node_value(ctx, child, alpha, beta)?;
    }

    Ok(total / count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::Outcome;
    use crate::battle::{ElementType, MoveSpec, StatBlock, Team};

    /// Deterministic stub: attacks always land for a fixed chunk of
    /// damage, post-turn does nothing.
    #[derive(Clone)]
    struct FixedDamageEngine {
        damage: u32,
    }

    impl Engine for FixedDamageEngine {
        fn apply_action(
            &self,
            snapshot: &Snapshot,
            acting: Side,
            action: &Action,
        ) -> Result<Vec<Outcome>> {
            let mut next = snapshot.clone();
            match action {
                Action::Attack { spec, .. } => {
                    let target = if spec.targets_self {
                        acting
                    } else {
                        acting.rival()
                    };
                    let unit = next.team_mut(target).active_unit_mut();
                    unit.stats.hp = unit.stats.hp.saturating_sub(self.damage);
                }
                Action::Switch { target } => {
                    next.team_mut(acting).active = *target;
                }
            }
            Ok(Outcome::certain(next))
        }

        fn apply_post_turn(&self, snapshot: &Snapshot) -> Result<Vec<Snapshot>> {
            Ok(vec![snapshot.clone()])
        }
    }

    fn unit_with_speed(speed: u32) -> Unit {
        Unit::new("pawn", ElementType::Normal, StatBlock::new(100, 50, 50, speed)).with_move(
            MoveSpec::new("tackle", ElementType::Normal, Some(40), 100),
            10,
        )
    }

    fn snapshot(speed_a: u32, speed_b: u32) -> Snapshot {
        Snapshot::new(
            Team::new(vec![unit_with_speed(speed_a)]),
            Team::new(vec![unit_with_speed(speed_b)]),
        )
    }

    fn tackle(snap: &Snapshot, side: Side) -> Action {
        Action::attack(0, snap.active(side).moves[0].spec.clone())
    }

    #[test]
    fn test_faster_unit_resolves_first() {
        let snap = snapshot(90, 30);
        let a = tackle(&snap, Side::A);
        let b = tackle(&snap, Side::B);
        let orders = resolution_orders(&snap, Side::A, &a, Side::B, &b);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].0, Side::A);
    }

    #[test]
    fn test_priority_beats_speed() {
        let snap = {
            let slow = Unit::new("slow", ElementType::Normal, StatBlock::new(100, 50, 50, 10))
                .with_move(
                    MoveSpec::new("jab", ElementType::Normal, Some(30), 100).with_priority(1),
                    10,
                );
            Snapshot::new(Team::new(vec![slow]), Team::new(vec![unit_with_speed(200)]))
        };
        let a = tackle(&snap, Side::A);
        let b = tackle(&snap, Side::B);
        let orders = resolution_orders(&snap, Side::A, &a, Side::B, &b);
        assert_eq!(orders[0].0, Side::A);
    }

    #[test]
    fn test_exact_speed_tie_branches_both_ways() {
        let snap = snapshot(60, 60);
        let a = tackle(&snap, Side::A);
        let b = tackle(&snap, Side::B);
        let orders = resolution_orders(&snap, Side::A, &a, Side::B, &b);
        assert_eq!(orders.len(), 2);
        assert_ne!(orders[0].0, orders[1].0);
    }

    #[test]
    fn test_paralysis_penalty_flips_order() {
        let mut snap = snapshot(70, 60);
        snap.team_mut(Side::A).active_unit_mut().status = Status::Paralysis;
        let a = tackle(&snap, Side::A);
        let b = tackle(&snap, Side::B);
        // 70 * 0.75 = 52.5 < 60
        let orders = resolution_orders(&snap, Side::A, &a, Side::B, &b);
        assert_eq!(orders[0].0, Side::B);
    }

    #[test]
    fn test_terminal_node_returns_static_evaluation() {
        let engine = FixedDamageEngine { damage: 10 };
        let cancel = CancelToken::new();
        let ctx = SearchContext {
            engine: &engine,
            me: Side::A,
            max_depth: 3,
            max_branch: 5,
            cancel: &cancel,
        };
        let snap = snapshot(50, 50);
        let node = SearchNode::TurnOrder {
            snapshot: snap.clone(),
            depth: 3,
        };
        let value = node_value(&ctx, node, f64::NEG_INFINITY, f64::INFINITY).unwrap();
        assert_eq!(value, evaluate(&snap, Side::A));
    }

    #[test]
    fn test_paralysis_resolution_weights() {
        // success 0.75, no confusion, fail 0.25: the node value must be
        // exactly the weighted mix of the hit and no-op continuations.
        let engine = FixedDamageEngine { damage: 30 };
        let cancel = CancelToken::new();
        let ctx = SearchContext {
            engine: &engine,
            me: Side::A,
            max_depth: 1,
            max_branch: 5,
            cancel: &cancel,
        };
        let mut snap = snapshot(50, 50);
        snap.team_mut(Side::A).active_unit_mut().status = Status::Paralysis;

        let action = tackle(&snap, Side::A);
        let node = SearchNode::MoveResolution {
            snapshot: snap.clone(),
            depth: 0,
            acting: Side::A,
            action: action.clone(),
            after: AfterResolution::EndTurn,
        };
        let value = node_value(&ctx, node, f64::NEG_INFINITY, f64::INFINITY).unwrap();

        let hit = engine.apply_action(&snap, Side::A, &action).unwrap();
        let hit_value = evaluate(&hit[0].snapshot, Side::A);
        let miss_value = evaluate(&snap, Side::A);
        let expected = PARALYSIS_ACT_CHANCE * hit_value + (1.0 - PARALYSIS_ACT_CHANCE) * miss_value;
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_confusion_splits_success_mass() {
        let engine = FixedDamageEngine { damage: 30 };
        let cancel = CancelToken::new();
        let ctx = SearchContext {
            engine: &engine,
            me: Side::A,
            max_depth: 1,
            max_branch: 5,
            cancel: &cancel,
        };
        let mut snap = snapshot(50, 50);
        snap.team_mut(Side::A).active_unit_mut().flags.confused = true;

        let action = tackle(&snap, Side::A);
        let node = SearchNode::MoveResolution {
            snapshot: snap.clone(),
            depth: 0,
            acting: Side::A,
            action: action.clone(),
            after: AfterResolution::EndTurn,
        };
        let value = node_value(&ctx, node, f64::NEG_INFINITY, f64::INFINITY).unwrap();

        let hit = engine.apply_action(&snap, Side::A, &action).unwrap();
        let self_hit = engine
            .apply_action(&snap, Side::A, &Action::confusion_self_hit())
            .unwrap();
        let expected = CONFUSION_SELF_HIT_CHANCE * evaluate(&hit[0].snapshot, Side::A)
            + CONFUSION_SELF_HIT_CHANCE * evaluate(&self_hit[0].snapshot, Side::A);
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_flinch_blocks_everything() {
        let unit = unit_with_speed(50);
        let mut snap = Snapshot::new(
            Team::new(vec![unit.clone()]),
            Team::new(vec![unit]),
        );
        snap.team_mut(Side::A).active_unit_mut().flags.flinched = true;
        let action = tackle(&snap, Side::A);
        let (success, _) = execution_chances(snap.active(Side::A), &action);
        assert_eq!(success, 0.0);
    }

    #[test]
    fn test_switch_ignores_status_blocks() {
        let mut unit = unit_with_speed(50);
        unit.status = Status::Sleep;
        let (success, confuse) = execution_chances(&unit, &Action::switch(1));
        assert_eq!((success, confuse), (1.0, 0.0));
    }

    #[test]
    fn test_cancelled_search_unwinds() {
        let engine = FixedDamageEngine { damage: 10 };
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = SearchContext {
            engine: &engine,
            me: Side::A,
            max_depth: 3,
            max_branch: 5,
            cancel: &cancel,
        };
        let node = SearchNode::TurnOrder {
            snapshot: snapshot(50, 50),
            depth: 0,
        };
        let result = node_value(&ctx, node, f64::NEG_INFINITY, f64::INFINITY);
        assert!(matches!(result, Err(AgentError::Cancelled)));
    }
}
