//! Headless Arena Runner
//!
//! Plays the tree-search agent against a greedy baseline on the demo
//! roster, one time-bounded decision per turn, and prints a JSON or
//! text report.

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use expectimon::battle::constants::{CONFUSION_SELF_HIT_CHANCE, PARALYSIS_ACT_CHANCE};
use expectimon::battle::{Action, Engine, Side, Snapshot, Status};
use expectimon::core::config::SearchConfig;
use expectimon::core::error::{AgentError, Result};
use expectimon::search::{ordered_actions, resolution_orders, TreeAgent};
use expectimon::sim::{demo_snapshot, SimEngine};

/// Headless Arena Runner - tree search vs greedy baseline
#[derive(Parser, Debug)]
#[command(name = "arena_runner")]
#[command(about = "Run the tree-search agent against a greedy baseline")]
struct Args {
    /// Maximum turns before calling the match a draw
    #[arg(long, default_value_t = 200)]
    max_turns: u64,

    /// Random seed for deterministic outcome sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Per-decision deadline in milliseconds (overrides config)
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Optional search config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable verbose turn-by-turn logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct MatchReport {
    winner: String,
    turns: u64,
    decisions: u64,
    avg_decision_ms: f64,
    max_decision_ms: u64,
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "expectimon=debug"
    } else {
        "expectimon=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut config = match &args.config {
        Some(path) => SearchConfig::from_toml_file(path).map_err(AgentError::InvalidConfig)?,
        None => SearchConfig::default(),
    };
    if let Some(deadline_ms) = args.deadline_ms {
        config.deadline_ms = deadline_ms;
    }

    let engine = SimEngine::new();
    let mut agent = TreeAgent::new(engine, Side::A, config)?;

    let mut snapshot = demo_snapshot();
    let mut turns = 0u64;
    let mut decisions = 0u64;
    let mut total_decision_ms = 0u128;
    let mut max_decision_ms = 0u64;

    while !snapshot.is_over() && turns < args.max_turns {
        turns += 1;

        let chosen = agent.choose_action(&snapshot)?;
        decisions += 1;
        let elapsed_ms = chosen.elapsed.as_millis();
        total_decision_ms += elapsed_ms;
        max_decision_ms = max_decision_ms.max(elapsed_ms as u64);

        let baseline = match greedy_action(&snapshot, Side::B) {
            Some(action) => action,
            None => break,
        };

        if args.verbose {
            eprintln!(
                "=== Turn {} === agent: {:?} ({} ms) | baseline: {:?}",
                turns, chosen.action, elapsed_ms, baseline
            );
        }

        snapshot = play_turn(&engine, &mut rng, &snapshot, &chosen.action, &baseline)?;
        snapshot = resolve_post_turn(&engine, &mut agent, &mut rng, &snapshot)?;

        if args.verbose {
            for side in [Side::A, Side::B] {
                let unit = snapshot.active(side);
                eprintln!(
                    "  {:?}: {} {}/{} hp status={:?}",
                    side, unit.name, unit.stats.hp, unit.stats.max_hp, unit.status
                );
            }
        }
    }

    let winner = if snapshot.team(Side::A).has_available() && !snapshot.team(Side::B).has_available()
    {
        "agent"
    } else if snapshot.team(Side::B).has_available()
        && !snapshot.team(Side::A).has_available()
    {
        "baseline"
    } else {
        "draw"
    };

    let report = MatchReport {
        winner: winner.to_string(),
        turns,
        decisions,
        avg_decision_ms: if decisions > 0 {
            total_decision_ms as f64 / decisions as f64
        } else {
            0.0
        },
        max_decision_ms,
        seed,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => {
            println!("Match Report");
            println!("============");
            println!("Winner: {}", report.winner);
            println!("Turns: {}", report.turns);
            println!("Decisions: {}", report.decisions);
            println!("Avg decision: {:.1} ms", report.avg_decision_ms);
            println!("Max decision: {} ms", report.max_decision_ms);
            println!("Seed: {}", report.seed);
        }
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// The baseline just takes the top-ranked candidate
fn greedy_action(snapshot: &Snapshot, side: Side) -> Option<Action> {
    ordered_actions(snapshot, side, 1).into_iter().next()
}

/// Resolve one full turn: order the pair, then land both actions
fn play_turn(
    engine: &SimEngine,
    rng: &mut StdRng,
    snapshot: &Snapshot,
    agent_action: &Action,
    baseline_action: &Action,
) -> Result<Snapshot> {
    let orders = resolution_orders(snapshot, Side::A, agent_action, Side::B, baseline_action);
    // A speed tie is settled by coin flip here, where someone has to act
    let pick = if orders.len() > 1 && rng.gen_bool(0.5) {
        1
    } else {
        0
    };
    let (first_side, first_action, second_side) = orders[pick].clone();
    let second_action = if second_side == Side::A {
        agent_action
    } else {
        baseline_action
    };

    let mut state = sample_action(engine, rng, snapshot, first_side, &first_action)?;
    if !state.is_over() {
        state = sample_action(engine, rng, &state, second_side, second_action)?;
    }
    Ok(state)
}

/// Roll execution chances the way the search models them, then sample
/// one concrete outcome of whatever actually happens
fn sample_action(
    engine: &SimEngine,
    rng: &mut StdRng,
    snapshot: &Snapshot,
    side: Side,
    action: &Action,
) -> Result<Snapshot> {
    let unit = snapshot.active(side);
    if unit.is_fainted() {
        return Ok(snapshot.clone());
    }

    if !action.is_switch() {
        let success_chance = if unit.flags.flinched {
            0.0
        } else {
            match unit.status {
                Status::Sleep | Status::Freeze => 0.0,
                Status::Paralysis => PARALYSIS_ACT_CHANCE,
                _ => 1.0,
            }
        };
        if rng.gen::<f64>() >= success_chance {
            return Ok(snapshot.clone());
        }
        if unit.flags.confused && rng.gen::<f64>() < CONFUSION_SELF_HIT_CHANCE {
            return sample_outcome(engine, rng, snapshot, side, &Action::confusion_self_hit());
        }
    }

    sample_outcome(engine, rng, snapshot, side, action)
}

fn sample_outcome(
    engine: &SimEngine,
    rng: &mut StdRng,
    snapshot: &Snapshot,
    side: Side,
    action: &Action,
) -> Result<Snapshot> {
    let outcomes = engine.apply_action(snapshot, side, action)?;
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for outcome in &outcomes {
        cumulative += outcome.probability;
        if roll < cumulative {
            return Ok(outcome.snapshot.clone());
        }
    }
    // Floating point slack: fall back to the last branch
    outcomes
        .last()
        .map(|o| o.snapshot.clone())
        .ok_or_else(|| AgentError::Engine("engine returned no outcomes".into()))
}

/// End-of-turn effects, with each side choosing its own replacement
///
/// The engine enumerates every replacement combination; this host picks
/// the branch matching what each side actually chose.
fn resolve_post_turn(
    engine: &SimEngine,
    agent: &mut TreeAgent<SimEngine>,
    rng: &mut StdRng,
    snapshot: &Snapshot,
) -> Result<Snapshot> {
    let branches = engine.apply_post_turn(snapshot)?;
    let first = branches
        .first()
        .cloned()
        .ok_or_else(|| AgentError::Engine("post-turn resolution returned nothing".into()))?;
    if branches.len() == 1 {
        return Ok(first);
    }

    // Branches already carry replacements, so look at the slot that was
    // active when the turn ended to see who actually went down.
    let prev_a = snapshot.team(Side::A).active;
    let prev_b = snapshot.team(Side::B).active;

    let wanted_a = if first.team(Side::A).units[prev_a].is_fainted() {
        let mut decision = first.clone();
        decision.team_mut(Side::A).active = prev_a;
        decision.team_mut(Side::B).active = prev_b;
        match agent.choose_replacement(&decision)? {
            Some(chosen) => match chosen.action {
                Action::Switch { target } => Some(target),
                _ => None,
            },
            None => None,
        }
    } else {
        None
    };

    let wanted_b = if first.team(Side::B).units[prev_b].is_fainted() {
        first
            .team(Side::B)
            .units
            .iter()
            .enumerate()
            .find(|(idx, unit)| *idx != prev_b && !unit.is_fainted())
            .map(|(idx, _)| idx)
    } else {
        None
    };

    let matching = branches.iter().find(|branch| {
        wanted_a.map_or(true, |idx| branch.team(Side::A).active == idx)
            && wanted_b.map_or(true, |idx| branch.team(Side::B).active == idx)
    });

    match matching {
        Some(branch) => Ok(branch.clone()),
        // Should not happen; pick an arbitrary branch over crashing
        None => Ok(branches[rng.gen_range(0..branches.len())].clone()),
    }
}
