//! Candidate action generation

use crate::battle::{Action, Side, Snapshot};

/// Every legal action for a side: moves with remaining uses, plus
/// switches to standing bench units unless the active unit is trapped
pub fn legal_actions(snapshot: &Snapshot, side: Side) -> Vec<Action> {
    let team = snapshot.team(side);
    let unit = team.active_unit();

    let mut actions: Vec<Action> = unit
        .moves
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.pp > 0)
        .map(|(idx, slot)| Action::attack(idx, slot.spec.clone()))
        .collect();

    if !unit.flags.trapped {
        for target in team.bench_choices() {
            actions.push(Action::switch(target));
        }
    }

    actions
}

/// Only the switch actions, for forced replacement after a faint
pub fn legal_switches(snapshot: &Snapshot, side: Side) -> Vec<Action> {
    snapshot
        .team(side)
        .bench_choices()
        .into_iter()
        .map(Action::switch)
        .collect()
}
