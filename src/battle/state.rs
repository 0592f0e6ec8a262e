//! Teams and the immutable battle snapshot

use serde::{Deserialize, Serialize};

use crate::battle::types::Side;
use crate::battle::unit::Unit;

/// One side's roster with its active unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub units: Vec<Unit>,
    pub active: usize,
}

impl Team {
    /// Create a team with the first unit active
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units, active: 0 }
    }

    pub fn active_unit(&self) -> &Unit {
        &self.units[self.active]
    }

    pub fn active_unit_mut(&mut self) -> &mut Unit {
        &mut self.units[self.active]
    }

    /// True while any unit can still fight
    pub fn has_available(&self) -> bool {
        self.units.iter().any(|u| !u.is_fainted())
    }

    /// Indices of benched units that could come in
    pub fn bench_choices(&self) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(idx, u)| *idx != self.active && !u.is_fainted())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.units.iter().filter(|u| !u.is_fainted()).count()
    }

    /// Summed current hit points across the whole roster
    pub fn hp_total(&self) -> u32 {
        self.units.iter().map(|u| u.stats.hp).sum()
    }
}

/// Immutable point-in-time view of the whole battle
///
/// Cloned per tree branch; the search never mutates one it has handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    teams: [Team; 2],
}

impl Snapshot {
    pub fn new(team_a: Team, team_b: Team) -> Self {
        Self {
            teams: [team_a, team_b],
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        &self.teams[side.index()]
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        &mut self.teams[side.index()]
    }

    pub fn active(&self, side: Side) -> &Unit {
        self.team(side).active_unit()
    }

    /// The battle ends when either side has nothing left to field
    pub fn is_over(&self) -> bool {
        !self.teams[0].has_available() || !self.teams[1].has_available()
    }

    /// Units still standing across both sides
    pub fn alive_count(&self) -> usize {
        self.teams[0].alive_count() + self.teams[1].alive_count()
    }

    pub fn hp_total(&self, side: Side) -> u32 {
        self.team(side).hp_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::types::ElementType;
    use crate::battle::unit::StatBlock;

    fn unit(name: &str, hp: u32) -> Unit {
        let mut u = Unit::new(name, ElementType::Normal, StatBlock::new(hp.max(1), 50, 50, 50));
        u.stats.hp = hp;
        u
    }

    fn snapshot(a_hp: &[u32], b_hp: &[u32]) -> Snapshot {
        Snapshot::new(
            Team::new(a_hp.iter().map(|&hp| unit("a", hp)).collect()),
            Team::new(b_hp.iter().map(|&hp| unit("b", hp)).collect()),
        )
    }

    #[test]
    fn test_battle_over_when_one_side_empty() {
        assert!(!snapshot(&[100, 50], &[80]).is_over());
        assert!(snapshot(&[100], &[0, 0]).is_over());
    }

    #[test]
    fn test_bench_choices_skip_active_and_fainted() {
        let snap = snapshot(&[100, 0, 60], &[80]);
        assert_eq!(snap.team(Side::A).bench_choices(), vec![2]);
    }

    #[test]
    fn test_hp_total_sums_current_hp() {
        let snap = snapshot(&[100, 0, 60], &[80]);
        assert_eq!(snap.hp_total(Side::A), 160);
        assert_eq!(snap.hp_total(Side::B), 80);
    }

    #[test]
    fn test_alive_count_spans_both_sides() {
        assert_eq!(snapshot(&[100, 0, 60], &[80, 0]).alive_count(), 3);
    }
}
