//! Reference battle engine
//!
//! A deliberately small implementation of the [`Engine`] seam: enough
//! dynamics to exercise the search end to end. Randomness is expressed
//! as enumerated outcome distributions, never sampled here; hosts that
//! want a concrete playthrough sample the returned distributions
//! themselves.

pub mod roster;

use crate::battle::constants::{
    BURN_ATTACK_PENALTY, BURN_CHIP_DIVISOR, DAMAGE_SCALE, POISON_CHIP_DIVISOR, STAB_MULTIPLIER,
};
use crate::battle::{
    effectiveness, Action, Engine, MoveSpec, Outcome, Side, Snapshot, Status, Unit, VolatileFlags,
};
use crate::core::error::Result;

pub use roster::demo_snapshot;

/// The crate's own battle dynamics
#[derive(Debug, Clone, Copy, Default)]
pub struct SimEngine;

impl SimEngine {
    pub fn new() -> Self {
        Self
    }

    /// Damage one connecting hit deals
    fn damage(attacker: &Unit, defender: &Unit, spec: &MoveSpec) -> u32 {
        let Some(power) = spec.base_power else {
            return 0;
        };

        let mut matchup = effectiveness(spec.element, defender.primary_type);
        if let Some(secondary) = defender.secondary_type {
            matchup *= effectiveness(spec.element, secondary);
        }
        if matchup == 0.0 {
            return 0;
        }

        let stab = if attacker.primary_type == spec.element
            || attacker.secondary_type == Some(spec.element)
        {
            STAB_MULTIPLIER
        } else {
            1.0
        };
        let burn = if attacker.status == Status::Burn {
            BURN_ATTACK_PENALTY
        } else {
            1.0
        };
        let ratio = attacker.stats.attack as f64 / safe_defense(defender);

        let raw = power as f64 * ratio * stab * matchup * burn * DAMAGE_SCALE;
        (raw.round() as u32).max(1)
    }

    /// Successor where one concrete hit has landed
    fn landed(&self, snapshot: &Snapshot, acting: Side, action: &Action, spec: &MoveSpec) -> Snapshot {
        let mut next = snapshot.clone();
        consume_pp(&mut next, acting, action);

        let target_side = if spec.targets_self {
            acting
        } else {
            acting.rival()
        };
        let damage = Self::damage(snapshot.active(acting), snapshot.active(target_side), spec);

        let target = next.team_mut(target_side).active_unit_mut();
        target.stats.hp = target.stats.hp.saturating_sub(damage);

        if let Some(status) = spec.inflicts {
            if !target.is_fainted() && target.status == Status::Healthy {
                target.status = status;
            }
        }

        next
    }

    /// Successor where the move missed: uses are spent, nothing lands
    fn missed(&self, snapshot: &Snapshot, acting: Side, action: &Action) -> Snapshot {
        let mut next = snapshot.clone();
        consume_pp(&mut next, acting, action);
        next
    }
}

fn safe_defense(defender: &Unit) -> f64 {
    defender.stats.defense.max(1) as f64
}

fn consume_pp(snapshot: &mut Snapshot, acting: Side, action: &Action) {
    if let Action::Attack {
        slot: Some(slot), ..
    } = action
    {
        if let Some(entry) = snapshot.team_mut(acting).active_unit_mut().moves.get_mut(*slot) {
            entry.pp = entry.pp.saturating_sub(1);
        }
    }
}

impl Engine for SimEngine {
    fn apply_action(
        &self,
        snapshot: &Snapshot,
        acting: Side,
        action: &Action,
    ) -> Result<Vec<Outcome>> {
        match action {
            Action::Switch { target } => {
                let mut next = snapshot.clone();
                let team = next.team_mut(acting);
                team.active_unit_mut().flags = VolatileFlags::default();
                team.active = *target;
                Ok(Outcome::certain(next))
            }
            Action::Attack { spec, .. } => {
                let hit_chance = f64::from(spec.accuracy.min(100)) / 100.0;
                if hit_chance >= 1.0 {
                    return Ok(Outcome::certain(self.landed(snapshot, acting, action, spec)));
                }

                Ok(vec![
                    Outcome::new(hit_chance, self.landed(snapshot, acting, action, spec)),
                    Outcome::new(1.0 - hit_chance, self.missed(snapshot, acting, action)),
                ])
            }
        }
    }

    fn apply_post_turn(&self, snapshot: &Snapshot) -> Result<Vec<Snapshot>> {
        let mut base = snapshot.clone();

        for side in [Side::A, Side::B] {
            let unit = base.team_mut(side).active_unit_mut();
            unit.flags.flinched = false;
            match unit.status {
                Status::Burn => {
                    let chip = unit.stats.max_hp / BURN_CHIP_DIVISOR;
                    unit.stats.hp = unit.stats.hp.saturating_sub(chip);
                }
                Status::Poison => {
                    let chip = unit.stats.max_hp / POISON_CHIP_DIVISOR;
                    unit.stats.hp = unit.stats.hp.saturating_sub(chip);
                }
                _ => {}
            }
        }

        // Branch over every forced replacement, cross product across sides
        let mut results = vec![base];
        for side in [Side::A, Side::B] {
            let mut expanded = Vec::with_capacity(results.len());
            for snap in &results {
                let team = snap.team(side);
                if !team.active_unit().is_fainted() {
                    expanded.push(snap.clone());
                    continue;
                }
                let bench = team.bench_choices();
                if bench.is_empty() {
                    expanded.push(snap.clone());
                    continue;
                }
                for choice in bench {
                    let mut next = snap.clone();
                    next.team_mut(side).active = choice;
                    expanded.push(next);
                }
            }
            results = expanded;
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::total_probability;
    use crate::battle::{ElementType, StatBlock, Team};

    fn unit(name: &str, element: ElementType) -> Unit {
        Unit::new(name, element, StatBlock::new(160, 60, 50, 70))
    }

    fn one_on_one(a: Unit, b: Unit) -> Snapshot {
        Snapshot::new(Team::new(vec![a]), Team::new(vec![b]))
    }

    #[test]
    fn test_sure_hit_yields_single_outcome() {
        let a = unit("a", ElementType::Water)
            .with_move(MoveSpec::new("water-gun", ElementType::Water, Some(40), 100), 10);
        let snap = one_on_one(a, unit("b", ElementType::Fire));
        let action = Action::attack(0, snap.active(Side::A).moves[0].spec.clone());

        let outcomes = SimEngine::new().apply_action(&snap, Side::A, &action).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].snapshot.active(Side::B).stats.hp < 160);
    }

    #[test]
    fn test_shaky_hit_splits_probability_mass() {
        let a = unit("a", ElementType::Normal)
            .with_move(MoveSpec::new("wild-swing", ElementType::Normal, Some(80), 70), 10);
        let snap = one_on_one(a, unit("b", ElementType::Normal));
        let action = Action::attack(0, snap.active(Side::A).moves[0].spec.clone());

        let outcomes = SimEngine::new().apply_action(&snap, Side::A, &action).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!((outcomes[0].probability - 0.7).abs() < 1e-12);
        assert!((total_probability(&outcomes) - 1.0).abs() < 1e-12);
        // The miss branch still spends a use
        assert_eq!(outcomes[1].snapshot.active(Side::A).moves[0].pp, 9);
        assert_eq!(outcomes[1].snapshot.active(Side::B).stats.hp, 160);
    }

    #[test]
    fn test_type_matchup_scales_damage() {
        let attacker = unit("a", ElementType::Electric)
            .with_move(MoveSpec::new("spark", ElementType::Electric, Some(60), 100), 10);
        let strong = SimEngine::damage(
            &attacker,
            &unit("bird", ElementType::Flying),
            &attacker.moves[0].spec,
        );
        let weak = SimEngine::damage(
            &attacker,
            &unit("frog", ElementType::Grass),
            &attacker.moves[0].spec,
        );
        assert!(strong > weak);
    }

    #[test]
    fn test_immune_defender_takes_nothing() {
        let attacker = unit("a", ElementType::Electric)
            .with_move(MoveSpec::new("spark", ElementType::Electric, Some(60), 100), 10);
        assert_eq!(
            SimEngine::damage(
                &attacker,
                &unit("mole", ElementType::Ground),
                &attacker.moves[0].spec
            ),
            0
        );
    }

    #[test]
    fn test_self_hit_damages_the_user() {
        let a = unit("a", ElementType::Normal);
        let snap = one_on_one(a, unit("b", ElementType::Normal));
        let outcomes = SimEngine::new()
            .apply_action(&snap, Side::A, &Action::confusion_self_hit())
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].snapshot.active(Side::A).stats.hp < 160);
        assert_eq!(outcomes[0].snapshot.active(Side::B).stats.hp, 160);
    }

    #[test]
    fn test_switch_resets_volatile_flags() {
        let mut lead = unit("lead", ElementType::Normal);
        lead.flags.confused = true;
        let snap = Snapshot::new(
            Team::new(vec![lead, unit("bench", ElementType::Normal)]),
            Team::new(vec![unit("b", ElementType::Normal)]),
        );
        let outcomes = SimEngine::new()
            .apply_action(&snap, Side::A, &Action::switch(1))
            .unwrap();
        let team = outcomes[0].snapshot.team(Side::A);
        assert_eq!(team.active, 1);
        assert!(!team.units[0].flags.confused);
    }

    #[test]
    fn test_status_move_inflicts_on_hit() {
        let a = unit("a", ElementType::Psychic).with_move(
            MoveSpec::new("lull", ElementType::Psychic, None, 100).with_effect(Status::Sleep),
            10,
        );
        let snap = one_on_one(a, unit("b", ElementType::Normal));
        let action = Action::attack(0, snap.active(Side::A).moves[0].spec.clone());

        let outcomes = SimEngine::new().apply_action(&snap, Side::A, &action).unwrap();
        assert_eq!(outcomes[0].snapshot.active(Side::B).status, Status::Sleep);
        assert_eq!(outcomes[0].snapshot.active(Side::B).stats.hp, 160);
    }

    #[test]
    fn test_post_turn_chip_damage_and_flinch_expiry() {
        let mut a = unit("a", ElementType::Normal);
        a.status = Status::Burn;
        a.flags.flinched = true;
        let snap = one_on_one(a, unit("b", ElementType::Normal));

        let results = SimEngine::new().apply_post_turn(&snap).unwrap();
        assert_eq!(results.len(), 1);
        let after = results[0].active(Side::A);
        assert_eq!(after.stats.hp, 160 - 160 / BURN_CHIP_DIVISOR);
        assert!(!after.flags.flinched);
    }

    #[test]
    fn test_post_turn_branches_over_replacements() {
        let mut fallen = unit("fallen", ElementType::Normal);
        fallen.stats.hp = 0;
        let snap = Snapshot::new(
            Team::new(vec![
                fallen,
                unit("first", ElementType::Normal),
                unit("second", ElementType::Normal),
            ]),
            Team::new(vec![unit("b", ElementType::Normal)]),
        );

        let results = SimEngine::new().apply_post_turn(&snap).unwrap();
        assert_eq!(results.len(), 2);
        let actives: Vec<usize> = results.iter().map(|s| s.team(Side::A).active).collect();
        assert!(actives.contains(&1) && actives.contains(&2));
    }

    #[test]
    fn test_post_turn_without_bench_leaves_battle_over() {
        let mut fallen = unit("fallen", ElementType::Normal);
        fallen.stats.hp = 0;
        let snap = one_on_one(fallen, unit("b", ElementType::Normal));

        let results = SimEngine::new().apply_post_turn(&snap).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_over());
    }
}
