//! Moves and the actions built from them

use serde::{Deserialize, Serialize};

use crate::battle::constants::{CONFUSION_SELF_HIT_POWER, SWITCH_PRIORITY};
use crate::battle::types::{ElementType, Status};

/// Static description of a move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSpec {
    pub name: String,
    pub element: ElementType,
    /// None for status moves that deal no direct damage
    pub base_power: Option<u32>,
    /// Higher priority resolves first regardless of speed
    pub priority: i8,
    /// Hit chance in percent, 1..=100
    pub accuracy: u8,
    /// Status inflicted on the defender when the move connects
    pub inflicts: Option<Status>,
    /// The move damages its own user (the confusion self-hit)
    pub targets_self: bool,
}

impl MoveSpec {
    pub fn new(name: &str, element: ElementType, base_power: Option<u32>, accuracy: u8) -> Self {
        Self {
            name: name.to_string(),
            element,
            base_power,
            priority: 0,
            accuracy,
            inflicts: None,
            targets_self: false,
        }
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_effect(mut self, status: Status) -> Self {
        self.inflicts = Some(status);
        self
    }

    /// The synthesized hit a confused unit lands on itself
    ///
    /// Typeless in spirit: normal element, fixed power, never misses.
    pub fn confusion_self_hit() -> Self {
        Self {
            name: "confusion-self-hit".to_string(),
            element: ElementType::Normal,
            base_power: Some(CONFUSION_SELF_HIT_POWER),
            priority: 0,
            accuracy: 100,
            inflicts: None,
            targets_self: true,
        }
    }
}

/// A move slot on a unit, with remaining uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub spec: MoveSpec,
    pub pp: u8,
}

impl MoveSlot {
    pub fn new(spec: MoveSpec, pp: u8) -> Self {
        Self { spec, pp }
    }
}

/// One legal choice for one side on one turn
///
/// Compared by equality, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Use a move. `slot` is None for moves synthesized outside the
    /// unit's moveset (the confusion self-hit), which consume no PP.
    Attack { slot: Option<usize>, spec: MoveSpec },
    /// Swap the active unit for the benched unit at `target`
    Switch { target: usize },
}

impl Action {
    pub fn attack(slot: usize, spec: MoveSpec) -> Self {
        Action::Attack {
            slot: Some(slot),
            spec,
        }
    }

    pub fn switch(target: usize) -> Self {
        Action::Switch { target }
    }

    pub fn confusion_self_hit() -> Self {
        Action::Attack {
            slot: None,
            spec: MoveSpec::confusion_self_hit(),
        }
    }

    /// Declared priority used for turn ordering
    pub fn priority(&self) -> i8 {
        match self {
            Action::Attack { spec, .. } => spec.priority,
            Action::Switch { .. } => SWITCH_PRIORITY,
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch { .. })
    }
}
