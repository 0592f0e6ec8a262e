//! Sides, elemental types, and non-volatile status conditions

use serde::{Deserialize, Serialize};

/// One of the two battling sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposing side
    pub fn rival(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Array index for per-side storage
    pub fn index(&self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Elemental type of a unit or move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
}

/// Non-volatile status condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Healthy,
    Sleep,
    Freeze,
    Paralysis,
    Burn,
    Poison,
}

/// Type-effectiveness multiplier for an attack element against one
/// defending element
///
/// Returns 0.0 (immune), 0.5 (resisted), 1.0 (neutral) or 2.0 (weak).
pub fn effectiveness(attack: ElementType, defend: ElementType) -> f64 {
    use ElementType::*;

    match attack {
        Normal => match defend {
            Ghost => 0.0,
            Rock => 0.5,
            _ => 1.0,
        },
        Fire => match defend {
            Grass | Ice | Bug => 2.0,
            Fire | Water | Rock | Dragon => 0.5,
            _ => 1.0,
        },
        Water => match defend {
            Fire | Ground | Rock => 2.0,
            Water | Grass | Dragon => 0.5,
            _ => 1.0,
        },
        Electric => match defend {
            Water | Flying => 2.0,
            Electric | Grass | Dragon => 0.5,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defend {
            Water | Ground | Rock => 2.0,
            Fire | Grass | Poison | Flying | Bug | Dragon => 0.5,
            _ => 1.0,
        },
        Ice => match defend {
            Grass | Ground | Flying | Dragon => 2.0,
            Water | Ice | Fire => 0.5,
            _ => 1.0,
        },
        Fighting => match defend {
            Normal | Ice | Rock => 2.0,
            Poison | Flying | Psychic | Bug => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defend {
            Grass | Bug => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            _ => 1.0,
        },
        Ground => match defend {
            Fire | Electric | Poison | Rock => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defend {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock => 0.5,
            _ => 1.0,
        },
        Psychic => match defend {
            Fighting | Poison => 2.0,
            Psychic => 0.5,
            _ => 1.0,
        },
        Bug => match defend {
            Grass | Psychic => 2.0,
            Fire | Fighting | Poison | Flying | Ghost => 0.5,
            _ => 1.0,
        },
        Rock => match defend {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground => 0.5,
            _ => 1.0,
        },
        Ghost => match defend {
            Ghost | Psychic => 2.0,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defend {
            Dragon => 2.0,
            _ => 1.0,
        },
    }
}
