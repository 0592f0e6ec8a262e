//! Battle units and their stat blocks

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::battle::constants::PARALYSIS_SPEED_PENALTY;
use crate::battle::moves::{MoveSlot, MoveSpec};
use crate::battle::types::{ElementType, Status};

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Volatile flags that clear when the unit leaves the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VolatileFlags {
    pub confused: bool,
    pub flinched: bool,
    pub trapped: bool,
}

/// Core combat stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_hp: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatBlock {
    pub fn new(max_hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            max_hp,
            hp: max_hp,
            attack,
            defense,
            speed,
        }
    }
}

/// One monster on a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub primary_type: ElementType,
    pub secondary_type: Option<ElementType>,
    pub stats: StatBlock,
    pub status: Status,
    pub flags: VolatileFlags,
    pub moves: Vec<MoveSlot>,
}

impl Unit {
    pub fn new(name: &str, primary_type: ElementType, stats: StatBlock) -> Self {
        Self {
            id: UnitId::new(),
            name: name.to_string(),
            primary_type,
            secondary_type: None,
            stats,
            status: Status::Healthy,
            flags: VolatileFlags::default(),
            moves: Vec::new(),
        }
    }

    pub fn with_secondary_type(mut self, element: ElementType) -> Self {
        self.secondary_type = Some(element);
        self
    }

    pub fn with_move(mut self, spec: MoveSpec, pp: u8) -> Self {
        self.moves.push(MoveSlot::new(spec, pp));
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn is_fainted(&self) -> bool {
        self.stats.hp == 0
    }

    /// Speed after the paralysis penalty
    pub fn effective_speed(&self) -> f64 {
        let speed = self.stats.speed as f64;
        if self.status == Status::Paralysis {
            speed * PARALYSIS_SPEED_PENALTY
        } else {
            speed
        }
    }
}
