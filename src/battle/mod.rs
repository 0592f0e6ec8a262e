//! Battle data model - the state the search reasons over
//!
//! Everything here is an immutable value: applying an action never mutates
//! a snapshot in place, it produces new snapshots through the [`Engine`]
//! seam. The search owns one snapshot per tree branch and nothing else.

pub mod constants;
pub mod engine;
pub mod moves;
pub mod state;
pub mod types;
pub mod unit;

pub use constants::*;
pub use engine::{Engine, Outcome};
pub use moves::{Action, MoveSlot, MoveSpec};
pub use state::{Snapshot, Team};
pub use types::{effectiveness, ElementType, Side, Status};
pub use unit::{StatBlock, Unit, UnitId, VolatileFlags};
