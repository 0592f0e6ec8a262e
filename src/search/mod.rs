//! Stochastic adversarial tree search
//!
//! One decision per call: enumerate candidate actions, walk a tree of
//! turn-order, minimax, move-resolution and post-turn nodes, back the
//! values up, pick the best root action under a hard deadline.

pub mod agent;
pub mod cancel;
pub mod candidates;
pub mod depth;
pub mod driver;
pub mod evaluate;
pub mod executor;
pub mod ordering;
pub mod tree;

pub use agent::TreeAgent;
pub use cancel::CancelToken;
pub use candidates::{legal_actions, legal_switches};
pub use depth::{compute_depth, DepthController};
pub use driver::{ChosenAction, SearchDriver};
pub use evaluate::evaluate;
pub use executor::SearchExecutor;
pub use ordering::{estimate, ordered_actions};
pub use tree::{node_value, resolution_orders, SearchContext, SearchNode};
