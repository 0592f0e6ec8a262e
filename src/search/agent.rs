//! The full agent: driver, executor and depth control in one place

use crate::battle::{Engine, Side, Snapshot};
use crate::core::config::SearchConfig;
use crate::core::error::Result;
use crate::search::depth::DepthController;
use crate::search::driver::{ChosenAction, SearchDriver};
use crate::search::executor::SearchExecutor;

/// Turn-by-turn battle agent backed by the tree search
pub struct TreeAgent<E: Engine + Clone + Send + Sync + 'static> {
    driver: SearchDriver<E>,
    executor: SearchExecutor,
    depth: DepthController,
}

impl<E: Engine + Clone + Send + Sync + 'static> TreeAgent<E> {
    pub fn new(engine: E, side: Side, config: SearchConfig) -> Result<Self> {
        Ok(Self {
            driver: SearchDriver::new(engine, side, config)?,
            executor: SearchExecutor::new()?,
            depth: DepthController::new(),
        })
    }

    pub fn side(&self) -> Side {
        self.driver.side()
    }

    /// Depth bound for this decision, adaptive or fixed
    fn depth_bound(&mut self, snapshot: &Snapshot) -> u32 {
        if self.driver.config().adaptive_depth {
            self.depth.depth_for(snapshot)
        } else {
            self.driver.config().max_depth
        }
    }

    /// Decide the action for this turn, or fail the decision outright
    pub fn choose_action(&mut self, snapshot: &Snapshot) -> Result<ChosenAction> {
        let max_depth = self.depth_bound(snapshot);
        self.executor.run(&self.driver, snapshot, max_depth)
    }

    /// Decide which unit replaces a fainted active, if any can
    pub fn choose_replacement(&mut self, snapshot: &Snapshot) -> Result<Option<ChosenAction>> {
        let max_depth = self.depth_bound(snapshot);
        self.executor
            .run_replacement(&self.driver, snapshot, max_depth)
    }
}
