//! The engine handle

use crate::backend::{Backend, CongruenceCore};
use crate::config::GrindConfig;
use crate::error::GrindResult;
use crate::goal::Goal;
use grind_kernel::{Expr, LocalContext};

/// Goal type for a backend
pub type GoalOf<B> = Goal<<B as CongruenceCore>::State>;

/// Introduction and assertion engine over a mutably borrowed backend.
///
/// Operations are spread over `assert`, `intro`, `dispatch` and `driver`;
/// this module only owns construction.
pub struct Grind<'a, B: Backend> {
    pub(crate) backend: &'a mut B,
    pub(crate) config: GrindConfig,
}

impl<'a, B: Backend> Grind<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self::with_config(backend, GrindConfig::default())
    }

    pub fn with_config(backend: &'a mut B, config: GrindConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &GrindConfig {
        &self.config
    }

    pub fn backend(&mut self) -> &mut B {
        self.backend
    }

    /// Open a goal for `target` in `lctx` with a fresh metavariable
    pub fn new_goal(
        &mut self,
        lctx: LocalContext,
        target: Expr,
        cc: B::State,
    ) -> GrindResult<GoalOf<B>> {
        let mvar = self.backend.fresh_goal_mvar(&lctx, &target)?;
        Ok(Goal::new(mvar, target, lctx, cc))
    }
}
