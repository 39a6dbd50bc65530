//! Case-split and injection dispatch for freshly introduced locals

use crate::backend::Backend;
use crate::engine::{GoalOf, Grind};
use crate::error::{GrindError, GrindResult};
use grind_kernel::FVarId;
use tracing::debug;

impl<B: Backend> Grind<'_, B> {
    /// Split `goal` on `fvar` when its type is a case target.
    ///
    /// Returns one goal per constructor, in the splitter's order. An empty
    /// list means every arm was impossible and the goal is closed. `None`
    /// when splitting is disabled, exhausted, or does not apply.
    pub fn apply_cases(
        &mut self,
        goal: &GoalOf<B>,
        fvar: FVarId,
    ) -> GrindResult<Option<Vec<GoalOf<B>>>> {
        if !self.config.allows_case_split(goal.case_splits) {
            return Ok(None);
        }
        let decl = goal.find_decl(fvar)?;
        if !self.backend.is_case_split_target(&decl.ty) {
            return Ok(None);
        }
        let arms = self
            .backend
            .cases(goal, fvar)
            .map_err(GrindError::CaseSplit)?;
        debug!(local = %decl.user_name, arms = arms.len(), "case split");
        let goals = arms
            .into_iter()
            .map(|sub| {
                let mut arm = goal.clone().with_subgoal(sub);
                arm.case_splits += 1;
                arm
            })
            .collect();
        Ok(Some(goals))
    }

    /// Decompose the hypothesis `fvar` by constructor injectivity.
    /// `None` when injection is disabled or does not apply.
    pub fn apply_injection(
        &mut self,
        goal: &GoalOf<B>,
        fvar: FVarId,
    ) -> GrindResult<Option<GoalOf<B>>> {
        if !self.config.injection {
            return Ok(None);
        }
        let Some(sub) = self
            .backend
            .try_injection(goal, fvar)
            .map_err(GrindError::Injection)?
        else {
            return Ok(None);
        };
        debug!(goal = %goal.mvar, new_goal = %sub.mvar, "injection");
        Ok(Some(goal.clone().with_subgoal(sub)))
    }
}
