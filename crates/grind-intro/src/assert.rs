//! Fact assertion
//!
//! Every hypothesis reaches the congruence core through the same pipeline:
//! simplify the proposition, transport the proof along the simplification
//! with `Eq.mp`, share the normalized term and register it.

use crate::backend::{Backend, FactStatus};
use crate::engine::{GoalOf, Grind};
use crate::error::{GrindError, GrindResult};
use crate::goal::Goal;
use crate::proof::mk_eq_mp;
use grind_kernel::Expr;
use tracing::{debug, instrument, trace};

/// Outcome of one worklist step
#[derive(Debug)]
pub enum Step<G> {
    /// The goal was replaced by these goals (possibly none)
    Progress(Vec<G>),
    /// Nothing to do for this goal
    Stuck(G),
}

impl<B: Backend> Grind<'_, B> {
    /// Register `prop` with the congruence core as is. A contradiction
    /// closes the goal.
    pub(crate) fn add_fact(
        &mut self,
        goal: &mut GoalOf<B>,
        prop: &Expr,
        proof: &Expr,
        generation: u32,
    ) -> GrindResult<()> {
        let status = self
            .backend
            .add_fact(&mut goal.cc, prop, proof, generation)
            .map_err(GrindError::Congruence)?;
        match status {
            FactStatus::Added => debug!(goal = %goal.mvar, generation, "fact added"),
            FactStatus::Inconsistent => {
                debug!(goal = %goal.mvar, "facts are inconsistent, goal closed");
                goal.mark_inconsistent();
            }
        }
        Ok(())
    }

    /// Simplify, transport the proof, share and register
    fn add_simplified(
        &mut self,
        goal: &mut GoalOf<B>,
        prop: &Expr,
        proof: Expr,
        generation: u32,
    ) -> GrindResult<()> {
        let r = self
            .backend
            .simplify(&goal.lctx, prop)
            .map_err(GrindError::Simplify)?;
        trace!(rewritten = r.proof.is_some(), "simplified fact");
        let proof = match r.proof {
            Some(he) => mk_eq_mp(prop.clone(), r.expr.clone(), he, proof),
            None => proof,
        };
        let prop = self.backend.share_common(&mut goal.cc, &r.expr);
        self.add_fact(goal, &prop, &proof, generation)
    }

    /// Assert every pending fact of `goal`, oldest first.
    ///
    /// Stops early when the goal becomes inconsistent. On failure the
    /// remaining facts are lost; facts registered before it stay registered.
    pub fn drain(&mut self, mut goal: GoalOf<B>) -> GrindResult<GoalOf<B>> {
        while let Some(fact) = goal.facts.pop() {
            trace!(name = %fact.name, "asserting pending fact");
            self.add_simplified(&mut goal, &fact.prop, fact.proof, fact.generation)?;
            if goal.inconsistent {
                break;
            }
        }
        Ok(goal)
    }

    /// Assert `proof : prop` in `goal`.
    ///
    /// With eager case splitting, a fact whose proposition is a case target
    /// becomes a hypothesis of the goal and is introduced right away, which
    /// may produce several goals. Facts queued behind it are held back and
    /// re-queued on each of those goals. Returns no goal when the fact
    /// closed it.
    pub fn assert_at(
        &mut self,
        goal: GoalOf<B>,
        proof: Expr,
        prop: Expr,
        generation: u32,
    ) -> GrindResult<Vec<GoalOf<B>>> {
        if self.config.eager_cases && self.backend.is_case_split_target(&prop) {
            debug!(goal = %goal.mvar, "fact is a case target, introducing it");
            let mut goal = self.assert_as_hyp(goal, proof, prop)?;
            let later = std::mem::take(&mut goal.facts);
            let mut goals = self.intros(goal, generation)?;
            for goal in &mut goals {
                goal.facts.extend_from(&later);
            }
            return Ok(goals);
        }
        let mut goal = goal;
        self.add_simplified(&mut goal, &prop, proof, generation)?;
        if goal.inconsistent {
            Ok(Vec::new())
        } else {
            Ok(vec![goal])
        }
    }

    /// Turn `goal` into `prop → target`, closing the old hole with
    /// `?new proof`
    fn assert_as_hyp(
        &mut self,
        goal: GoalOf<B>,
        proof: Expr,
        prop: Expr,
    ) -> GrindResult<GoalOf<B>> {
        let target = Expr::arrow(prop, goal.target.clone());
        let mvar = self.backend.fresh_goal_mvar(&goal.lctx, &target)?;
        self.backend.assign(goal.mvar, Expr::app(Expr::mvar(mvar), proof))?;
        Ok(Goal {
            mvar,
            target,
            ..goal
        })
    }

    /// Assert the oldest pending fact. Hands the goal back untouched when
    /// the queue is empty.
    pub fn assert_next(&mut self, mut goal: GoalOf<B>) -> GrindResult<Step<GoalOf<B>>> {
        let Some(fact) = goal.facts.pop() else {
            return Ok(Step::Stuck(goal));
        };
        self.assert_at(goal, fact.proof, fact.prop, fact.generation)
            .map(Step::Progress)
    }

    /// Assert pending facts until no goal has any left
    #[instrument(skip_all, fields(goal = %goal.mvar))]
    pub fn assert_all(&mut self, goal: GoalOf<B>) -> GrindResult<Vec<GoalOf<B>>> {
        self.iterate(goal, Self::assert_next)
    }

    /// Apply `step` to `goal` and, depth first, to every goal it produces.
    /// Goals the step is stuck on are returned in the order they were
    /// reached.
    pub fn iterate<F>(&mut self, goal: GoalOf<B>, mut step: F) -> GrindResult<Vec<GoalOf<B>>>
    where
        F: FnMut(&mut Self, GoalOf<B>) -> GrindResult<Step<GoalOf<B>>>,
    {
        let mut todo = vec![goal];
        let mut done = Vec::new();
        while let Some(goal) = todo.pop() {
            match step(self, goal)? {
                Step::Progress(next) => todo.extend(next.into_iter().rev()),
                Step::Stuck(goal) => done.push(goal),
            }
        }
        Ok(done)
    }
}
