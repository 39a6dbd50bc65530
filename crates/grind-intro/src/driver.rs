//! Top-level introduction driver

use crate::backend::Backend;
use crate::engine::{GoalOf, Grind};
use crate::error::GrindResult;
use crate::intro::Decomposition;
use tracing::{debug, instrument, trace};

/// Minimum stack space to reserve before recursing into a case arm (32 KB).
const MIN_STACK_RED_ZONE: usize = 32 * 1024;

/// Stack size to grow to when running low (1 MB).
const STACK_GROWTH_SIZE: usize = 1024 * 1024;

impl<B: Backend> Grind<'_, B> {
    /// Introduce everything `goal` has to offer.
    ///
    /// Alternates draining the fact queue with one decomposition step until
    /// each branch reaches an atomic conclusion. Returns the terminal goals
    /// in order, case arms left to right. Goals closed by a contradiction
    /// are not returned.
    #[instrument(skip_all, fields(goal = %goal.mvar, generation = generation))]
    pub fn intros(&mut self, goal: GoalOf<B>, generation: u32) -> GrindResult<Vec<GoalOf<B>>> {
        let mut terminal = Vec::new();
        self.intros_into(goal, generation, &mut terminal)?;
        debug!(terminal = terminal.len(), "intros finished");
        Ok(terminal)
    }

    fn intros_into(
        &mut self,
        mut goal: GoalOf<B>,
        generation: u32,
        terminal: &mut Vec<GoalOf<B>>,
    ) -> GrindResult<()> {
        loop {
            goal = self.drain(goal)?;
            if goal.inconsistent {
                trace!(goal = %goal.mvar, "goal closed while draining");
                return Ok(());
            }
            match self.decompose(goal, generation)? {
                Decomposition::Done(done) => {
                    terminal.push(done);
                    return Ok(());
                }
                Decomposition::Split(next) | Decomposition::Injected(next) => goal = next,
                Decomposition::CaseSplit(arms) => {
                    for arm in arms {
                        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
                            self.intros_into(arm, generation, terminal)
                        })?;
                    }
                    return Ok(());
                }
            }
        }
    }
}
