//! Goals and their pending facts

use crate::backend::Subgoal;
use crate::error::{GrindError, GrindResult};
use grind_kernel::{Expr, FVarId, LocalContext, LocalDecl, MVarId, Name};
use std::collections::VecDeque;

/// A hypothesis waiting to be handed to the congruence core
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFact {
    /// Name of the local the fact came from
    pub name: Name,
    pub prop: Expr,
    pub proof: Expr,
    /// E-matching generation the fact was produced at
    pub generation: u32,
}

/// FIFO queue of pending facts
#[derive(Debug, Clone, Default)]
pub struct FactQueue {
    facts: VecDeque<PendingFact>,
}

impl FactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fact: PendingFact) {
        self.facts.push_back(fact);
    }

    pub fn pop(&mut self) -> Option<PendingFact> {
        self.facts.pop_front()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn clear(&mut self) {
        self.facts.clear();
    }

    /// Queue copies of `other`'s facts behind the ones already here
    pub fn extend_from(&mut self, other: &FactQueue) {
        self.facts.extend(other.facts.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingFact> + '_ {
        self.facts.iter()
    }
}

/// An open proof obligation together with everything the engine knows
/// about it.
///
/// `S` is the congruence core's per-goal state.
#[derive(Debug, Clone)]
pub struct Goal<S> {
    /// Hole this goal stands for
    pub mvar: MVarId,
    /// Conclusion still to be proved
    pub target: Expr,
    pub lctx: LocalContext,
    /// Hypotheses introduced but not yet asserted
    pub facts: FactQueue,
    /// Congruence state, including the term sharing table
    pub cc: S,
    /// Case splits performed along this branch
    pub case_splits: u32,
    /// The goal was closed by a contradiction among its facts
    pub inconsistent: bool,
}

impl<S> Goal<S> {
    pub fn new(mvar: MVarId, target: Expr, lctx: LocalContext, cc: S) -> Self {
        Self {
            mvar,
            target,
            lctx,
            facts: FactQueue::new(),
            cc,
            case_splits: 0,
            inconsistent: false,
        }
    }

    /// Replace the obligation with `sub`, keeping facts and congruence state
    #[must_use]
    pub fn with_subgoal(self, sub: Subgoal) -> Self {
        Self {
            mvar: sub.mvar,
            target: sub.target,
            lctx: sub.lctx,
            ..self
        }
    }

    pub fn push_fact(&mut self, fact: PendingFact) {
        self.facts.push(fact);
    }

    /// Close the goal. Remaining facts are irrelevant once the goal is
    /// contradictory.
    pub fn mark_inconsistent(&mut self) {
        self.inconsistent = true;
        self.facts.clear();
    }

    pub fn find_decl(&self, fvar: FVarId) -> GrindResult<&LocalDecl> {
        self.lctx.find(fvar).ok_or(GrindError::UnknownFVar(fvar))
    }
}
