//! Collaborator interfaces
//!
//! The engine only decides *which* shape a goal has and in what order facts
//! reach the congruence core. Everything else is delegated:
//! normalization to a [`Simplifier`], fact storage to a [`CongruenceCore`],
//! variable and hole creation to an [`Elaborator`], and inductive reasoning
//! to a [`CaseSplitter`] and an [`Injector`].

use crate::error::{BackendError, GrindResult};
use crate::goal::Goal;
use grind_kernel::{Expr, FVarId, Level, LocalContext, MVarId, Name};

/// Output of a simplification
#[derive(Debug, Clone, PartialEq)]
pub struct SimpResult {
    /// Normalized term
    pub expr: Expr,
    /// Proof of `original = expr`; `None` when nothing was rewritten
    pub proof: Option<Expr>,
}

impl SimpResult {
    pub fn unchanged(expr: Expr) -> Self {
        Self { expr, proof: None }
    }

    pub fn rewritten(expr: Expr, proof: Expr) -> Self {
        Self {
            expr,
            proof: Some(proof),
        }
    }
}

/// What the congruence core made of a new fact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactStatus {
    Added,
    /// The facts of the goal are now contradictory and the goal is closed
    Inconsistent,
}

pub trait Simplifier {
    fn simplify(&mut self, lctx: &LocalContext, e: &Expr) -> Result<SimpResult, BackendError>;
}

pub trait CongruenceCore {
    /// Per-goal saturation state. Cloned when a goal splits into arms.
    type State: Clone + std::fmt::Debug;

    /// Register `prop` (proved by `proof`) produced at `generation`
    fn add_fact(
        &mut self,
        state: &mut Self::State,
        prop: &Expr,
        proof: &Expr,
        generation: u32,
    ) -> Result<FactStatus, BackendError>;

    /// Canonical representative of `e` in the goal's sharing table
    fn share_common(&mut self, state: &mut Self::State, e: &Expr) -> Expr;
}

pub trait Elaborator {
    fn fresh_name(&mut self, base: &Name) -> Name;

    fn fresh_fvar(&mut self) -> FVarId;

    /// New goal metavariable of type `ty` in context `lctx`
    fn fresh_goal_mvar(&mut self, lctx: &LocalContext, ty: &Expr) -> GrindResult<MVarId>;

    /// Close `mvar` with `proof`
    fn assign(&mut self, mvar: MVarId, proof: Expr) -> GrindResult<()>;

    /// `mvar` is the body of a binder introducing `fvar`. Whatever solves
    /// `mvar` later is abstracted over `fvar` in the instantiated proof.
    fn bind_fvar(&mut self, mvar: MVarId, fvar: FVarId) -> GrindResult<()>;

    /// Whether `e` is a proposition (its type is `Prop`)
    fn is_prop(&self, lctx: &LocalContext, e: &Expr) -> GrindResult<bool>;

    /// Universe level `u` such that `ty : Sort u`
    fn sort_level(&self, lctx: &LocalContext, ty: &Expr) -> GrindResult<Level>;
}

/// A goal produced by a case split or an injection. The engine grafts it
/// onto the parent goal to keep the fact queue, congruence state and
/// bookkeeping.
#[derive(Debug, Clone)]
pub struct Subgoal {
    pub mvar: MVarId,
    pub target: Expr,
    pub lctx: LocalContext,
}

pub trait CaseSplitter {
    /// `ty` is an inductive type (or proposition) that should be split
    fn is_case_split_target(&self, ty: &Expr) -> bool;

    /// Split `goal` on the local `fvar`, one subgoal per constructor in
    /// constructor order. The parent metavariable is assigned by the
    /// splitter. Zero subgoals means the goal is closed.
    fn cases<S>(&mut self, goal: &Goal<S>, fvar: FVarId) -> Result<Vec<Subgoal>, BackendError>;
}

pub trait Injector {
    /// Decompose the hypothesis `fvar : c a₁ … aₙ = c b₁ … bₙ` into the
    /// goal `a₁ = b₁ → … → aₙ = bₙ → target`. `None` when `fvar` is not a
    /// constructor equality.
    fn try_injection<S>(
        &mut self,
        goal: &Goal<S>,
        fvar: FVarId,
    ) -> Result<Option<Subgoal>, BackendError>;
}

/// Everything the engine needs from its environment
pub trait Backend: Simplifier + CongruenceCore + Elaborator + CaseSplitter + Injector {}

impl<T> Backend for T where T: Simplifier + CongruenceCore + Elaborator + CaseSplitter + Injector {}
