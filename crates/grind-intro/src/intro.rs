//! Goal decomposition
//!
//! One call peels exactly one binder off the goal's conclusion:
//!
//! | conclusion | result |
//! |---|---|
//! | `p → q`, `∀ h : p, q h`, `p : Prop` | hypothesis `h : p'`, simplified unless `q` uses `h` |
//! | `let x := v; b`, `letFun v (fun x => b)` | let-bound local, fact `x = v'` or the proof |
//! | `∀ x : α, b` with `α` not a proposition | local `x : α` |
//! | anything else | terminal |
//!
//! New hypotheses then go to the case-split and injection dispatchers and,
//! failing those, into the goal's fact queue.

use crate::backend::Backend;
use crate::engine::{GoalOf, Grind};
use crate::error::{GrindError, GrindResult};
use crate::goal::{Goal, PendingFact};
use crate::proof::{
    is_false, mk_by_contra, mk_eq, mk_eq_refl, mk_false, mk_intro_with_eq, mk_not,
};
use grind_kernel::{BinderInfo, Expr, FVarId, Name};
use tracing::debug;

/// Binder name hint for introduced hypotheses
const HYP_HINT: &str = "h";
/// Binder name hint for introduced locals
const LOCAL_HINT: &str = "x";

/// Result of peeling one binder, before dispatch
#[derive(Debug)]
pub enum IntroStep<S> {
    /// Nothing to introduce
    Done(Goal<S>),
    /// A hypothesis `fvar : p` was introduced
    NewHyp { fvar: FVarId, goal: Goal<S> },
    /// A let-bound proof was introduced and already queued as a fact
    NewDepHyp(Goal<S>),
    /// A non-propositional local was introduced
    NewLocal { fvar: FVarId, goal: Goal<S> },
}

/// Outcome of one decomposition step
#[derive(Debug)]
pub enum Decomposition<S> {
    /// The conclusion is atomic; the goal is terminal
    Done(Goal<S>),
    /// One binder was consumed; keep going with this goal
    Split(Goal<S>),
    /// The new local was split by cases, one goal per arm
    CaseSplit(Vec<Goal<S>>),
    /// The new hypothesis was decomposed by injectivity
    Injected(Goal<S>),
}

/// `let` and `letFun` bind the same way but close the old hole differently
#[derive(Clone, Copy)]
enum LetKind<'e> {
    Let,
    LetFun { body_ty: &'e Expr },
}

impl<B: Backend> Grind<'_, B> {
    /// Peel one binder off `goal.target`
    pub fn intro_next(
        &mut self,
        goal: GoalOf<B>,
        generation: u32,
    ) -> GrindResult<IntroStep<B::State>> {
        let target = goal.target.clone();
        match &target {
            Expr::Pi(bi, domain, body) => {
                if self.backend.is_prop(&goal.lctx, domain)? {
                    self.intro_hyp(goal, *bi, domain, body)
                } else {
                    self.intro_local(goal, *bi, domain, body)
                }
            }
            Expr::Let(ty, value, body) => {
                self.intro_let(goal, ty, value, body, LetKind::Let, generation)
            }
            _ => match target.as_let_fun() {
                Some(view) => self.intro_let(
                    goal,
                    view.ty,
                    view.value,
                    view.body,
                    LetKind::LetFun {
                        body_ty: view.body_ty,
                    },
                    generation,
                ),
                None => Ok(IntroStep::Done(goal)),
            },
        }
    }

    fn intro_hyp(
        &mut self,
        goal: GoalOf<B>,
        bi: BinderInfo,
        prop: &Expr,
        body: &Expr,
    ) -> GrindResult<IntroStep<B::State>> {
        // A dependent body mentions the proof itself, so the hypothesis has
        // to keep its original type.
        let (hyp_ty, he) = if body.has_loose_bvar(0) {
            (prop.clone(), None)
        } else {
            let r = self
                .backend
                .simplify(&goal.lctx, prop)
                .map_err(GrindError::Simplify)?;
            (r.expr, r.proof)
        };

        let fvar = self.backend.fresh_fvar();
        let name = self.backend.fresh_name(&Name::from_string(HYP_HINT));
        let mut lctx = goal.lctx.clone();
        lctx.push_hyp(fvar, name.clone(), hyp_ty.clone(), bi);

        let target = body.instantiate(&Expr::fvar(fvar));
        let mvar = self.backend.fresh_goal_mvar(&lctx, &target)?;
        let lam = Expr::lam(bi, hyp_ty.clone(), Expr::mvar(mvar));
        let proof = match he {
            Some(he) => mk_intro_with_eq(prop.clone(), hyp_ty, target.clone(), he, lam),
            None => lam,
        };
        self.backend.assign(goal.mvar, proof)?;
        self.backend.bind_fvar(mvar, fvar)?;

        debug!(hyp = %name, "introduced hypothesis");
        Ok(IntroStep::NewHyp {
            fvar,
            goal: Goal {
                mvar,
                target,
                lctx,
                ..goal
            },
        })
    }

    fn intro_local(
        &mut self,
        goal: GoalOf<B>,
        bi: BinderInfo,
        ty: &Expr,
        body: &Expr,
    ) -> GrindResult<IntroStep<B::State>> {
        let fvar = self.backend.fresh_fvar();
        let name = self.backend.fresh_name(&Name::from_string(LOCAL_HINT));
        let mut lctx = goal.lctx.clone();
        lctx.push_hyp(fvar, name.clone(), ty.clone(), bi);

        let target = body.instantiate(&Expr::fvar(fvar));
        let mvar = self.backend.fresh_goal_mvar(&lctx, &target)?;
        self.backend
            .assign(goal.mvar, Expr::lam(bi, ty.clone(), Expr::mvar(mvar)))?;
        self.backend.bind_fvar(mvar, fvar)?;

        debug!(local = %name, "introduced local");
        Ok(IntroStep::NewLocal {
            fvar,
            goal: Goal {
                mvar,
                target,
                lctx,
                ..goal
            },
        })
    }

    fn intro_let(
        &mut self,
        goal: GoalOf<B>,
        ty: &Expr,
        value: &Expr,
        body: &Expr,
        kind: LetKind<'_>,
        generation: u32,
    ) -> GrindResult<IntroStep<B::State>> {
        let fvar = self.backend.fresh_fvar();
        let name = self.backend.fresh_name(&Name::from_string(LOCAL_HINT));
        let mut lctx = goal.lctx.clone();
        lctx.push_let(fvar, name.clone(), ty.clone(), value.clone());

        let target = body.instantiate(&Expr::fvar(fvar));
        let mvar = self.backend.fresh_goal_mvar(&lctx, &target)?;
        let proof = match kind {
            LetKind::Let => Expr::let_(ty.clone(), value.clone(), Expr::mvar(mvar)),
            LetKind::LetFun { body_ty } => {
                Expr::let_fun(ty.clone(), body_ty.clone(), value.clone(), Expr::mvar(mvar))
            }
        };
        self.backend.assign(goal.mvar, proof)?;
        self.backend.bind_fvar(mvar, fvar)?;

        let is_proof = self.backend.is_prop(&lctx, ty)?;
        let mut goal = Goal {
            mvar,
            target,
            lctx,
            ..goal
        };

        if is_proof {
            debug!(hyp = %name, "introduced let-bound proof");
            goal.push_fact(PendingFact {
                name,
                prop: ty.clone(),
                proof: Expr::fvar(fvar),
                generation,
            });
            return Ok(IntroStep::NewDepHyp(goal));
        }

        // The definitional equation goes straight to the core: its left-hand
        // side is the new local, which the simplifier must not unfold.
        let r = self
            .backend
            .simplify(&goal.lctx, value)
            .map_err(GrindError::Simplify)?;
        let x = self.backend.share_common(&mut goal.cc, &Expr::fvar(fvar));
        let level = self.backend.sort_level(&goal.lctx, ty)?;
        let proof = match r.proof {
            Some(he) => he,
            None => mk_eq_refl(level.clone(), ty.clone(), x.clone()),
        };
        let eq = mk_eq(level, ty.clone(), x, r.expr);
        debug!(local = %name, "introduced let-bound local");
        self.add_fact(&mut goal, &eq, &proof, generation)?;
        Ok(IntroStep::NewLocal { fvar, goal })
    }

    /// Peel one binder and dispatch the introduced local
    pub fn decompose(
        &mut self,
        goal: GoalOf<B>,
        generation: u32,
    ) -> GrindResult<Decomposition<B::State>> {
        match self.intro_next(goal, generation)? {
            IntroStep::Done(goal) => self.finish(goal),
            IntroStep::NewDepHyp(goal) => Ok(Decomposition::Split(goal)),
            IntroStep::NewHyp { fvar, mut goal } => {
                if let Some(arms) = self.apply_cases(&goal, fvar)? {
                    return Ok(Decomposition::CaseSplit(arms));
                }
                if let Some(goal) = self.apply_injection(&goal, fvar)? {
                    return Ok(Decomposition::Injected(goal));
                }
                let decl = goal.find_decl(fvar)?;
                let fact = PendingFact {
                    name: decl.user_name.clone(),
                    prop: decl.ty.clone(),
                    proof: decl.to_expr(),
                    generation,
                };
                goal.push_fact(fact);
                Ok(Decomposition::Split(goal))
            }
            IntroStep::NewLocal { fvar, goal } => {
                if goal.inconsistent {
                    return Ok(Decomposition::Split(goal));
                }
                match self.apply_cases(&goal, fvar)? {
                    Some(arms) => Ok(Decomposition::CaseSplit(arms)),
                    None => Ok(Decomposition::Split(goal)),
                }
            }
        }
    }

    /// A terminal goal, unless proof by contradiction applies
    fn finish(&mut self, goal: GoalOf<B>) -> GrindResult<Decomposition<B::State>> {
        if !self.config.by_contra
            || is_false(&goal.target)
            || !self.backend.is_prop(&goal.lctx, &goal.target)?
        {
            return Ok(Decomposition::Done(goal));
        }
        let target = Expr::arrow(mk_not(goal.target.clone()), mk_false());
        let mvar = self.backend.fresh_goal_mvar(&goal.lctx, &target)?;
        self.backend
            .assign(goal.mvar, mk_by_contra(goal.target.clone(), Expr::mvar(mvar)))?;
        debug!(goal = %mvar, "negated conclusion");
        Ok(Decomposition::Split(Goal {
            mvar,
            target,
            ..goal
        }))
    }
}
