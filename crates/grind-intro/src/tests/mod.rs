use crate::proof::mk_eq;
use crate::*;
use grind_kernel::{BinderInfo, Expr, FVarId, Level, LevelVec, LocalContext, MVarId, Name};
use hashbrown::{HashMap, HashSet};

mod decompose;

pub(super) fn c(name: &str) -> Expr {
    Expr::const_(Name::from_string(name), LevelVec::new())
}

/// `@Eq α a b`
pub(super) fn eq(a: Expr, b: Expr) -> Expr {
    mk_eq(Level::one(), c("α"), a, b)
}

/// Proof term the test simplifier produces for rewriting `e`
pub(super) fn simp_proof(e: &Expr) -> Expr {
    Expr::app(c("simp"), e.clone())
}

pub(super) fn fact(prop: Expr, proof: Expr) -> PendingFact {
    PendingFact {
        name: "h".into(),
        prop,
        proof,
        generation: 0,
    }
}

/// Per-goal state of the test congruence core
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct CcState {
    pub facts: Vec<Expr>,
    pub shared: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Registered {
    pub prop: Expr,
    pub proof: Expr,
    pub generation: u32,
}

/// One constructor of a case-split target
#[derive(Debug, Clone)]
pub(super) struct CaseArm {
    pub ctor: Name,
    pub fields: Vec<Expr>,
    /// Put the fields in front of the arm's conclusion instead of into its
    /// context, so they get introduced (and asserted) again
    pub as_binders: bool,
}

impl CaseArm {
    pub fn local(ctor: &str, fields: Vec<Expr>) -> Self {
        Self {
            ctor: Name::from_string(ctor),
            fields,
            as_binders: false,
        }
    }

    pub fn binders(ctor: &str, fields: Vec<Expr>) -> Self {
        Self {
            ctor: Name::from_string(ctor),
            fields,
            as_binders: true,
        }
    }
}

/// Scriptable backend: propositions are recognized by head constant,
/// the simplifier rewrites whole terms by a fixed table, and every fact
/// reaching the core is recorded in `registered`.
pub(super) struct TestBackend {
    pub metas: MetaState,
    pub props: HashSet<Name>,
    pub simp_rules: Vec<(Expr, Expr)>,
    pub simp_failures: HashSet<Expr>,
    pub add_failures: HashSet<Expr>,
    pub contradictions: HashSet<Expr>,
    pub case_types: HashMap<Name, Vec<CaseArm>>,
    /// Injective constructors and their field types
    pub constructors: HashMap<Name, Vec<Expr>>,
    pub fail_cases: bool,
    pub fail_mvars: bool,
    pub registered: Vec<Registered>,
}

impl TestBackend {
    pub fn new() -> Self {
        let props = ["P", "P'", "Q", "R", "S", "A", "B", "Eq", "Not", "False", "Or"]
            .into_iter()
            .map(Name::from_string)
            .collect();
        Self {
            metas: MetaState::new(),
            props,
            simp_rules: Vec::new(),
            simp_failures: HashSet::new(),
            add_failures: HashSet::new(),
            contradictions: HashSet::new(),
            case_types: HashMap::new(),
            constructors: HashMap::new(),
            fail_cases: false,
            fail_mvars: false,
            registered: Vec::new(),
        }
    }

    pub fn with_rule(mut self, from: Expr, to: Expr) -> Self {
        self.simp_rules.push((from, to));
        self
    }

    pub fn with_cases(mut self, ty: &str, arms: Vec<CaseArm>) -> Self {
        self.case_types.insert(Name::from_string(ty), arms);
        self
    }

    pub fn with_constructor(mut self, ctor: &str, fields: Vec<Expr>) -> Self {
        self.constructors.insert(Name::from_string(ctor), fields);
        self
    }

    /// Open goal `target` in an empty context
    pub fn goal(&mut self, target: Expr) -> Goal<CcState> {
        let lctx = LocalContext::new();
        let mvar = self.metas.fresh_mvar(&lctx, target.clone());
        Goal::new(mvar, target, lctx, CcState::default())
    }

    pub fn registered_props(&self) -> Vec<Expr> {
        self.registered.iter().map(|r| r.prop.clone()).collect()
    }

    pub fn assignment(&self, mvar: MVarId) -> Option<&Expr> {
        self.metas.assignment(mvar)
    }

    fn is_prop_expr(&self, e: &Expr) -> bool {
        match e {
            Expr::Pi(_, _, body) => self.is_prop_expr(body),
            Expr::FVar(_) | Expr::Sort(_) => false,
            _ => e
                .get_app_fn()
                .const_name()
                .is_some_and(|name| self.props.contains(name)),
        }
    }
}

impl Simplifier for TestBackend {
    fn simplify(&mut self, _lctx: &LocalContext, e: &Expr) -> Result<SimpResult, BackendError> {
        if self.simp_failures.contains(e) {
            return Err(BackendError::new("simp failed"));
        }
        for (from, to) in &self.simp_rules {
            if from == e {
                return Ok(SimpResult::rewritten(to.clone(), simp_proof(e)));
            }
        }
        Ok(SimpResult::unchanged(e.clone()))
    }
}

impl CongruenceCore for TestBackend {
    type State = CcState;

    fn add_fact(
        &mut self,
        state: &mut CcState,
        prop: &Expr,
        proof: &Expr,
        generation: u32,
    ) -> Result<FactStatus, BackendError> {
        if self.add_failures.contains(prop) {
            return Err(BackendError::new("core rejected fact"));
        }
        self.registered.push(Registered {
            prop: prop.clone(),
            proof: proof.clone(),
            generation,
        });
        state.facts.push(prop.clone());
        if self.contradictions.contains(prop) || proof::is_false(prop) {
            Ok(FactStatus::Inconsistent)
        } else {
            Ok(FactStatus::Added)
        }
    }

    fn share_common(&mut self, state: &mut CcState, e: &Expr) -> Expr {
        state.shared.push(e.clone());
        e.clone()
    }
}

impl Elaborator for TestBackend {
    fn fresh_name(&mut self, base: &Name) -> Name {
        self.metas.fresh_name(base)
    }

    fn fresh_fvar(&mut self) -> FVarId {
        self.metas.fresh_fvar()
    }

    fn fresh_goal_mvar(&mut self, lctx: &LocalContext, ty: &Expr) -> GrindResult<MVarId> {
        if self.fail_mvars {
            return Err(GrindError::Elaborator(BackendError::new("no more holes")));
        }
        Ok(self.metas.fresh_mvar(lctx, ty.clone()))
    }

    fn assign(&mut self, mvar: MVarId, proof: Expr) -> GrindResult<()> {
        self.metas.assign(mvar, proof)
    }

    fn bind_fvar(&mut self, mvar: MVarId, fvar: FVarId) -> GrindResult<()> {
        self.metas.bind_fvar(mvar, fvar)
    }

    fn is_prop(&self, _lctx: &LocalContext, e: &Expr) -> GrindResult<bool> {
        Ok(self.is_prop_expr(e))
    }

    fn sort_level(&self, _lctx: &LocalContext, _ty: &Expr) -> GrindResult<Level> {
        Ok(Level::one())
    }
}

impl CaseSplitter for TestBackend {
    fn is_case_split_target(&self, ty: &Expr) -> bool {
        ty.get_app_fn()
            .const_name()
            .is_some_and(|name| self.case_types.contains_key(name))
    }

    fn cases<S>(&mut self, goal: &Goal<S>, fvar: FVarId) -> Result<Vec<Subgoal>, BackendError> {
        if self.fail_cases {
            return Err(BackendError::new("cases failed"));
        }
        let decl = goal
            .lctx
            .find(fvar)
            .ok_or_else(|| BackendError::new("unknown local"))?;
        let head = decl
            .ty
            .get_app_fn()
            .const_name()
            .cloned()
            .ok_or_else(|| BackendError::new("not an inductive type"))?;
        let arms = self.case_types.get(&head).cloned().unwrap_or_default();

        let mut subgoals = Vec::new();
        for arm in arms {
            let mut lctx = goal.lctx.clone();
            lctx.remove(fvar);
            let target = if arm.as_binders {
                arm.fields
                    .iter()
                    .rev()
                    .fold(goal.target.clone(), |t, field| Expr::arrow(field.clone(), t))
            } else {
                let mut args = Vec::new();
                for ty in &arm.fields {
                    let x = self.metas.fresh_fvar();
                    let name = self.metas.fresh_name(&"a".into());
                    lctx.push_hyp(x, name, ty.clone(), BinderInfo::Default);
                    args.push(Expr::fvar(x));
                }
                let value = Expr::app_n(Expr::const_(arm.ctor.clone(), LevelVec::new()), args);
                goal.target.subst_fvar(fvar, &value)
            };
            let mvar = self.metas.fresh_mvar(&lctx, target.clone());
            subgoals.push(Subgoal { mvar, target, lctx });
        }

        let cases_on = Expr::const_(head.str("casesOn"), LevelVec::new());
        let minors = subgoals.iter().map(|s| Expr::mvar(s.mvar));
        let proof = Expr::app_n(cases_on, std::iter::once(Expr::fvar(fvar)).chain(minors));
        self.metas
            .assign(goal.mvar, proof)
            .map_err(|e| BackendError::new(e.to_string()))?;
        Ok(subgoals)
    }
}

impl Injector for TestBackend {
    fn try_injection<S>(
        &mut self,
        goal: &Goal<S>,
        fvar: FVarId,
    ) -> Result<Option<Subgoal>, BackendError> {
        let decl = goal
            .lctx
            .find(fvar)
            .ok_or_else(|| BackendError::new("unknown local"))?;
        if !decl.ty.is_app_of(&Name::from_string(proof::EQ), 3) {
            return Ok(None);
        }
        let args = decl.ty.get_app_args();
        let (lhs, rhs) = (args[1], args[2]);
        let Some(ctor) = lhs.get_app_fn().const_name().cloned() else {
            return Ok(None);
        };
        let Some(field_tys) = self.constructors.get(&ctor).cloned() else {
            return Ok(None);
        };
        if rhs.get_app_fn().const_name() != Some(&ctor) {
            return Ok(None);
        }
        let (lhs_args, rhs_args) = (lhs.get_app_args(), rhs.get_app_args());
        if lhs_args.len() != field_tys.len() || rhs_args.len() != field_tys.len() {
            return Err(BackendError::new("constructor arity mismatch"));
        }

        let eqs: Vec<Expr> = field_tys
            .iter()
            .zip(lhs_args.iter().zip(rhs_args.iter()))
            .map(|(ty, (a, b))| mk_eq(Level::one(), ty.clone(), (*a).clone(), (*b).clone()))
            .collect();
        let target = eqs
            .into_iter()
            .rev()
            .fold(goal.target.clone(), |t, e| Expr::arrow(e, t));
        let mut lctx = goal.lctx.clone();
        lctx.remove(fvar);
        let mvar = self.metas.fresh_mvar(&lctx, target.clone());
        let inj = Expr::const_(ctor.str("inj"), LevelVec::new());
        self.metas
            .assign(goal.mvar, Expr::app_n(inj, [Expr::fvar(fvar), Expr::mvar(mvar)]))
            .map_err(|e| BackendError::new(e.to_string()))?;
        Ok(Some(Subgoal { mvar, target, lctx }))
    }
}
