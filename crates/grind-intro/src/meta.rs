//! Metavariable store
//!
//! Fresh names, free variables and goal metavariables, plus the assignment
//! table that records how each closed goal was solved. Backends embed a
//! [`MetaState`] to implement the bookkeeping half of
//! [`Elaborator`](crate::backend::Elaborator).

use crate::error::{GrindError, GrindResult};
use grind_kernel::{Expr, FVarId, LocalContext, MVarId, Name};
use hashbrown::HashMap;

/// Declaration of a goal metavariable
#[derive(Debug, Clone)]
pub struct MetaDecl {
    /// Context the hole is elaborated in
    pub lctx: LocalContext,
    /// Type of the hole
    pub ty: Expr,
}

#[derive(Debug, Clone, Default)]
pub struct MetaState {
    decls: HashMap<MVarId, MetaDecl>,
    assignments: HashMap<MVarId, Expr>,
    /// Goals whose solution sits under a binder for the given fvar
    binders: HashMap<MVarId, FVarId>,
    next_mvar: u64,
    next_fvar: u64,
    name_counters: HashMap<Name, u64>,
}

impl MetaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_fvar(&mut self) -> FVarId {
        let id = FVarId(self.next_fvar);
        self.next_fvar += 1;
        id
    }

    /// `base.1`, `base.2`, ... Macro scopes on `base` are dropped first.
    pub fn fresh_name(&mut self, base: &Name) -> Name {
        let base = base.erase_macro_scopes();
        let counter = self.name_counters.entry(base.clone()).or_insert(0);
        *counter += 1;
        base.num(*counter)
    }

    pub fn fresh_mvar(&mut self, lctx: &LocalContext, ty: Expr) -> MVarId {
        let id = MVarId(self.next_mvar);
        self.next_mvar += 1;
        self.decls.insert(
            id,
            MetaDecl {
                lctx: lctx.clone(),
                ty,
            },
        );
        id
    }

    pub fn decl(&self, id: MVarId) -> GrindResult<&MetaDecl> {
        self.decls.get(&id).ok_or(GrindError::UnknownMVar(id))
    }

    pub fn num_mvars(&self) -> usize {
        self.decls.len()
    }

    /// Solve `id` with `val`. Each goal is solved at most once.
    pub fn assign(&mut self, id: MVarId, val: Expr) -> GrindResult<()> {
        if !self.decls.contains_key(&id) {
            return Err(GrindError::UnknownMVar(id));
        }
        if self.assignments.contains_key(&id) {
            return Err(GrindError::AlreadyAssigned(id));
        }
        self.assignments.insert(id, val);
        Ok(())
    }

    pub fn is_assigned(&self, id: MVarId) -> bool {
        self.assignments.contains_key(&id)
    }

    pub fn assignment(&self, id: MVarId) -> Option<&Expr> {
        self.assignments.get(&id)
    }

    /// Record that `id` is the body of a binder introducing `fvar`: its
    /// solution has `fvar` abstracted to the loose bound variable 0 when
    /// instantiated.
    pub fn bind_fvar(&mut self, id: MVarId, fvar: FVarId) -> GrindResult<()> {
        if !self.decls.contains_key(&id) {
            return Err(GrindError::UnknownMVar(id));
        }
        self.binders.insert(id, fvar);
        Ok(())
    }

    /// Replace assigned metavariables by their values, transitively.
    /// Values of goals bound by [`bind_fvar`](Self::bind_fvar) are
    /// abstracted over their free variable.
    pub fn instantiate(&self, e: &Expr) -> Expr {
        if !e.has_mvar() {
            return e.clone();
        }
        e.replace(&mut |sub: &Expr| match sub {
            Expr::MVar(id) => self.assignments.get(id).map(|val| {
                let val = self.instantiate(val);
                match self.binders.get(id) {
                    Some(&fvar) => val.abstract_fvar(fvar),
                    None => val,
                }
            }),
            _ => None,
        })
    }
}
