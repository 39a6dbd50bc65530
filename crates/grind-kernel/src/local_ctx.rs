//! Local contexts
//!
//! The ordered list of hypotheses and local definitions a goal can see.
//! Order matters: later declarations may mention earlier ones, and
//! introduction always appends.

use crate::expr::{BinderInfo, Expr, FVarId};
use crate::name::Name;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// A local declaration in a goal's context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDecl {
    /// Free variable id
    pub fvar: FVarId,
    /// Name for display
    pub user_name: Name,
    /// Type of this local
    pub ty: Expr,
    /// Value, for let-bound locals
    pub value: Option<Expr>,
    pub binder_info: BinderInfo,
}

impl LocalDecl {
    pub fn is_let(&self) -> bool {
        self.value.is_some()
    }

    pub fn to_expr(&self) -> Expr {
        Expr::fvar(self.fvar)
    }
}

/// Ordered local context with an index by free variable
#[derive(Debug, Clone, Default)]
pub struct LocalContext {
    decls: Vec<LocalDecl>,
    index: HashMap<FVarId, usize>,
}

impl LocalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Add a hypothesis `user_name : ty`
    pub fn push_hyp(&mut self, fvar: FVarId, user_name: Name, ty: Expr, binder_info: BinderInfo) {
        self.push(LocalDecl {
            fvar,
            user_name,
            ty,
            value: None,
            binder_info,
        });
    }

    /// Add a let-bound local `user_name : ty := value`
    pub fn push_let(&mut self, fvar: FVarId, user_name: Name, ty: Expr, value: Expr) {
        self.push(LocalDecl {
            fvar,
            user_name,
            ty,
            value: Some(value),
            binder_info: BinderInfo::Default,
        });
    }

    /// Append a declaration. A declaration reusing an fvar replaces the old
    /// one in place.
    pub fn push(&mut self, decl: LocalDecl) {
        if let Some(&idx) = self.index.get(&decl.fvar) {
            self.decls[idx] = decl;
            return;
        }
        self.index.insert(decl.fvar, self.decls.len());
        self.decls.push(decl);
    }

    pub fn find(&self, fvar: FVarId) -> Option<&LocalDecl> {
        self.index.get(&fvar).map(|&idx| &self.decls[idx])
    }

    pub fn contains(&self, fvar: FVarId) -> bool {
        self.index.contains_key(&fvar)
    }

    /// Remove a declaration, keeping the order of the rest
    pub fn remove(&mut self, fvar: FVarId) -> Option<LocalDecl> {
        let idx = self.index.remove(&fvar)?;
        let decl = self.decls.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(decl)
    }

    pub fn last(&self) -> Option<&LocalDecl> {
        self.decls.last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LocalDecl> + '_ {
        self.decls.iter()
    }
}

impl PartialEq for LocalContext {
    fn eq(&self, other: &Self) -> bool {
        self.decls == other.decls
    }
}

impl<'a> IntoIterator for &'a LocalContext {
    type Item = &'a LocalDecl;
    type IntoIter = std::slice::Iter<'a, LocalDecl>;

    fn into_iter(self) -> Self::IntoIter {
        self.decls.iter()
    }
}

impl FromIterator<LocalDecl> for LocalContext {
    fn from_iter<I: IntoIterator<Item = LocalDecl>>(iter: I) -> Self {
        let mut lctx = LocalContext::new();
        for decl in iter {
            lctx.push(decl);
        }
        lctx
    }
}
