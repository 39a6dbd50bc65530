//! Expression representation
//!
//! The term language goals are stated in. Uses de Bruijn indices for bound
//! variables, `FVar` for locals of a goal's context and `MVar` for the
//! proof holes goals stand for.

use crate::level::Level;
use crate::name::Name;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Minimum stack space to reserve before recursive calls (32 KB).
const MIN_STACK_RED_ZONE: usize = 32 * 1024;

/// Stack size to grow to when running low (1 MB).
const STACK_GROWTH_SIZE: usize = 1024 * 1024;

/// Universe level lists in `Expr::Const`. Most constants take at most two.
pub type LevelVec = SmallVec<[Level; 2]>;

/// Name of the `letFun` marker constant: `letFun {α} {β} v (fun x => b)`.
pub const LET_FUN: &str = "letFun";

/// Binder information (how a variable is bound)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinderInfo {
    /// Regular explicit binding
    Default,
    /// Implicit binding `{x : T}`
    Implicit,
    /// Strict implicit `{{x : T}}`
    StrictImplicit,
    /// Instance implicit `[x : T]`
    InstImplicit,
}

/// Literal values
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    Nat(u64),
    String(Arc<str>),
}

/// Unique identifier for free variables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FVarId(pub u64);

/// Unique identifier for metavariables (goals)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MVarId(pub u64);

impl std::fmt::Display for FVarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_fvar.{}", self.0)
    }
}

impl std::fmt::Display for MVarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "?m.{}", self.0)
    }
}

/// Core expression type
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// Bound variable (de Bruijn index, 0 = innermost)
    BVar(u32),
    /// Free variable
    FVar(FVarId),
    /// Metavariable
    MVar(MVarId),
    /// Sort (Type u or Prop)
    Sort(Level),
    /// Constant with universe level instantiation
    Const(Name, LevelVec),
    /// Function application
    App(Arc<Expr>, Arc<Expr>),
    /// Lambda abstraction: λ (x : A), body
    Lam(BinderInfo, Arc<Expr>, Arc<Expr>),
    /// Pi/forall type: (x : A) → B
    Pi(BinderInfo, Arc<Expr>, Arc<Expr>),
    /// Let binding: let x : A := val in body
    Let(Arc<Expr>, Arc<Expr>, Arc<Expr>),
    /// Literal value
    Lit(Literal),
}

/// Parts of a `letFun v (fun x : ty => body)` application.
#[derive(Clone, Copy, Debug)]
pub struct LetFunView<'a> {
    pub ty: &'a Expr,
    pub body_ty: &'a Expr,
    pub value: &'a Expr,
    pub binder_info: BinderInfo,
    pub body: &'a Expr,
}

impl Expr {
    pub fn bvar(idx: u32) -> Self {
        Expr::BVar(idx)
    }

    pub fn fvar(id: FVarId) -> Self {
        Expr::FVar(id)
    }

    pub fn mvar(id: MVarId) -> Self {
        Expr::MVar(id)
    }

    pub fn sort(level: Level) -> Self {
        Expr::Sort(level)
    }

    /// Prop (Sort 0)
    pub fn prop() -> Self {
        Expr::Sort(Level::zero())
    }

    /// Type (Sort 1)
    pub fn type_() -> Self {
        Expr::Sort(Level::one())
    }

    pub fn const_(name: Name, levels: impl Into<LevelVec>) -> Self {
        Expr::Const(name, levels.into())
    }

    pub fn app(func: Expr, arg: Expr) -> Self {
        Expr::App(Arc::new(func), Arc::new(arg))
    }

    /// Apply `func` to every argument in order: `func a₁ ... aₙ`
    pub fn app_n(func: Expr, args: impl IntoIterator<Item = Expr>) -> Self {
        args.into_iter().fold(func, Expr::app)
    }

    pub fn lam(bi: BinderInfo, ty: Expr, body: Expr) -> Self {
        Expr::Lam(bi, Arc::new(ty), Arc::new(body))
    }

    pub fn pi(bi: BinderInfo, ty: Expr, body: Expr) -> Self {
        Expr::Pi(bi, Arc::new(ty), Arc::new(body))
    }

    /// Non-dependent pi. `to` must not mention the bound variable; it is
    /// lifted so that its own loose bound variables keep their meaning.
    pub fn arrow(from: Expr, to: Expr) -> Self {
        Expr::Pi(BinderInfo::Default, Arc::new(from), Arc::new(to.lift(1)))
    }

    pub fn let_(ty: Expr, val: Expr, body: Expr) -> Self {
        Expr::Let(Arc::new(ty), Arc::new(val), Arc::new(body))
    }

    /// `letFun {ty} {body_ty} val (fun x : ty => body)`
    pub fn let_fun(ty: Expr, body_ty: Expr, val: Expr, body: Expr) -> Self {
        let f = Expr::lam(BinderInfo::Default, ty.clone(), body);
        Expr::app_n(
            Expr::const_(Name::from_string(LET_FUN), LevelVec::new()),
            [ty, body_ty, val, f],
        )
    }

    pub fn const_name(&self) -> Option<&Name> {
        match self {
            Expr::Const(name, _) => Some(name),
            _ => None,
        }
    }

    /// Get the head of an application spine
    pub fn get_app_fn(&self) -> &Expr {
        match self {
            Expr::App(f, _) => f.get_app_fn(),
            _ => self,
        }
    }

    /// Get all arguments of an application spine
    pub fn get_app_args(&self) -> Vec<&Expr> {
        let mut args = Vec::new();
        let mut curr = self;
        while let Expr::App(f, a) = curr {
            args.push(a.as_ref());
            curr = f.as_ref();
        }
        args.reverse();
        args
    }

    pub fn get_app_num_args(&self) -> usize {
        let mut n = 0;
        let mut curr = self;
        while let Expr::App(f, _) = curr {
            n += 1;
            curr = f.as_ref();
        }
        n
    }

    /// `true` if this is `c a₁ ... aₙ` for the constant `c` named `name`
    pub fn is_app_of(&self, name: &Name, num_args: usize) -> bool {
        self.get_app_fn().const_name() == Some(name) && self.get_app_num_args() == num_args
    }

    /// Recognize `letFun {ty} {body_ty} val (fun x : ty => body)`
    pub fn as_let_fun(&self) -> Option<LetFunView<'_>> {
        if !self.is_app_of(&Name::from_string(LET_FUN), 4) {
            return None;
        }
        let args = self.get_app_args();
        match args[3] {
            Expr::Lam(bi, _, body) => Some(LetFunView {
                ty: args[0],
                body_ty: args[1],
                value: args[2],
                binder_info: *bi,
                body,
            }),
            _ => None,
        }
    }

    /// Number of binders `intro` can still peel off the front of this
    /// conclusion (pi, let and letFun layers).
    pub fn intro_depth(&self) -> usize {
        let mut depth = 0;
        let mut curr = self;
        loop {
            match curr {
                Expr::Pi(_, _, body) | Expr::Let(_, _, body) => {
                    depth += 1;
                    curr = body.as_ref();
                }
                _ => match curr.as_let_fun() {
                    Some(view) => {
                        depth += 1;
                        curr = view.body;
                    }
                    None => return depth,
                },
            }
        }
    }

    /// Substitute bound variable 0 with the given expression
    #[must_use]
    pub fn instantiate(&self, val: &Expr) -> Expr {
        self.instantiate_at(val, 0)
    }

    fn instantiate_at(&self, val: &Expr, depth: u32) -> Expr {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.instantiate_at_impl(val, depth)
        })
    }

    fn instantiate_at_impl(&self, val: &Expr, depth: u32) -> Expr {
        match self {
            Expr::BVar(idx) => {
                use std::cmp::Ordering;
                match idx.cmp(&depth) {
                    Ordering::Equal => val.lift(depth),
                    Ordering::Greater => Expr::BVar(idx - 1),
                    Ordering::Less => Expr::BVar(*idx),
                }
            }
            Expr::FVar(_) | Expr::MVar(_) | Expr::Sort(_) | Expr::Const(_, _) | Expr::Lit(_) => {
                self.clone()
            }
            Expr::App(f, a) => Expr::App(
                Arc::new(f.instantiate_at(val, depth)),
                Arc::new(a.instantiate_at(val, depth)),
            ),
            Expr::Lam(bi, ty, body) => Expr::Lam(
                *bi,
                Arc::new(ty.instantiate_at(val, depth)),
                Arc::new(body.instantiate_at(val, depth + 1)),
            ),
            Expr::Pi(bi, ty, body) => Expr::Pi(
                *bi,
                Arc::new(ty.instantiate_at(val, depth)),
                Arc::new(body.instantiate_at(val, depth + 1)),
            ),
            Expr::Let(ty, v, body) => Expr::Let(
                Arc::new(ty.instantiate_at(val, depth)),
                Arc::new(v.instantiate_at(val, depth)),
                Arc::new(body.instantiate_at(val, depth + 1)),
            ),
        }
    }

    /// Lift loose bound variables by `amount`
    #[must_use]
    pub fn lift(&self, amount: u32) -> Expr {
        self.lift_at(0, amount)
    }

    fn lift_at(&self, start: u32, amount: u32) -> Expr {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.lift_at_impl(start, amount)
        })
    }

    fn lift_at_impl(&self, start: u32, amount: u32) -> Expr {
        if amount == 0 || !self.has_loose_bvars_from(start) {
            return self.clone();
        }
        match self {
            Expr::BVar(idx) => {
                if *idx >= start {
                    Expr::BVar(idx + amount)
                } else {
                    Expr::BVar(*idx)
                }
            }
            Expr::FVar(_) | Expr::MVar(_) | Expr::Sort(_) | Expr::Const(_, _) | Expr::Lit(_) => {
                self.clone()
            }
            Expr::App(f, a) => Expr::App(
                Arc::new(f.lift_at(start, amount)),
                Arc::new(a.lift_at(start, amount)),
            ),
            Expr::Lam(bi, ty, body) => Expr::Lam(
                *bi,
                Arc::new(ty.lift_at(start, amount)),
                Arc::new(body.lift_at(start + 1, amount)),
            ),
            Expr::Pi(bi, ty, body) => Expr::Pi(
                *bi,
                Arc::new(ty.lift_at(start, amount)),
                Arc::new(body.lift_at(start + 1, amount)),
            ),
            Expr::Let(ty, val, body) => Expr::Let(
                Arc::new(ty.lift_at(start, amount)),
                Arc::new(val.lift_at(start, amount)),
                Arc::new(body.lift_at(start + 1, amount)),
            ),
        }
    }

    /// Check if expression has any loose bound variables
    pub fn has_loose_bvars(&self) -> bool {
        self.has_loose_bvar_in_range(0, u32::MAX)
    }

    /// Check if bound variable `idx` occurs loose
    pub fn has_loose_bvar(&self, idx: u32) -> bool {
        self.has_loose_bvar_in_range(idx, idx + 1)
    }

    fn has_loose_bvars_from(&self, start: u32) -> bool {
        self.has_loose_bvar_in_range(start, u32::MAX)
    }

    /// Check if expression has loose bound variables in range [start, end)
    fn has_loose_bvar_in_range(&self, start: u32, end: u32) -> bool {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || match self {
            Expr::BVar(idx) => *idx >= start && *idx < end,
            Expr::FVar(_) | Expr::MVar(_) | Expr::Sort(_) | Expr::Const(_, _) | Expr::Lit(_) => {
                false
            }
            Expr::App(f, a) => {
                f.has_loose_bvar_in_range(start, end) || a.has_loose_bvar_in_range(start, end)
            }
            Expr::Lam(_, ty, body) | Expr::Pi(_, ty, body) => {
                ty.has_loose_bvar_in_range(start, end)
                    || body.has_loose_bvar_in_range(start + 1, end.saturating_add(1))
            }
            Expr::Let(ty, val, body) => {
                ty.has_loose_bvar_in_range(start, end)
                    || val.has_loose_bvar_in_range(start, end)
                    || body.has_loose_bvar_in_range(start + 1, end.saturating_add(1))
            }
        })
    }

    /// Abstract: replace FVar(id) with BVar(0), shifting other bound variables up
    #[must_use]
    pub fn abstract_fvar(&self, id: FVarId) -> Expr {
        self.abstract_fvar_at(id, 0)
    }

    fn abstract_fvar_at(&self, id: FVarId, depth: u32) -> Expr {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.abstract_fvar_at_impl(id, depth)
        })
    }

    fn abstract_fvar_at_impl(&self, id: FVarId, depth: u32) -> Expr {
        match self {
            Expr::FVar(fid) if *fid == id => Expr::BVar(depth),
            Expr::FVar(_) | Expr::MVar(_) | Expr::Sort(_) | Expr::Const(_, _) | Expr::Lit(_) => {
                self.clone()
            }
            Expr::BVar(idx) => {
                if *idx >= depth {
                    Expr::BVar(idx + 1)
                } else {
                    Expr::BVar(*idx)
                }
            }
            Expr::App(f, a) => Expr::App(
                Arc::new(f.abstract_fvar_at(id, depth)),
                Arc::new(a.abstract_fvar_at(id, depth)),
            ),
            Expr::Lam(bi, ty, body) => Expr::Lam(
                *bi,
                Arc::new(ty.abstract_fvar_at(id, depth)),
                Arc::new(body.abstract_fvar_at(id, depth + 1)),
            ),
            Expr::Pi(bi, ty, body) => Expr::Pi(
                *bi,
                Arc::new(ty.abstract_fvar_at(id, depth)),
                Arc::new(body.abstract_fvar_at(id, depth + 1)),
            ),
            Expr::Let(ty, val, body) => Expr::Let(
                Arc::new(ty.abstract_fvar_at(id, depth)),
                Arc::new(val.abstract_fvar_at(id, depth)),
                Arc::new(body.abstract_fvar_at(id, depth + 1)),
            ),
        }
    }

    /// Substitute a free variable with a closed expression
    #[must_use]
    pub fn subst_fvar(&self, id: FVarId, replacement: &Expr) -> Expr {
        self.replace(&mut |e: &Expr| match e {
            Expr::FVar(fid) if *fid == id => Some(replacement.clone()),
            _ => None,
        })
    }

    /// Rebuild the expression bottom-up, replacing every subterm for which
    /// `f` returns `Some`. Replacements are not traversed again.
    #[must_use]
    pub fn replace(&self, f: &mut impl FnMut(&Expr) -> Option<Expr>) -> Expr {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            if let Some(r) = f(self) {
                return r;
            }
            match self {
                Expr::BVar(_)
                | Expr::FVar(_)
                | Expr::MVar(_)
                | Expr::Sort(_)
                | Expr::Const(_, _)
                | Expr::Lit(_) => self.clone(),
                Expr::App(fun, a) => Expr::App(Arc::new(fun.replace(f)), Arc::new(a.replace(f))),
                Expr::Lam(bi, ty, body) => {
                    Expr::Lam(*bi, Arc::new(ty.replace(f)), Arc::new(body.replace(f)))
                }
                Expr::Pi(bi, ty, body) => {
                    Expr::Pi(*bi, Arc::new(ty.replace(f)), Arc::new(body.replace(f)))
                }
                Expr::Let(ty, val, body) => Expr::Let(
                    Arc::new(ty.replace(f)),
                    Arc::new(val.replace(f)),
                    Arc::new(body.replace(f)),
                ),
            }
        })
    }

    /// Check whether any subterm satisfies `p`
    pub fn any(&self, p: &mut impl FnMut(&Expr) -> bool) -> bool {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            if p(self) {
                return true;
            }
            match self {
                Expr::App(f, a) => f.any(p) || a.any(p),
                Expr::Lam(_, ty, body) | Expr::Pi(_, ty, body) => ty.any(p) || body.any(p),
                Expr::Let(ty, val, body) => ty.any(p) || val.any(p) || body.any(p),
                _ => false,
            }
        })
    }

    pub fn has_fvar(&self, id: FVarId) -> bool {
        self.any(&mut |e: &Expr| matches!(e, Expr::FVar(fid) if *fid == id))
    }

    pub fn has_mvar(&self) -> bool {
        self.any(&mut |e: &Expr| matches!(e, Expr::MVar(_)))
    }
}
