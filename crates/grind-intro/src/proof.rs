//! Proof-term builders
//!
//! Only the shapes the engine itself produces. Proof terms are not checked
//! here; a later kernel pass validates the final assignment.

use grind_kernel::{Expr, Level, LevelVec, Name};

pub const EQ: &str = "Eq";
pub const EQ_REFL: &str = "Eq.refl";
pub const EQ_MP: &str = "Eq.mp";
pub const NOT: &str = "Not";
pub const FALSE: &str = "False";
pub const BY_CONTRADICTION: &str = "Classical.byContradiction";
pub const INTRO_WITH_EQ: &str = "Grind.intro_with_eq";

fn const0(name: &str) -> Expr {
    Expr::const_(Name::from_string(name), LevelVec::new())
}

fn const1(name: &str, level: Level) -> Expr {
    Expr::const_(Name::from_string(name), [level].into_iter().collect::<LevelVec>())
}

/// `@Eq.{u} ty a b`
pub fn mk_eq(level: Level, ty: Expr, a: Expr, b: Expr) -> Expr {
    Expr::app_n(const1(EQ, level), [ty, a, b])
}

/// `@Eq.refl.{u} ty a`
pub fn mk_eq_refl(level: Level, ty: Expr, a: Expr) -> Expr {
    Expr::app_n(const1(EQ_REFL, level), [ty, a])
}

/// `@Eq.mp p q h hp : q` from `h : p = q` and `hp : p`
pub fn mk_eq_mp(p: Expr, q: Expr, h: Expr, hp: Expr) -> Expr {
    Expr::app_n(const1(EQ_MP, Level::zero()), [p, q, h, hp])
}

/// `Grind.intro_with_eq p p' q he h : p → q` from `he : p = p'` and
/// `h : p' → q`
pub fn mk_intro_with_eq(p: Expr, p_simp: Expr, q: Expr, he: Expr, h: Expr) -> Expr {
    Expr::app_n(const0(INTRO_WITH_EQ), [p, p_simp, q, he, h])
}

pub fn mk_false() -> Expr {
    const0(FALSE)
}

pub fn is_false(e: &Expr) -> bool {
    e.const_name() == Some(&Name::from_string(FALSE))
}

pub fn mk_not(p: Expr) -> Expr {
    Expr::app(const0(NOT), p)
}

/// `Classical.byContradiction p h : p` from `h : ¬p → False`
pub fn mk_by_contra(p: Expr, h: Expr) -> Expr {
    Expr::app_n(const0(BY_CONTRADICTION), [p, h])
}
