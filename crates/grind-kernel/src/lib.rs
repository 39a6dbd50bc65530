//! Grind kernel
//!
//! The term language the intro/assert engine manipulates:
//! - [`Name`]: hierarchical names with cached hashes
//! - [`Level`]: universe levels
//! - [`Expr`]: de Bruijn expressions with free variables and metavariables
//! - [`LocalContext`]: the ordered hypotheses of a goal

pub mod expr;
pub mod level;
pub mod local_ctx;
pub mod name;

pub use expr::{BinderInfo, Expr, FVarId, LetFunView, LevelVec, Literal, MVarId, LET_FUN};
pub use level::Level;
pub use local_ctx::{LocalContext, LocalDecl};
pub use name::Name;
