//! Goal introduction and hypothesis assertion for grind-style automation
//!
//! Turns an open goal into atomic facts for an equality saturation core:
//! binders of the conclusion become hypotheses and locals, hypotheses are
//! simplified and registered, inductive locals are split by cases and
//! constructor equalities are decomposed by injectivity. What remains are
//! goals with atomic conclusions.
//!
//! ```text
//! intros ─► drain ─► decompose ─┬─ Done ────────► terminal goals
//!    ▲                          ├─ Split/Injected ─┐
//!    │                          └─ CaseSplit ─► intros (per arm)
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! The engine never decides anything about the logic itself. It is generic
//! over a [`Backend`] combining the simplifier, congruence core, elaborator,
//! case splitter and injector.

pub mod assert;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod engine;
pub mod error;
pub mod goal;
pub mod intro;
pub mod meta;
pub mod proof;

#[cfg(test)]
mod tests;

pub use assert::Step;
pub use backend::{
    Backend, CaseSplitter, CongruenceCore, Elaborator, FactStatus, Injector, SimpResult,
    Simplifier, Subgoal,
};
pub use config::GrindConfig;
pub use engine::{GoalOf, Grind};
pub use error::{BackendError, GrindError, GrindResult};
pub use goal::{FactQueue, Goal, PendingFact};
pub use intro::{Decomposition, IntroStep};
pub use meta::{MetaDecl, MetaState};
