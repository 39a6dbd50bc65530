//! Error types for goal introduction and fact assertion

use grind_kernel::{FVarId, MVarId};
use thiserror::Error;

/// Result type for engine operations
pub type GrindResult<T> = Result<T, GrindError>;

/// Failure reported by a collaborator (simplifier, congruence core, case
/// splitter, injector). The engine tags it with the collaborator it came
/// from before propagating it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that abort an `intros` or `assert_all` call.
///
/// There is no recovery at this layer: the first error ends the call and
/// the partial output is dropped.
#[derive(Debug, Error)]
pub enum GrindError {
    /// The simplifier could not normalize a term
    #[error("simplifier failed: {0}")]
    Simplify(#[source] BackendError),

    /// The congruence core rejected a fact
    #[error("congruence core failed: {0}")]
    Congruence(#[source] BackendError),

    /// Name, variable or metavariable creation failed
    #[error("elaborator failed: {0}")]
    Elaborator(#[source] BackendError),

    /// The case-split primitive failed on a recognized target
    #[error("case split failed: {0}")]
    CaseSplit(#[source] BackendError),

    /// The injectivity primitive failed
    #[error("injection failed: {0}")]
    Injection(#[source] BackendError),

    /// Metavariable not declared in the metavariable store
    #[error("unknown metavariable {0}")]
    UnknownMVar(MVarId),

    /// Goal metavariable assigned twice
    #[error("metavariable {0} is already assigned")]
    AlreadyAssigned(MVarId),

    /// Free variable missing from the goal's local context
    #[error("unknown free variable {0}")]
    UnknownFVar(FVarId),
}
