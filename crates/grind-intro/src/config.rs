//! Engine configuration

use serde::{Deserialize, Serialize};

/// Configuration for goal introduction and fact assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrindConfig {
    /// Turn a terminal propositional goal `p` (other than `False`) into
    /// `¬p → False` and keep introducing
    pub by_contra: bool,
    /// Split introduced locals and hypotheses whose type is a case target
    pub cases: bool,
    /// Decompose constructor equalities by injectivity
    pub injection: bool,
    /// When asserting a fact whose proposition is a case target, introduce
    /// it as a hypothesis so it gets split right away
    pub eager_cases: bool,
    /// Maximum number of case splits along one branch (`None` = unbounded)
    pub max_case_splits: Option<u32>,
}

impl Default for GrindConfig {
    fn default() -> Self {
        Self {
            by_contra: false,
            cases: true,
            injection: true,
            eager_cases: false,
            max_case_splits: None,
        }
    }
}

impl GrindConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_by_contra(mut self, enabled: bool) -> Self {
        self.by_contra = enabled;
        self
    }

    #[must_use]
    pub fn with_cases(mut self, enabled: bool) -> Self {
        self.cases = enabled;
        self
    }

    #[must_use]
    pub fn with_injection(mut self, enabled: bool) -> Self {
        self.injection = enabled;
        self
    }

    #[must_use]
    pub fn with_eager_cases(mut self, enabled: bool) -> Self {
        self.eager_cases = enabled;
        self
    }

    #[must_use]
    pub fn with_max_case_splits(mut self, max: u32) -> Self {
        self.max_case_splits = Some(max);
        self
    }

    /// `true` if one more case split is allowed after `done` splits
    pub fn allows_case_split(&self, done: u32) -> bool {
        self.cases && self.max_case_splits.map_or(true, |max| done < max)
    }
}
