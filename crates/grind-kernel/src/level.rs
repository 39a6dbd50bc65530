//! Universe levels
//!
//! Only what goal descriptions need: `Prop` is `Sort 0`, and equality
//! proofs are built at the universe of the type being compared.

use crate::name::Name;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Zero,
    Succ(Arc<Level>),
    Max(Arc<Level>, Arc<Level>),
    IMax(Arc<Level>, Arc<Level>),
    Param(Name),
}

impl Level {
    pub fn zero() -> Self {
        Level::Zero
    }

    pub fn one() -> Self {
        Level::succ(Level::Zero)
    }

    pub fn succ(l: Level) -> Self {
        Level::Succ(Arc::new(l))
    }

    pub fn max(l1: Level, l2: Level) -> Self {
        Level::Max(Arc::new(l1), Arc::new(l2))
    }

    pub fn imax(l1: Level, l2: Level) -> Self {
        Level::IMax(Arc::new(l1), Arc::new(l2))
    }

    pub fn param(name: Name) -> Self {
        Level::Param(name)
    }

    /// Evaluate a closed level to a number. Returns `None` if the level
    /// mentions a parameter.
    pub fn to_nat(&self) -> Option<u64> {
        match self {
            Level::Zero => Some(0),
            Level::Succ(l) => l.to_nat().map(|n| n + 1),
            Level::Max(a, b) => Some(a.to_nat()?.max(b.to_nat()?)),
            Level::IMax(a, b) => {
                let b = b.to_nat()?;
                if b == 0 {
                    Some(0)
                } else {
                    Some(a.to_nat()?.max(b))
                }
            }
            Level::Param(_) => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(n) = self.to_nat() {
            return write!(f, "{n}");
        }
        match self {
            Level::Zero => write!(f, "0"),
            Level::Succ(l) => write!(f, "{l}+1"),
            Level::Max(a, b) => write!(f, "max {a} {b}"),
            Level::IMax(a, b) => write!(f, "imax {a} {b}"),
            Level::Param(name) => write!(f, "{name}"),
        }
    }
}
