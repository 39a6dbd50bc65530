//! Hierarchical names
//!
//! Names like `Eq.mp` or `h.3`. Numeric components are used for
//! machine-generated names: the elaborator produces fresh user names by
//! appending a counter to a base name (`h` becomes `h.1`, `h.2`, ...).
//!
//! The hash is computed once when the name is built, so names can be used as
//! map keys without re-walking the component chain.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Component chain of a name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameInner {
    /// Anonymous name
    Anon,
    /// String component
    Str(Arc<Name>, Arc<str>),
    /// Numeric component
    Num(Arc<Name>, u64),
}

/// Hierarchical name with cached hash.
#[derive(Clone, Debug)]
pub struct Name {
    inner: NameInner,
    cached_hash: u64,
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let inner = NameInner::deserialize(deserializer)?;
        Ok(Self::from_inner(inner))
    }
}

impl Name {
    fn from_inner(inner: NameInner) -> Self {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        inner.hash(&mut hasher);
        Name {
            inner,
            cached_hash: hasher.finish(),
        }
    }

    /// The anonymous name
    pub fn anon() -> Self {
        Self::from_inner(NameInner::Anon)
    }

    /// Append a string component
    #[must_use]
    pub fn str(self, s: impl AsRef<str>) -> Self {
        Self::from_inner(NameInner::Str(Arc::new(self), Arc::from(s.as_ref())))
    }

    /// Append a numeric component
    #[must_use]
    pub fn num(self, n: u64) -> Self {
        Self::from_inner(NameInner::Num(Arc::new(self), n))
    }

    /// Create from a dotted string like `Classical.byContradiction`
    pub fn from_string(s: &str) -> Self {
        match s.parse() {
            Ok(name) => name,
            Err(never) => match never {},
        }
    }

    pub fn is_anon(&self) -> bool {
        matches!(self.inner, NameInner::Anon)
    }

    #[inline]
    pub fn inner(&self) -> &NameInner {
        &self.inner
    }

    /// The name without its last component (anonymous stays anonymous)
    pub fn prefix(&self) -> Name {
        match &self.inner {
            NameInner::Anon => Name::anon(),
            NameInner::Str(p, _) | NameInner::Num(p, _) => (**p).clone(),
        }
    }

    /// Drop trailing numeric components: `h.3` becomes `h`.
    ///
    /// Fresh names are built from the erased form so that renaming an
    /// already-fresh name does not stack counters.
    pub fn erase_macro_scopes(&self) -> Name {
        let mut curr = self;
        while let NameInner::Num(p, _) = &curr.inner {
            curr = p;
        }
        curr.clone()
    }

    /// Number of components
    pub fn depth(&self) -> usize {
        match &self.inner {
            NameInner::Anon => 0,
            NameInner::Str(p, _) | NameInner::Num(p, _) => p.depth() + 1,
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.cached_hash == other.cached_hash && self.inner == other.inner
    }
}

impl Eq for Name {}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cached_hash.hash(state);
    }
}

impl FromStr for Name {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split('.').fold(Name::anon(), |acc, part| {
            if let Ok(n) = part.parse::<u64>() {
                acc.num(n)
            } else {
                acc.str(part)
            }
        }))
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::from_string(s)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            NameInner::Anon => write!(f, "[anonymous]"),
            NameInner::Str(prefix, s) => {
                if prefix.is_anon() {
                    write!(f, "{s}")
                } else {
                    write!(f, "{prefix}.{s}")
                }
            }
            NameInner::Num(prefix, n) => {
                if prefix.is_anon() {
                    write!(f, "{n}")
                } else {
                    write!(f, "{prefix}.{n}")
                }
            }
        }
    }
}
