//! Node identifiers backed by a global string interner.
//!
//! This module provides the [`Id`] type. Topology files name nodes with
//! arbitrary strings; interning them makes ids `Copy`, cheap to hash and cheap
//! to compare, which matters for the adjacency lookups done during tree
//! conversion and layout.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned identifier of a topology node or edge.
///
/// # Examples
///
/// ```
/// use topoview_core::identifier::Id;
///
/// let router = Id::new("router-1");
/// assert_eq!(router, "router-1");
///
/// // Aggregate nodes get a derived identifier per group
/// let group = Id::for_group(4);
/// assert_eq!(group, "group-4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates the identifier of the aggregate node standing for `group`.
    ///
    /// # Arguments
    ///
    /// * `group` - The group number shared by the aggregated nodes.
    pub fn for_group(group: u32) -> Self {
        Self::new(&format!("group-{group}"))
    }

    /// Returns the interned string of this identifier.
    pub fn as_string(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
