//! Interned names for blocks, inputs and fields.
//!
//! Block definitions reuse the same handful of names (`"DO"`, `"IF0"`,
//! `"controls_repeat"`) across many instances, so names are interned once and
//! compared as symbols.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// An interned name.
///
/// # Examples
///
/// ```
/// use brickwork_core::identifier::Id;
///
/// let body = Id::new("DO");
/// assert_eq!(body, "DO");
/// assert_eq!(body, Id::new("DO"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns an owned copy of the interned string.
    pub fn to_name(self) -> String {
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
        write!(f, "{}", self.to_name())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_id() {
        assert_eq!(Id::new("STACK"), Id::new("STACK"));
        assert_ne!(Id::new("STACK"), Id::new("VALUE"));
    }

    #[test]
    fn test_display_and_str_comparison() {
        let id: Id = "controls_if".into();
        assert_eq!(id.to_string(), "controls_if");
        assert!(id == "controls_if");
        assert!(id != "controls_else");
    }
}
