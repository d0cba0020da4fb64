//! Class registration arena with an O(1) assignability oracle.
//!
//! Classes are registered once, supertypes first. Registration computes the
//! transitive ancestor set up front, so `is_assignable` is a single set
//! probe with no graph walk at dispatch time.

use crate::ClassId;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// One registered class: its name and the precomputed transitive ancestor
/// set (including the class itself).
struct ClassInfo {
    name: Box<str>,
    ancestors: FxHashSet<ClassId>,
}

/// Error when registering a class fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// A class with this name is already registered.
    DuplicateName(String),
    /// A direct supertype was not a previously registered class.
    UnknownSuper { name: String, super_class: ClassId },
    /// Table exceeded capacity (over 4 billion classes).
    Overflow { count: usize },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::DuplicateName(name) => {
                write!(f, "class `{name}` is already registered")
            }
            RegisterError::UnknownSuper { name, super_class } => write!(
                f,
                "class `{name}` names an unregistered supertype {super_class:?}"
            ),
            RegisterError::Overflow { count } => write!(
                f,
                "class table exceeded capacity: {count} classes, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for RegisterError {}

struct Inner {
    classes: Vec<ClassInfo>,
    by_name: FxHashMap<Box<str>, ClassId>,
}

/// Append-only arena of runtime classes.
///
/// Supertypes must be registered before their subtypes, which keeps every
/// ancestor set closed at registration time.
///
/// # Thread Safety
/// Uses an `RwLock` internally; share across threads via `Arc<ClassTable>`.
/// `is_assignable` and lookups take the read lock only.
pub struct ClassTable {
    inner: RwLock<Inner>,
}

impl ClassTable {
    /// Create an empty class table.
    pub fn new() -> Self {
        ClassTable {
            inner: RwLock::new(Inner {
                classes: Vec::with_capacity(64),
                by_name: FxHashMap::default(),
            }),
        }
    }

    /// Register a class with its direct supertypes.
    ///
    /// Every element of `supers` must already be registered. Returns the
    /// new class's `ClassId`.
    pub fn register(&self, name: &str, supers: &[ClassId]) -> Result<ClassId, RegisterError> {
        let mut inner = self.inner.write();

        if inner.by_name.contains_key(name) {
            return Err(RegisterError::DuplicateName(name.to_owned()));
        }
        let count = inner.classes.len();
        if count >= u32::MAX as usize {
            return Err(RegisterError::Overflow { count });
        }

        // Ancestor set = self + union of each direct super's ancestors.
        let id = ClassId::new(count as u32);
        let mut ancestors = FxHashSet::default();
        ancestors.insert(id);
        for &sup in supers {
            let Some(info) = inner.classes.get(sup.index()) else {
                return Err(RegisterError::UnknownSuper {
                    name: name.to_owned(),
                    super_class: sup,
                });
            };
            ancestors.extend(info.ancestors.iter().copied());
        }

        inner.classes.push(ClassInfo {
            name: name.into(),
            ancestors,
        });
        inner.by_name.insert(name.into(), id);
        Ok(id)
    }

    /// Look up a class by name.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.inner.read().by_name.get(name).copied()
    }

    /// Get the name of a registered class.
    pub fn name(&self, id: ClassId) -> Option<String> {
        let inner = self.inner.read();
        inner.classes.get(id.index()).map(|c| c.name.to_string())
    }

    /// Check whether `id` names a registered class.
    pub fn contains(&self, id: ClassId) -> bool {
        id.is_valid() && id.index() < self.inner.read().classes.len()
    }

    /// Subtype oracle: is a value of runtime class `sub` assignable to a
    /// variable of class `target`?
    ///
    /// True when `sub` is `target` itself or any transitive subtype of it.
    /// Unknown ids answer false rather than panicking; the linker validates
    /// ids before they reach a hot path.
    #[inline]
    pub fn is_assignable(&self, target: ClassId, sub: ClassId) -> bool {
        let inner = self.inner.read();
        inner
            .classes
            .get(sub.index())
            .is_some_and(|c| c.ancestors.contains(&target))
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.inner.read().classes.len()
    }

    /// Check if no classes are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (ClassTable, ClassId, ClassId, ClassId, ClassId) {
        let table = ClassTable::new();
        let object = table.register("Object", &[]).unwrap();
        let char_seq = table.register("CharSequence", &[object]).unwrap();
        let string = table.register("String", &[char_seq]).unwrap();
        let number = table.register("Number", &[object]).unwrap();
        (table, object, char_seq, string, number)
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let (table, object, char_seq, string, number) = sample();
        assert_eq!(object, ClassId::new(0));
        assert_eq!(char_seq, ClassId::new(1));
        assert_eq!(string, ClassId::new(2));
        assert_eq!(number, ClassId::new(3));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn assignability_is_reflexive_and_transitive() {
        let (table, object, char_seq, string, number) = sample();
        assert!(table.is_assignable(string, string));
        assert!(table.is_assignable(char_seq, string));
        assert!(table.is_assignable(object, string));
        assert!(table.is_assignable(object, number));
        assert!(!table.is_assignable(string, char_seq));
        assert!(!table.is_assignable(number, string));
    }

    #[test]
    fn multiple_supertypes() {
        let (table, object, _, _, _) = sample();
        let serializable = table.register("Serializable", &[object]).unwrap();
        let comparable = table.register("Comparable", &[object]).unwrap();
        let uuid = table
            .register("Uuid", &[serializable, comparable])
            .unwrap();
        assert!(table.is_assignable(serializable, uuid));
        assert!(table.is_assignable(comparable, uuid));
        assert!(table.is_assignable(object, uuid));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let (table, ..) = sample();
        assert_eq!(
            table.register("Object", &[]),
            Err(RegisterError::DuplicateName("Object".to_owned()))
        );
    }

    #[test]
    fn unknown_super_is_rejected() {
        let table = ClassTable::new();
        let bogus = ClassId::new(7);
        assert_eq!(
            table.register("Orphan", &[bogus]),
            Err(RegisterError::UnknownSuper {
                name: "Orphan".to_owned(),
                super_class: bogus,
            })
        );
    }

    #[test]
    fn lookup_and_name_round_trip() {
        let (table, _, _, string, _) = sample();
        assert_eq!(table.lookup("String"), Some(string));
        assert_eq!(table.name(string).as_deref(), Some("String"));
        assert_eq!(table.lookup("Missing"), None);
    }

    #[test]
    fn unknown_ids_are_never_assignable() {
        let (table, object, ..) = sample();
        assert!(!table.is_assignable(object, ClassId::INVALID));
        assert!(!table.is_assignable(object, ClassId::new(999)));
        assert!(!table.contains(ClassId::INVALID));
    }
}
