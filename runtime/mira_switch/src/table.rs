//! Validated ordered pattern list for one call site.

use crate::errors::LinkError;
use mira_classes::{ClassId, ClassTable};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One candidate type pattern: a class plus its 0-based declaration index.
///
/// The index matches source order and is the priority order for matching —
/// first listed, first tried.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub class: ClassId,
    pub index: u32,
}

impl Pattern {
    /// The matching predicate: does a value of runtime class `value_class`
    /// satisfy this pattern?
    ///
    /// True when the value's class is the pattern's class or any subtype of
    /// it. Total and side-effect-free; no user code runs here.
    #[inline]
    pub fn admits(&self, classes: &ClassTable, value_class: ClassId) -> bool {
        classes.is_assignable(self.class, value_class)
    }
}

/// Immutable ordered sequence of patterns; exactly one per linked call site.
///
/// Built once at link time, never mutated. Validation is structural only:
/// absent entries, unknown classes, and duplicates are rejected.
/// Unreachable-pattern analysis (a subtype listed after its supertype can
/// never match first) is the compiler's job, not this table's.
#[derive(Debug)]
pub struct PatternTable {
    patterns: SmallVec<[Pattern; 8]>,
}

impl PatternTable {
    /// Build a table from a compiler-supplied pattern list.
    ///
    /// Input order is kept exactly; it is the match priority order. An
    /// empty list is legal — every present value then answers `0` (== N).
    pub fn build(classes: &ClassTable, patterns: &[ClassId]) -> Result<Self, LinkError> {
        let mut seen: FxHashMap<ClassId, usize> = FxHashMap::default();
        let mut table = SmallVec::with_capacity(patterns.len());

        for (index, &class) in patterns.iter().enumerate() {
            if !class.is_valid() {
                return Err(LinkError::AbsentPattern { index });
            }
            if !classes.contains(class) {
                return Err(LinkError::UnknownClass { index, class });
            }
            if let Some(&first) = seen.get(&class) {
                return Err(LinkError::DuplicatePattern {
                    class,
                    first,
                    second: index,
                });
            }
            seen.insert(class, index);
            table.push(Pattern {
                class,
                index: index as u32,
            });
        }

        Ok(PatternTable { patterns: table })
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the table has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Get the pattern at `index`.
    pub fn get(&self, index: usize) -> Option<Pattern> {
        self.patterns.get(index).copied()
    }

    /// Iterate patterns in priority order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Pattern> + '_ {
        self.patterns.iter().copied()
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

    fn classes() -> (ClassTable, ClassId, ClassId, ClassId) {
        let classes = ClassTable::new();
        let object = classes.register("Object", &[]).unwrap();
        let char_seq = classes.register("CharSequence", &[object]).unwrap();
        let string = classes.register("String", &[char_seq]).unwrap();
        (classes, object, char_seq, string)
    }

    #[test]
    fn build_keeps_input_order() {
        let (classes, object, char_seq, string) = classes();
        let table = PatternTable::build(&classes, &[string, char_seq, object]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0).unwrap().class, string);
        assert_eq!(table.get(1).unwrap().class, char_seq);
        assert_eq!(table.get(2).unwrap().class, object);
        assert_eq!(table.get(1).unwrap().index, 1);
    }

    #[test]
    fn empty_table_is_legal() {
        let (classes, ..) = classes();
        let table = PatternTable::build(&classes, &[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn absent_pattern_is_rejected() {
        let (classes, object, ..) = classes();
        let err = PatternTable::build(&classes, &[object, ClassId::INVALID]).unwrap_err();
        assert_eq!(err, LinkError::AbsentPattern { index: 1 });
    }

    #[test]
    fn unknown_class_is_rejected() {
        let (classes, object, ..) = classes();
        let bogus = ClassId::new(42);
        let err = PatternTable::build(&classes, &[object, bogus]).unwrap_err();
        assert_eq!(
            err,
            LinkError::UnknownClass {
                index: 1,
                class: bogus
            }
        );
    }

    #[test]
    fn duplicate_pattern_is_rejected() {
        let (classes, object, char_seq, _) = classes();
        let err = PatternTable::build(&classes, &[object, char_seq, object]).unwrap_err();
        assert_eq!(
            err,
            LinkError::DuplicatePattern {
                class: object,
                first: 0,
                second: 2
            }
        );
    }

    #[test]
    fn subtype_shadowing_is_not_this_tables_concern() {
        // [Object, String] makes String unreachable, but reachability is a
        // compiler-side analysis; the table accepts it.
        let (classes, object, _, string) = classes();
        assert!(PatternTable::build(&classes, &[object, string]).is_ok());
    }

    #[test]
    fn admits_follows_assignability() {
        let (classes, object, char_seq, string) = classes();
        let table = PatternTable::build(&classes, &[char_seq]).unwrap();
        let p = table.get(0).unwrap();
        assert!(p.admits(&classes, string));
        assert!(p.admits(&classes, char_seq));
        assert!(!p.admits(&classes, object));
    }
}
