//! Execution strategies for a linked pattern table.
//!
//! Both strategies compute the same selection function; they differ only in
//! where the work happens. `Linear` costs nothing to construct and scans
//! the table on every call. `Chain` folds the table once, at link time,
//! into a fixed chain of guarded decision nodes and answers each call by
//! walking that chain — the explicit-value rendition of the original
//! guard/fold handle composition, built from the last pattern back to the
//! first with the no-match fallback innermost.
//!
//! The absent-value check is NOT here: the dispatcher answers `-1` once,
//! ahead of either strategy.

use crate::table::PatternTable;
use mira_classes::{ClassId, ClassTable};
use std::fmt;
use std::sync::Arc;

/// Which strategy a selector chose. Pure data, useful for assertions and
/// link-time logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// Scan the table in order on every call.
    Linear,
    /// Walk a decision chain precomputed at link time.
    Chain,
}

/// One node of the precomputed decision chain.
///
/// Takes the value's runtime class and the caller's start index; answers
/// the match result for its own pattern or delegates to the next node.
type ChainNode = Box<dyn Fn(ClassId, u32) -> i32 + Send + Sync>;

/// A constructed strategy, bound to one pattern table.
pub(crate) enum Strategy {
    Linear,
    Chain(ChainNode),
}

impl Strategy {
    /// Construct the linear strategy. O(1); all cost is per-call.
    pub(crate) fn linear() -> Self {
        Strategy::Linear
    }

    /// Construct the decision chain for `table`. O(len) construction,
    /// fixed-depth walk per call.
    ///
    /// Folded back to front: the innermost fallback answers `len` (no
    /// match), and each pattern wraps it with a guard answering its own
    /// index when `start_index <= index` and the value's class is
    /// assignable to the pattern's class.
    pub(crate) fn chain(table: &PatternTable, classes: &Arc<ClassTable>) -> Self {
        let len = table.len() as i32;
        let mut node: ChainNode = Box::new(move |_, _| len);

        for pattern in table.iter().rev() {
            let class = pattern.class;
            let index = pattern.index;
            let classes = Arc::clone(classes);
            let next = node;
            node = Box::new(move |value_class, start_index| {
                if start_index <= index && classes.is_assignable(class, value_class) {
                    index as i32
                } else {
                    next(value_class, start_index)
                }
            });
        }

        Strategy::Chain(node)
    }

    /// Execute the match for a present value.
    ///
    /// `start_index` has already been validated (`<= table.len()`); the
    /// absent-value case never reaches a strategy.
    pub(crate) fn select(
        &self,
        table: &PatternTable,
        classes: &ClassTable,
        value_class: ClassId,
        start_index: u32,
    ) -> i32 {
        match self {
            Strategy::Linear => {
                for pattern in table.iter().skip(start_index as usize) {
                    if pattern.admits(classes, value_class) {
                        return pattern.index as i32;
                    }
                }
                table.len() as i32
            }
            Strategy::Chain(node) => node(value_class, start_index),
        }
    }

    /// The kind this strategy was constructed as.
    pub(crate) fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Linear => StrategyKind::Linear,
            Strategy::Chain(_) => StrategyKind::Chain,
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strategy::{:?}", self.kind())
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

    fn fixture() -> (Arc<ClassTable>, PatternTable, ClassId, ClassId) {
        let classes = Arc::new(ClassTable::new());
        let object = classes.register("Object", &[]).unwrap();
        let char_seq = classes.register("CharSequence", &[object]).unwrap();
        let string = classes.register("String", &[char_seq]).unwrap();
        let number = classes.register("Number", &[object]).unwrap();
        let double = classes.register("Double", &[number]).unwrap();
        let table = PatternTable::build(&classes, &[string, char_seq, number]).unwrap();
        (classes, table, string, double)
    }

    fn run(strategy: &Strategy, fixture: &(Arc<ClassTable>, PatternTable, ClassId, ClassId)) {
        let (classes, table, string, double) = fixture;
        // First match wins: String matches both [0] and [1].
        assert_eq!(strategy.select(table, classes, *string, 0), 0);
        // Resumed past the String pattern, the CharSequence pattern answers.
        assert_eq!(strategy.select(table, classes, *string, 1), 1);
        // Double matches only the Number pattern.
        assert_eq!(strategy.select(table, classes, *double, 0), 2);
        // Resumed past every pattern: no match.
        assert_eq!(strategy.select(table, classes, *double, 3), 3);
    }

    #[test]
    fn linear_selects_first_match_at_or_after_start() {
        let f = fixture();
        run(&Strategy::linear(), &f);
    }

    #[test]
    fn chain_selects_first_match_at_or_after_start() {
        let f = fixture();
        let chain = Strategy::chain(&f.1, &f.0);
        assert_eq!(chain.kind(), StrategyKind::Chain);
        run(&chain, &f);
    }

    #[test]
    fn empty_table_answers_zero_for_any_class() {
        let classes = Arc::new(ClassTable::new());
        let object = classes.register("Object", &[]).unwrap();
        let table = PatternTable::build(&classes, &[]).unwrap();
        assert_eq!(Strategy::linear().select(&table, &classes, object, 0), 0);
        assert_eq!(
            Strategy::chain(&table, &classes).select(&table, &classes, object, 0),
            0
        );
    }
}
