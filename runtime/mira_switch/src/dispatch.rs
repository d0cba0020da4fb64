//! The callable dispatcher bound to one pattern table and one strategy.

use crate::config::LinkConfig;
use crate::errors::{DispatchError, LinkError};
use crate::selector;
use crate::strategy::{Strategy, StrategyKind};
use crate::table::PatternTable;
use mira_classes::{ClassId, ClassTable};
use std::sync::Arc;

/// Result of one dispatch: an integer in `[-1, N]` for a table of `N`
/// patterns. `-1` (`NO_VALUE`) means the value was absent; `[0, N)` is the
/// index of the first pattern matched at or after the start index; `N`
/// means present but no match.
pub type MatchResult = i32;

/// The contractual answer for an absent value. A defined result, not an
/// error.
pub const NO_VALUE: MatchResult = -1;

/// The callable artifact of linking: one pattern table, one constructed
/// strategy, the class table they consult. No per-call mutable state;
/// shared by every caller of its call site via `Arc`.
pub struct Dispatcher {
    classes: Arc<ClassTable>,
    table: PatternTable,
    strategy: Strategy,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table_len", &self.table.len())
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Link a dispatcher: build the table, choose a strategy, construct it.
    ///
    /// Any validation failure aborts the whole link; no partial dispatcher
    /// exists afterwards.
    #[tracing::instrument(level = "debug", skip_all, fields(patterns = patterns.len()))]
    pub fn link(
        classes: Arc<ClassTable>,
        patterns: &[ClassId],
        config: LinkConfig,
    ) -> Result<Self, LinkError> {
        let table = PatternTable::build(&classes, patterns)?;
        let kind = selector::choose(table.len(), &config);
        tracing::debug!(table_len = table.len(), ?kind, "linked type switch");

        let strategy = match kind {
            StrategyKind::Linear => Strategy::linear(),
            StrategyKind::Chain => Strategy::chain(&table, &classes),
        };
        Ok(Dispatcher {
            classes,
            table,
            strategy,
        })
    }

    /// Execute one match.
    ///
    /// `value` is the runtime class of the switched-on value, or `None`
    /// when the value is absent — absence answers [`NO_VALUE`] once, ahead
    /// of any strategy. `start_index` past the table size is a caller bug
    /// and fails fast; `start_index == len` is legal and answers `len`.
    pub fn select(
        &self,
        value: Option<ClassId>,
        start_index: u32,
    ) -> Result<MatchResult, DispatchError> {
        let len = self.table.len();
        if start_index as usize > len {
            return Err(DispatchError::StartIndexOutOfRange { start_index, len });
        }
        let Some(value_class) = value else {
            return Ok(NO_VALUE);
        };
        Ok(self
            .strategy
            .select(&self.table, &self.classes, value_class, start_index))
    }

    /// Which strategy this dispatcher was linked with.
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Size of the bound pattern table.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use crate::config::SwitchPolicy;
    use pretty_assertions::assert_eq;

    fn fixture() -> (Arc<ClassTable>, Vec<ClassId>, ClassId) {
        let classes = Arc::new(ClassTable::new());
        let object = classes.register("Object", &[]).unwrap();
        let char_seq = classes.register("CharSequence", &[object]).unwrap();
        let string = classes.register("String", &[char_seq]).unwrap();
        let number = classes.register("Number", &[object]).unwrap();
        (classes, vec![string, char_seq, number], string)
    }

    #[test]
    fn absent_value_answers_no_value_under_both_strategies() {
        let (classes, patterns, _) = fixture();
        for policy in [SwitchPolicy::PreferLinear, SwitchPolicy::PreferChain] {
            let dispatcher = Dispatcher::link(
                Arc::clone(&classes),
                &patterns,
                LinkConfig::new(policy),
            )
            .unwrap();
            assert_eq!(dispatcher.select(None, 0).unwrap(), NO_VALUE);
            // Absence wins at every legal start index.
            assert_eq!(dispatcher.select(None, 3).unwrap(), NO_VALUE);
        }
    }

    #[test]
    fn start_index_past_table_fails_fast() {
        let (classes, patterns, string) = fixture();
        let dispatcher =
            Dispatcher::link(classes, &patterns, LinkConfig::default()).unwrap();
        assert_eq!(
            dispatcher.select(Some(string), 4).unwrap_err(),
            DispatchError::StartIndexOutOfRange {
                start_index: 4,
                len: 3
            }
        );
        // At exactly len the scan starts past every pattern: legal, no match.
        assert_eq!(dispatcher.select(Some(string), 3).unwrap(), 3);
    }

    #[test]
    fn link_reports_the_chosen_strategy() {
        let (classes, patterns, _) = fixture();
        let linear = Dispatcher::link(
            Arc::clone(&classes),
            &patterns,
            LinkConfig::new(SwitchPolicy::PreferLinear),
        )
        .unwrap();
        assert_eq!(linear.strategy_kind(), StrategyKind::Linear);

        // Three patterns sit under the default adaptive threshold.
        let adaptive =
            Dispatcher::link(Arc::clone(&classes), &patterns, LinkConfig::default()).unwrap();
        assert_eq!(adaptive.strategy_kind(), StrategyKind::Chain);

        let tight = Dispatcher::link(classes, &patterns, LinkConfig::adaptive(2)).unwrap();
        assert_eq!(tight.strategy_kind(), StrategyKind::Linear);
    }

    #[test]
    fn failed_link_produces_no_dispatcher() {
        let (classes, _, string) = fixture();
        let err =
            Dispatcher::link(classes, &[string, string], LinkConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LinkError::DuplicatePattern {
                class: string,
                first: 0,
                second: 1
            }
        );
    }
}
