//! Property-based tests for strategy equivalence.
//!
//! These tests use proptest to generate random class hierarchies, pattern
//! tables, values, and start indices, and verify:
//! 1. Equivalence: the linear scan and the decision chain answer the same
//!    result for every input, for every adaptive threshold
//! 2. The answer agrees with a naive reference scan
//! 3. The null, no-match, and monotonic-resumption contracts

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests can panic"
)]
#![allow(
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use mira_classes::{ClassId, ClassTable};
use mira_switch::{Dispatcher, LinkConfig, MatchResult, SwitchPolicy};
use proptest::prelude::*;
use std::sync::Arc;

/// Register a hierarchy from parent picks: class `i + 1` subtypes one of
/// the classes registered before it (class 0 is the root).
fn build_classes(parents: &[usize]) -> (Arc<ClassTable>, Vec<ClassId>) {
    let classes = Arc::new(ClassTable::new());
    let mut ids = vec![classes.register("C0", &[]).unwrap()];
    for (i, &pick) in parents.iter().enumerate() {
        let parent = ids[pick % ids.len()];
        let id = classes.register(&format!("C{}", i + 1), &[parent]).unwrap();
        ids.push(id);
    }
    (classes, ids)
}

/// Map raw picks onto distinct classes, keeping first-occurrence order
/// (duplicates are a link-time error by contract).
fn pick_patterns(ids: &[ClassId], picks: &[usize]) -> Vec<ClassId> {
    let mut patterns = Vec::new();
    for &pick in picks {
        let class = ids[pick % ids.len()];
        if !patterns.contains(&class) {
            patterns.push(class);
        }
    }
    patterns
}

/// Naive reference scan: the semantics both strategies must reproduce.
fn reference_select(
    classes: &ClassTable,
    patterns: &[ClassId],
    value: Option<ClassId>,
    start_index: u32,
) -> MatchResult {
    let Some(value_class) = value else {
        return -1;
    };
    for (i, &pattern) in patterns.iter().enumerate().skip(start_index as usize) {
        if classes.is_assignable(pattern, value_class) {
            return i as i32;
        }
    }
    patterns.len() as i32
}

proptest! {
    #[test]
    fn linear_and_chain_agree_with_the_reference_scan(
        parents in prop::collection::vec(0usize..64, 0..10),
        picks in prop::collection::vec(0usize..64, 0..9),
        value_pick in prop::option::of(0usize..64),
        start_pick in 0usize..64,
    ) {
        let (classes, ids) = build_classes(&parents);
        let patterns = pick_patterns(&ids, &picks);
        let value = value_pick.map(|v| ids[v % ids.len()]);
        let start_index = (start_pick % (patterns.len() + 1)) as u32;

        let linear = Dispatcher::link(
            Arc::clone(&classes),
            &patterns,
            LinkConfig::new(SwitchPolicy::PreferLinear),
        ).unwrap();
        let chain = Dispatcher::link(
            Arc::clone(&classes),
            &patterns,
            LinkConfig::new(SwitchPolicy::PreferChain),
        ).unwrap();

        let expected = reference_select(&classes, &patterns, value, start_index);
        prop_assert_eq!(linear.select(value, start_index).unwrap(), expected);
        prop_assert_eq!(chain.select(value, start_index).unwrap(), expected);
    }

    #[test]
    fn equivalence_holds_for_every_adaptive_threshold(
        parents in prop::collection::vec(0usize..64, 0..8),
        picks in prop::collection::vec(0usize..64, 0..9),
        value_pick in prop::option::of(0usize..64),
        threshold in 0usize..12,
    ) {
        let (classes, ids) = build_classes(&parents);
        let patterns = pick_patterns(&ids, &picks);
        let value = value_pick.map(|v| ids[v % ids.len()]);

        let adaptive = Dispatcher::link(
            Arc::clone(&classes),
            &patterns,
            LinkConfig::adaptive(threshold),
        ).unwrap();

        for start_index in 0..=patterns.len() as u32 {
            let expected = reference_select(&classes, &patterns, value, start_index);
            prop_assert_eq!(adaptive.select(value, start_index).unwrap(), expected);
        }
    }

    #[test]
    fn absent_value_answers_minus_one_at_every_start_index(
        parents in prop::collection::vec(0usize..64, 0..8),
        picks in prop::collection::vec(0usize..64, 0..9),
    ) {
        let (classes, ids) = build_classes(&parents);
        let patterns = pick_patterns(&ids, &picks);

        for policy in [SwitchPolicy::PreferLinear, SwitchPolicy::PreferChain] {
            let dispatcher = Dispatcher::link(
                Arc::clone(&classes),
                &patterns,
                LinkConfig::new(policy),
            ).unwrap();
            for start_index in 0..=patterns.len() as u32 {
                prop_assert_eq!(dispatcher.select(None, start_index).unwrap(), -1);
            }
        }
    }

    #[test]
    fn resumption_is_strictly_monotonic(
        parents in prop::collection::vec(0usize..64, 0..10),
        picks in prop::collection::vec(0usize..64, 1..9),
        value_pick in 0usize..64,
    ) {
        let (classes, ids) = build_classes(&parents);
        let patterns = pick_patterns(&ids, &picks);
        let value = Some(ids[value_pick % ids.len()]);
        let len = patterns.len() as i32;

        for policy in [SwitchPolicy::PreferLinear, SwitchPolicy::PreferChain] {
            let dispatcher = Dispatcher::link(
                Arc::clone(&classes),
                &patterns,
                LinkConfig::new(policy),
            ).unwrap();

            // Exhaust the rounds a guarded-pattern caller would run.
            let mut previous = dispatcher.select(value, 0).unwrap();
            while previous < len {
                let next = dispatcher.select(value, (previous + 1) as u32).unwrap();
                prop_assert!(next > previous);
                prop_assert!(next <= len);
                previous = next;
            }
        }
    }
}
