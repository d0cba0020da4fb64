//! Pure strategy selection.

use crate::config::{LinkConfig, SwitchPolicy};
use crate::strategy::StrategyKind;

/// Choose a strategy for a table of `table_size` patterns.
///
/// A pure function of its arguments — no hidden state, so tests can pin
/// either strategy deterministically. `Adaptive` builds a chain when the
/// table is small enough that the one-time construction cost is expected to
/// be recovered by skipping per-call loop overhead, and falls back to the
/// always-correct linear scan above the cutover.
pub fn choose(table_size: usize, config: &LinkConfig) -> StrategyKind {
    match config.policy {
        SwitchPolicy::PreferLinear => StrategyKind::Linear,
        SwitchPolicy::PreferChain => StrategyKind::Chain,
        SwitchPolicy::Adaptive => {
            if table_size <= config.chain_threshold {
                StrategyKind::Chain
            } else {
                StrategyKind::Linear
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_policies_ignore_size() {
        let linear = LinkConfig::new(SwitchPolicy::PreferLinear);
        let chain = LinkConfig::new(SwitchPolicy::PreferChain);
        for size in [0, 1, 100] {
            assert_eq!(choose(size, &linear), StrategyKind::Linear);
            assert_eq!(choose(size, &chain), StrategyKind::Chain);
        }
    }

    #[test]
    fn adaptive_cuts_over_at_the_threshold() {
        let config = LinkConfig::adaptive(4);
        assert_eq!(choose(0, &config), StrategyKind::Chain);
        assert_eq!(choose(4, &config), StrategyKind::Chain);
        assert_eq!(choose(5, &config), StrategyKind::Linear);
    }
}
