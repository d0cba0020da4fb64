//! Strategy-selection policy and link-time configuration.
//!
//! Configuration is an explicit value passed into linking, never ambient
//! state read inside the selector. The one sanctioned environment read is
//! `LinkConfig::process_default`, which parses `MIRA_TYPE_SWITCH_STRATEGY`
//! on first call and caches the result for the life of the process.
//! Changing the environment afterwards has no effect, and already-linked
//! call sites are never affected by any configuration change.

use std::sync::OnceLock;

/// Which strategy the selector should prefer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SwitchPolicy {
    /// Always the linear scan.
    PreferLinear,
    /// Always the precomputed decision chain.
    PreferChain,
    /// Chain for small tables, linear otherwise (see
    /// [`LinkConfig::chain_threshold`]).
    #[default]
    Adaptive,
}

/// Configuration consumed by one link operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    pub policy: SwitchPolicy,
    /// Largest table size the `Adaptive` policy still builds a chain for.
    ///
    /// The default is an engineering guess, not a measured constant; both
    /// strategies answer identically for every size, so any value is
    /// correct. Tune it, don't trust it.
    pub chain_threshold: usize,
}

/// Process-wide default configuration, initialized from environment.
static PROCESS_CONFIG: OnceLock<LinkConfig> = OnceLock::new();

impl LinkConfig {
    /// Default `Adaptive` cutover table size.
    pub const DEFAULT_CHAIN_THRESHOLD: usize = 8;

    /// Create a config with the given policy and the default threshold.
    pub const fn new(policy: SwitchPolicy) -> Self {
        LinkConfig {
            policy,
            chain_threshold: Self::DEFAULT_CHAIN_THRESHOLD,
        }
    }

    /// Create an `Adaptive` config with a custom cutover size.
    pub const fn adaptive(chain_threshold: usize) -> Self {
        LinkConfig {
            policy: SwitchPolicy::Adaptive,
            chain_threshold,
        }
    }

    /// The process-wide default.
    ///
    /// Reads `MIRA_TYPE_SWITCH_STRATEGY` (`linear`, `chain`, `adaptive`,
    /// or `adaptive:<n>`) on first call, then returns the cached value.
    /// Unrecognized values fall back to the default config.
    pub fn process_default() -> Self {
        *PROCESS_CONFIG.get_or_init(|| {
            std::env::var("MIRA_TYPE_SWITCH_STRATEGY")
                .ok()
                .and_then(|s| Self::parse(&s))
                .unwrap_or_default()
        })
    }

    /// Parse a policy string. `None` for anything unrecognized.
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "linear" => Some(Self::new(SwitchPolicy::PreferLinear)),
            "chain" => Some(Self::new(SwitchPolicy::PreferChain)),
            "adaptive" => Some(Self::new(SwitchPolicy::Adaptive)),
            _ => {
                let n = s.strip_prefix("adaptive:")?;
                n.parse().ok().map(Self::adaptive)
            }
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new(SwitchPolicy::Adaptive)
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

    #[test]
    fn parse_accepts_the_three_policies() {
        assert_eq!(
            LinkConfig::parse("linear").unwrap().policy,
            SwitchPolicy::PreferLinear
        );
        assert_eq!(
            LinkConfig::parse("CHAIN").unwrap().policy,
            SwitchPolicy::PreferChain
        );
        assert_eq!(
            LinkConfig::parse(" adaptive ").unwrap().policy,
            SwitchPolicy::Adaptive
        );
    }

    #[test]
    fn parse_accepts_a_threshold_suffix() {
        let config = LinkConfig::parse("adaptive:12").unwrap();
        assert_eq!(config.policy, SwitchPolicy::Adaptive);
        assert_eq!(config.chain_threshold, 12);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(LinkConfig::parse("hybrid"), None);
        assert_eq!(LinkConfig::parse("adaptive:lots"), None);
        assert_eq!(LinkConfig::parse(""), None);
    }

    #[test]
    fn default_is_adaptive_with_default_threshold() {
        let config = LinkConfig::default();
        assert_eq!(config.policy, SwitchPolicy::Adaptive);
        assert_eq!(config.chain_threshold, LinkConfig::DEFAULT_CHAIN_THRESHOLD);
    }
}
