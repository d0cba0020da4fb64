//! Mira Switch - type-switch linkage and dispatch for the Mira runtime.
//!
//! This crate provides:
//! - `PatternTable`, the validated ordered pattern list for one call site
//! - Execution strategies (linear scan, precomputed decision chain) and the
//!   pure selector that picks between them
//! - `Dispatcher`, the callable artifact bound to one table and strategy
//! - `CallSiteCache`, the process-wide call-site -> dispatcher association
//!
//! # Contract
//!
//! A call site is linked once against an ordered list of class patterns.
//! Every dispatch answers an index in `[-1, N]` for a table of `N` patterns:
//! `-1` when the value is absent, the index of the first pattern (at or
//! after the caller's start index) the value's runtime class is assignable
//! to, or `N` when the value is present but matches nothing. Re-invoking
//! with `start_index = previous + 1` resumes matching strictly past the
//! previous answer, which is how guarded patterns re-enter the search after
//! a failed guard.
//!
//! # Strategies
//!
//! Both strategies compute the same function. The linear strategy scans the
//! table on every call; the chain strategy folds the table once, at link
//! time, into a fixed chain of guarded decision nodes. The selector picks
//! per policy (`PreferLinear`, `PreferChain`, or size-`Adaptive`).

mod call_site;
mod config;
mod dispatch;
mod errors;
mod selector;
mod strategy;
mod table;

pub use call_site::{CallSiteCache, CallSiteId, LinkRequest};
pub use config::{LinkConfig, SwitchPolicy};
pub use dispatch::{Dispatcher, MatchResult, NO_VALUE};
pub use errors::{DispatchError, LinkError};
pub use selector::choose;
pub use strategy::StrategyKind;
pub use table::{Pattern, PatternTable};
