//! Mira Classes - runtime class model for the Mira runtime.
//!
//! This crate provides:
//! - `ClassId`, the interned identifier for a runtime class
//! - `ClassTable`, the append-only registration arena with an O(1)
//!   assignability (subtype) oracle
//!
//! The class table is the single source of truth for the subtype relation
//! consulted by the type-switch linkage in `mira_switch`. Registration is
//! thread-safe; lookups take a read lock only.

mod class_id;
mod table;

pub use class_id::ClassId;
pub use table::{ClassTable, RegisterError};
