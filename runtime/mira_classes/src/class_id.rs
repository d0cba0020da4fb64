//! Interned class identifier.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Interned identifier for a runtime class.
///
/// # Design
/// - 4 bytes, O(1) equality compare
/// - Index into the `ClassTable` arena
/// - `INVALID` is the sentinel for an unresolved class descriptor; the
///   compiler may emit it for a pattern it could not resolve, and linking
///   rejects it
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ClassId(u32);

impl ClassId {
    /// Invalid class ID (sentinel for an absent/unresolved descriptor).
    pub const INVALID: ClassId = ClassId(u32::MAX);

    /// Create a new `ClassId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ClassId(index)
    }

    /// Get the index into the class table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a valid ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Hash for ClassId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ClassId({})", self.0)
        } else {
            write!(f, "ClassId::INVALID")
        }
    }
}

impl Default for ClassId {
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_is_not_valid() {
        assert!(!ClassId::INVALID.is_valid());
        assert!(ClassId::new(0).is_valid());
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(ClassId::default(), ClassId::INVALID);
    }

    #[test]
    fn debug_formatting() {
        assert_eq!(format!("{:?}", ClassId::new(3)), "ClassId(3)");
        assert_eq!(format!("{:?}", ClassId::INVALID), "ClassId::INVALID");
    }
}
