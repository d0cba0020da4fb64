//! Process-wide association between call sites and their dispatchers.
//!
//! Each distinct call site is an arena-style handle (`CallSiteId`) handed
//! out by the linking collaborator. The cache grows monotonically — one
//! entry per distinct call site the process ever links — and is never
//! pruned: tables are bounded by source-level switch arms.

use crate::config::LinkConfig;
use crate::dispatch::{Dispatcher, MatchResult};
use crate::errors::{DispatchError, LinkError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mira_classes::{ClassId, ClassTable};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opaque identity of one call site.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct CallSiteId(u32);

impl CallSiteId {
    /// Create a call-site handle from a raw token.
    #[inline]
    pub const fn new(token: u32) -> Self {
        CallSiteId(token)
    }

    /// Get the raw u32 token.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Hash for CallSiteId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for CallSiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallSiteId({})", self.0)
    }
}

/// The boundary struct a compiler hands the runtime to link one call site.
///
/// `value_class` is the static class of the switched-on operand; it must be
/// a registered class (the analogue of "one reference-typed parameter" in
/// the invocation-shape check). The result is always an index, so no result
/// descriptor is carried.
#[derive(Clone, Debug)]
pub struct LinkRequest {
    pub call_site: CallSiteId,
    pub value_class: ClassId,
    pub patterns: Vec<ClassId>,
}

/// Process-wide call-site -> dispatcher cache.
///
/// Linking is the only mutating operation. A vacant entry's shard lock is
/// held across dispatcher construction, so concurrent first-time links of
/// the same identity serialize: at most one build runs and at most one
/// dispatcher is ever installed per identity. A failed link installs
/// nothing, leaving the call site unlinked.
pub struct CallSiteCache {
    classes: Arc<ClassTable>,
    sites: DashMap<CallSiteId, Arc<Dispatcher>>,
}

impl CallSiteCache {
    /// Create a cache over the given class table.
    pub fn new(classes: Arc<ClassTable>) -> Self {
        CallSiteCache {
            classes,
            sites: DashMap::new(),
        }
    }

    /// Return the cached dispatcher for `id`, linking it first if this is
    /// the first use of the call site.
    pub fn lookup_or_link(
        &self,
        id: CallSiteId,
        patterns: &[ClassId],
        config: LinkConfig,
    ) -> Result<Arc<Dispatcher>, LinkError> {
        match self.sites.entry(id) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let dispatcher = Arc::new(Dispatcher::link(
                    Arc::clone(&self.classes),
                    patterns,
                    config,
                )?);
                entry.insert(Arc::clone(&dispatcher));
                Ok(dispatcher)
            }
        }
    }

    /// Validate and link a full boundary request.
    pub fn link_request(
        &self,
        request: &LinkRequest,
        config: LinkConfig,
    ) -> Result<Arc<Dispatcher>, LinkError> {
        if !self.classes.contains(request.value_class) {
            return Err(LinkError::InvalidValueClass {
                class: request.value_class,
            });
        }
        self.lookup_or_link(request.call_site, &request.patterns, config)
    }

    /// Dispatch against an already-linked call site.
    ///
    /// The collaborator must have linked `id` first; dispatching an
    /// unlinked identity is a caller bug and fails fast.
    pub fn dispatch(
        &self,
        id: CallSiteId,
        value: Option<ClassId>,
        start_index: u32,
    ) -> Result<MatchResult, DispatchError> {
        let dispatcher = match self.sites.get(&id) {
            Some(entry) => Arc::clone(entry.value()),
            None => return Err(DispatchError::UnlinkedCallSite { call_site: id }),
        };
        dispatcher.select(value, start_index)
    }

    /// Whether `id` has been linked.
    pub fn is_linked(&self, id: CallSiteId) -> bool {
        self.sites.contains_key(&id)
    }

    /// Number of linked call sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Check if no call site has been linked yet.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
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

    fn fixture() -> (CallSiteCache, Vec<ClassId>, ClassId) {
        let classes = Arc::new(ClassTable::new());
        let object = classes.register("Object", &[]).unwrap();
        let char_seq = classes.register("CharSequence", &[object]).unwrap();
        let string = classes.register("String", &[char_seq]).unwrap();
        let cache = CallSiteCache::new(classes);
        (cache, vec![string, char_seq], string)
    }

    #[test]
    fn lookup_or_link_is_idempotent() {
        let (cache, patterns, _) = fixture();
        let id = CallSiteId::new(7);
        let first = cache
            .lookup_or_link(id, &patterns, LinkConfig::default())
            .unwrap();
        // The second call must return the identical instance, even with a
        // different pattern list: the call site is already linked.
        let second = cache
            .lookup_or_link(id, &[], LinkConfig::default())
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_link_leaves_the_site_unlinked() {
        let (cache, _, string) = fixture();
        let id = CallSiteId::new(1);
        let err = cache
            .lookup_or_link(id, &[string, string], LinkConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            LinkError::DuplicatePattern {
                class: string,
                first: 0,
                second: 1
            }
        );
        assert!(!cache.is_linked(id));
        // A corrected request then links normally.
        assert!(cache
            .lookup_or_link(id, &[string], LinkConfig::default())
            .is_ok());
        assert!(cache.is_linked(id));
    }

    #[test]
    fn dispatch_before_link_fails_fast() {
        let (cache, _, string) = fixture();
        let id = CallSiteId::new(3);
        assert_eq!(
            cache.dispatch(id, Some(string), 0).unwrap_err(),
            DispatchError::UnlinkedCallSite { call_site: id }
        );
    }

    #[test]
    fn link_request_validates_the_value_class() {
        let (cache, patterns, _) = fixture();
        let request = LinkRequest {
            call_site: CallSiteId::new(9),
            value_class: ClassId::new(88),
            patterns,
        };
        assert_eq!(
            cache.link_request(&request, LinkConfig::default()).unwrap_err(),
            LinkError::InvalidValueClass {
                class: ClassId::new(88)
            }
        );
        assert!(!cache.is_linked(request.call_site));
    }
}
