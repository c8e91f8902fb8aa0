//! Per-request memo of resolved objects and collections.

use std::collections::HashMap;

/// Lookups made during one request, keyed by cache slot.
///
/// A slot holding `None` records a lookup that found nothing; it is a
/// result like any other and is not retried. The cache is owned by a
/// single [`ResourceRequest`](crate::ResourceRequest) and dropped with it.
#[derive(Debug)]
pub struct RequestCache<O> {
    objects: HashMap<String, Option<O>>,
    collections: HashMap<String, Vec<O>>,
}

impl<O> Default for RequestCache<O> {
    fn default() -> Self {
        Self {
            objects: HashMap::new(),
            collections: HashMap::new(),
        }
    }
}

impl<O> RequestCache<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_object(&self, slot: &str) -> bool {
        self.objects.contains_key(slot)
    }

    /// The cached object for `slot`; `None` if nothing was cached or the
    /// cached lookup found nothing.
    pub fn object(&self, slot: &str) -> Option<&O> {
        self.objects.get(slot).and_then(Option::as_ref)
    }

    pub fn store_object(&mut self, slot: impl Into<String>, object: Option<O>) {
        self.objects.insert(slot.into(), object);
    }

    pub fn has_collection(&self, slot: &str) -> bool {
        self.collections.contains_key(slot)
    }

    pub fn collection(&self, slot: &str) -> Option<&[O]> {
        self.collections.get(slot).map(Vec::as_slice)
    }

    pub fn store_collection(&mut self, slot: impl Into<String>, rows: Vec<O>) {
        self.collections.insert(slot.into(), rows);
    }

    /// Number of filled slots, misses included.
    pub fn len(&self) -> usize {
        self.objects.len() + self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_is_cached() {
        let mut cache: RequestCache<u32> = RequestCache::new();
        assert!(!cache.has_object("item"));

        cache.store_object("item", None);
        assert!(cache.has_object("item"));
        assert_eq!(cache.object("item"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_objects_and_collections_are_separate() {
        let mut cache = RequestCache::new();
        cache.store_object("item", Some(7));
        cache.store_collection("items", vec![1, 2, 3]);

        assert_eq!(cache.object("item"), Some(&7));
        assert_eq!(cache.collection("items"), Some(&[1, 2, 3][..]));
        assert!(!cache.has_collection("item"));
        assert_eq!(cache.len(), 2);
    }
}
