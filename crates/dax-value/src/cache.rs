use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use dax_types::{DataType, Key};
use tracing::trace;

use crate::value::ImmutableValue;

/// Default number of canonical instances kept per key.
pub const DEFAULT_CAPACITY_PER_KEY: usize = 16;

/// Hit/miss counters for an [`ImmutableValueCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Canonical instances currently held.
    pub entries: usize,
}

/// Canonical instances of immutable values.
///
/// Values are bucketed per key and matched on the exact (default, actual)
/// pair. Only `Eq` value types are cacheable, which keeps floating point
/// values out. Once a key's bucket is full, further triples are built fresh
/// and not retained, so memory stays bounded by `capacity_per_key` times the
/// number of keys.
pub struct ImmutableValueCache {
    capacity_per_key: usize,
    buckets: RwLock<HashMap<usize, Vec<Box<dyn Any + Send + Sync>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ImmutableValueCache {
    pub fn new(capacity_per_key: usize) -> Self {
        Self {
            capacity_per_key,
            buckets: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity_per_key(&self) -> usize {
        self.capacity_per_key
    }

    /// Return the canonical instance for (key, default, actual), creating it
    /// on first use.
    pub fn cached_of<V: DataType + Eq>(&self, key: Key<V>, default: V, actual: V) -> ImmutableValue<V> {
        let slot = bucket_id(key);

        {
            let buckets = self.buckets.read().expect("value cache lock poisoned");
            if let Some(found) = buckets
                .get(&slot)
                .and_then(|bucket| find(bucket, &default, &actual))
            {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return found;
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut buckets = self.buckets.write().expect("value cache lock poisoned");
        let bucket = buckets.entry(slot).or_default();
        // Another thread may have inserted it between the two locks.
        if let Some(found) = find(bucket, &default, &actual) {
            return found;
        }

        let value = ImmutableValue::new(key, default, actual);
        if bucket.len() < self.capacity_per_key {
            bucket.push(Box::new(value.clone()));
        } else {
            trace!(key = %key, "value cache bucket full, not retaining");
        }
        value
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .buckets
            .read()
            .expect("value cache lock poisoned")
            .values()
            .map(Vec::len)
            .sum();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }

    /// Drop every canonical instance. Values already handed out stay valid.
    pub fn clear(&self) {
        self.buckets
            .write()
            .expect("value cache lock poisoned")
            .clear();
    }
}

impl Default for ImmutableValueCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_PER_KEY)
    }
}

impl std::fmt::Debug for ImmutableValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmutableValueCache")
            .field("capacity_per_key", &self.capacity_per_key)
            .field("stats", &self.stats())
            .finish()
    }
}

fn bucket_id<V>(key: Key<V>) -> usize {
    key.def() as *const _ as usize
}

fn find<V: DataType + Eq>(
    bucket: &[Box<dyn Any + Send + Sync>],
    default: &V,
    actual: &V,
) -> Option<ImmutableValue<V>> {
    bucket
        .iter()
        .filter_map(|entry| entry.downcast_ref::<ImmutableValue<V>>())
        .find(|cached| cached.default() == default && cached.get() == actual)
        .cloned()
}
