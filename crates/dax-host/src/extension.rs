use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Type-keyed side-table of extension state.
///
/// Holds at most one value per type. Host objects own one of these so
/// processors can attach state without the host type knowing about it.
#[derive(Default)]
pub struct ExtensionMap {
    inner: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ExtensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`, returning the previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.inner
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.inner.get(&TypeId::of::<T>())?.downcast_ref()
    }

    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.inner.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.inner
            .remove(&TypeId::of::<T>())
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.inner.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for ExtensionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionMap")
            .field("entries", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    #[test]
    fn one_value_per_type() {
        let mut map = ExtensionMap::new();
        assert_eq!(map.insert(Counter(1)), None);
        assert_eq!(map.insert(Label("a")), None);
        assert_eq!(map.insert(Counter(2)), Some(Counter(1)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get::<Counter>(), Some(&Counter(2)));
    }

    #[test]
    fn mutate_and_remove() {
        let mut map = ExtensionMap::new();
        map.insert(Counter(0));
        if let Some(counter) = map.get_mut::<Counter>() {
            counter.0 += 5;
        }
        assert_eq!(map.remove::<Counter>(), Some(Counter(5)));
        assert!(!map.contains::<Counter>());
        assert!(map.is_empty());
        assert_eq!(map.get::<Label>(), None);
    }
}
