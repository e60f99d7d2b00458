use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Serialize, Serializer};

use crate::data::{DataType, DataValue, ValueKind};
use crate::error::TypeError;

// ---------------------------------------------------------------------------
// KeyDef
// ---------------------------------------------------------------------------

/// Static definition of a logical value.
///
/// Key definitions are declared once as `static` items (or leaked at startup
/// with [`KeyDef::leak`]) and live for the whole process. Two definitions are
/// the same key only if they are the same object; the string id exists so
/// that persisted or scripted references can find the key again.
#[derive(Debug)]
pub struct KeyDef {
    id: &'static str,
    name: &'static str,
    kind: ValueKind,
}

impl KeyDef {
    /// Define a key. Use in `static` position.
    pub const fn new(id: &'static str, name: &'static str, kind: ValueKind) -> Self {
        Self { id, name, kind }
    }

    /// Define a key at runtime with a process-lifetime allocation.
    ///
    /// Intended for extensions that register keys after startup. Every call
    /// allocates a new, distinct key.
    pub fn leak(id: impl Into<String>, name: impl Into<String>, kind: ValueKind) -> &'static KeyDef {
        let id: &'static str = Box::leak(id.into().into_boxed_str());
        let name: &'static str = Box::leak(name.into().into_boxed_str());
        Box::leak(Box::new(Self { id, name, kind }))
    }

    /// Stable identifier, `namespace:path`.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Identity comparison.
    pub fn same(a: &KeyDef, b: &KeyDef) -> bool {
        std::ptr::eq(a, b)
    }
}

impl fmt::Display for KeyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// Check that `id` has the `namespace:path` shape.
pub fn validate_id(id: &str) -> Result<(), TypeError> {
    let Some((namespace, path)) = id.split_once(':') else {
        return Err(TypeError::InvalidKeyId(id.to_string()));
    };
    let valid_chars = |s: &str| {
        s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_./-".contains(c))
    };
    if namespace.is_empty()
        || path.is_empty()
        || path.contains(':')
        || !valid_chars(namespace)
        || !valid_chars(path)
    {
        return Err(TypeError::InvalidKeyId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Key<V>
// ---------------------------------------------------------------------------

/// Typed handle to a [`KeyDef`].
///
/// `Key` is `Copy` and compares by identity of the underlying definition,
/// never by id string.
pub struct Key<V> {
    def: &'static KeyDef,
    _marker: PhantomData<fn() -> V>,
}

impl<V> Key<V> {
    /// Create a typed handle. The caller asserts that `V` matches the
    /// definition's kind; use [`Key::checked`] when that is not statically
    /// known.
    pub const fn new(def: &'static KeyDef) -> Self {
        Self {
            def,
            _marker: PhantomData,
        }
    }

    pub fn def(&self) -> &'static KeyDef {
        self.def
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    /// The same key viewed through the erased value model.
    pub fn erase(&self) -> Key<DataValue> {
        Key::new(self.def)
    }
}

impl<V: DataType> Key<V> {
    /// Create a typed handle, verifying that `V` fits the definition's kind.
    pub fn checked(def: &'static KeyDef) -> Result<Self, TypeError> {
        if def.kind.accepts(V::kind()) || V::kind() == ValueKind::Dynamic {
            Ok(Self::new(def))
        } else {
            Err(TypeError::KindMismatch {
                key: def.id.to_string(),
                expected: V::kind(),
                actual: def.kind,
            })
        }
    }
}

impl<V> Clone for Key<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Key<V> {}

impl<V> PartialEq for Key<V> {
    fn eq(&self, other: &Self) -> bool {
        KeyDef::same(self.def, other.def)
    }
}

impl<V> Eq for Key<V> {}

impl<V> Hash for Key<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.def, state);
    }
}

impl<V> fmt::Debug for Key<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.def.id)
    }
}

impl<V> fmt::Display for Key<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def.id)
    }
}

impl<V> Serialize for Key<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.def.id)
    }
}

// ---------------------------------------------------------------------------
// KeyRegistry
// ---------------------------------------------------------------------------

/// Table of known keys, addressable by stable id.
///
/// Populated during startup. Registration order is preserved and drives bulk
/// enumeration order.
#[derive(Default)]
pub struct KeyRegistry {
    by_id: HashMap<&'static str, &'static KeyDef>,
    order: Vec<&'static KeyDef>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key definition.
    ///
    /// Returns `Ok(true)` if the key was added, `Ok(false)` if this exact
    /// definition was already present. A different definition with the same
    /// id is rejected.
    pub fn register(&mut self, def: &'static KeyDef) -> Result<bool, TypeError> {
        validate_id(def.id)?;
        if let Some(existing) = self.by_id.get(def.id) {
            if KeyDef::same(existing, def) {
                return Ok(false);
            }
            return Err(TypeError::DuplicateKey(def.id.to_string()));
        }
        self.by_id.insert(def.id, def);
        self.order.push(def);
        Ok(true)
    }

    /// Look up a key definition by id.
    pub fn get(&self, id: &str) -> Option<&'static KeyDef> {
        self.by_id.get(id).copied()
    }

    /// Look up a key by id and return a typed handle.
    pub fn typed<V: DataType>(&self, id: &str) -> Result<Key<V>, TypeError> {
        let def = self
            .get(id)
            .ok_or_else(|| TypeError::UnknownKey(id.to_string()))?;
        Key::checked(def)
    }

    pub fn contains(&self, def: &KeyDef) -> bool {
        self.by_id
            .get(def.id)
            .is_some_and(|existing| KeyDef::same(existing, def))
    }

    /// All keys in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static KeyDef> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Debug for KeyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRegistry")
            .field("key_count", &self.order.len())
            .finish()
    }
}
