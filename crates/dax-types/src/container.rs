use std::any::Any;
use std::fmt;

/// A node in the container type hierarchy.
///
/// Container types are declared as `static` items with the
/// [`container_type!`](crate::container_type) macro. A type may list several
/// direct supertypes, which is how flat capabilities ("fused explosive",
/// "skinnable") attach to concrete kinds without an inheritance tree.
/// Equality is identity.
pub struct ContainerType {
    name: &'static str,
    supertypes: &'static [&'static ContainerType],
}

impl ContainerType {
    pub const fn new(name: &'static str, supertypes: &'static [&'static ContainerType]) -> Self {
        Self { name, supertypes }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direct supertypes, in declaration order.
    pub fn supertypes(&self) -> &'static [&'static ContainerType] {
        self.supertypes
    }

    /// Returns `true` if an instance of `other` is also an instance of
    /// `self` (reflexive).
    pub fn is_assignable_from(&self, other: &ContainerType) -> bool {
        std::ptr::eq(self, other)
            || other
                .supertypes
                .iter()
                .any(|parent| self.is_assignable_from(parent))
    }

    /// Returns `true` if `self` is a supertype of `other` and not `other`
    /// itself.
    pub fn is_proper_supertype_of(&self, other: &ContainerType) -> bool {
        !std::ptr::eq(self, other) && self.is_assignable_from(other)
    }
}

impl PartialEq for ContainerType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ContainerType {}

impl fmt::Debug for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerType({})", self.name)
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declare a `static` [`ContainerType`] with optional supertypes.
///
/// ```rust
/// use dax_types::container_type;
///
/// container_type!(pub static ANIMAL = "animal");
/// container_type!(pub static DOG = "dog": ANIMAL);
///
/// assert!(ANIMAL.is_assignable_from(&DOG));
/// assert!(!DOG.is_assignable_from(&ANIMAL));
/// ```
#[macro_export]
macro_rules! container_type {
    ($(#[$meta:meta])* $vis:vis static $name:ident = $label:literal $(: $($parent:path),+)?) => {
        $(#[$meta])*
        $vis static $name: $crate::ContainerType = $crate::ContainerType::new($label, {
            static SUPERTYPES: &[&$crate::ContainerType] = &[$($(&$parent),+)?];
            SUPERTYPES
        });
    };
}

/// Any object that may hold values under keys.
///
/// Containers only report their runtime container type and expose
/// themselves as `Any`; processors are the only place that downcasts.
pub trait DataHolder: Any {
    /// The most specific container type of this instance.
    fn container_type(&self) -> &'static ContainerType;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn DataHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataHolder({})", self.container_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    container_type!(static ENTITY = "entity");
    container_type!(static EXPLOSIVE = "explosive");
    container_type!(static FUSED = "fused_explosive": EXPLOSIVE);
    container_type!(static CREEPER = "creeper": ENTITY, FUSED);
    container_type!(static PLAYER = "player": ENTITY);

    struct Creeper;

    impl DataHolder for Creeper {
        fn container_type(&self) -> &'static ContainerType {
            &CREEPER
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn assignability_is_reflexive() {
        assert!(ENTITY.is_assignable_from(&ENTITY));
        assert!(!ENTITY.is_proper_supertype_of(&ENTITY));
    }

    #[test]
    fn assignability_follows_every_supertype() {
        assert!(ENTITY.is_assignable_from(&CREEPER));
        assert!(FUSED.is_assignable_from(&CREEPER));
        assert!(EXPLOSIVE.is_assignable_from(&CREEPER));
        assert!(!PLAYER.is_assignable_from(&CREEPER));
        assert!(!CREEPER.is_assignable_from(&ENTITY));
    }

    #[test]
    fn proper_supertype() {
        assert!(EXPLOSIVE.is_proper_supertype_of(&FUSED));
        assert!(!FUSED.is_proper_supertype_of(&EXPLOSIVE));
        assert!(!ENTITY.is_proper_supertype_of(&FUSED));
    }

    #[test]
    fn equality_is_identity() {
        container_type!(static OTHER_ENTITY = "entity");
        assert_eq!(ENTITY, ENTITY);
        assert_ne!(ENTITY, OTHER_ENTITY);
    }

    #[test]
    fn holder_reports_type_and_downcasts() {
        let creeper = Creeper;
        let holder: &dyn DataHolder = &creeper;
        assert_eq!(holder.container_type().name(), "creeper");
        assert!(holder.as_any().downcast_ref::<Creeper>().is_some());
        assert_eq!(format!("{holder:?}"), "DataHolder(creeper)");
    }
}
