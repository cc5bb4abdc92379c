//! Attribute Tags
//!
//! An attribute is a zero-sized marker type attached to a field or to a
//! whole class. Attributes carry no data; the only question asked of them
//! is "is this tag present".
//!
//! A type becomes an attribute by implementing [`Attribute`], and becomes
//! usable on fields and/or classes by implementing the capability markers
//! [`FieldAttribute`] and [`ClassAttribute`]. The attribute set builders
//! are bounded by those markers, so attaching a type that lacks the
//! matching capability is a compile error:
//!
//! ```compile_fail
//! use refl::{attribute, ClassAttrs};
//!
//! attribute!(pub struct FieldOnly: field);
//!
//! // `FieldOnly` is not a class attribute.
//! let _ = ClassAttrs::new().with::<FieldOnly>();
//! ```
//!
//! ```compile_fail
//! use refl::FieldAttrs;
//!
//! struct NotAnAttribute;
//!
//! let _ = FieldAttrs::new().with::<NotAnAttribute>();
//! ```
//!
//! Attributes may not carry data either:
//!
//! ```compile_fail
//! struct Weighted(u32);
//! impl refl::Attribute for Weighted {
//!     const NAME: &'static str = "Weighted";
//! }
//! impl refl::FieldAttribute for Weighted {}
//!
//! let _ = refl::FieldAttrs::new().with::<Weighted>();
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A zero-sized marker type usable as a reflection attribute
pub trait Attribute: Any + Send + Sync {
    /// Display name of the attribute
    const NAME: &'static str;
}

/// Capability marker: the attribute may be attached to fields
pub trait FieldAttribute: Attribute {}

/// Capability marker: the attribute may be attached to classes
pub trait ClassAttribute: Attribute {}

/// Declares a zero-sized attribute tag together with its capabilities.
///
/// Capabilities are `field`, `class`, or both.
///
/// ```
/// refl::attribute!(
///     /// Skipped by the inspector.
///     pub struct Hidden: field, class
/// );
///
/// let attrs = refl::FieldAttrs::new().with::<Hidden>().into_set();
/// assert!(attrs.contains::<Hidden>());
/// ```
#[macro_export]
macro_rules! attribute {
    (@cap $name:ident field) => {
        impl $crate::FieldAttribute for $name {}
    };
    (@cap $name:ident class) => {
        impl $crate::ClassAttribute for $name {}
    };
    ($(#[$meta:meta])* $vis:vis struct $name:ident : $($cap:ident),+ $(,)?) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Attribute for $name {
            const NAME: &'static str = stringify!($name);
        }

        $($crate::attribute!(@cap $name $cap);)+
    };
}

attribute!(
    /// Marks a field (or, as a class attribute, a base class) that may be
    /// absent from serialized input.
    pub struct Optional: field, class
);

/// Runtime identity of one attribute type
#[derive(Clone, Copy)]
pub struct AttrTag {
    id: TypeId,
    name: &'static str,
}

impl AttrTag {
    /// Tag for the attribute type `A`
    pub fn of<A: Attribute>() -> Self {
        Self {
            id: TypeId::of::<A>(),
            name: A::NAME,
        }
    }

    /// TypeId of the attribute type
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Display name of the attribute
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for AttrTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AttrTag {}

impl Hash for AttrTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AttrTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Set of attributes attached to one field group or one class
///
/// Insertion order is kept for display; equality ignores it.
#[derive(Clone, Default)]
pub struct AttrSet {
    tags: Vec<AttrTag>,
}

/// The set reported for anything that declares no attributes
pub(crate) static EMPTY_ATTRS: AttrSet = AttrSet::new();

impl AttrSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    fn insert(&mut self, tag: AttrTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Check whether the attribute `A` is present
    pub fn contains<A: Attribute>(&self) -> bool {
        self.contains_tag(AttrTag::of::<A>())
    }

    /// Check whether the given tag is present
    pub fn contains_tag(&self, tag: AttrTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Iterate over the tags in declaration order
    pub fn iter(&self) -> impl Iterator<Item = AttrTag> + '_ {
        self.tags.iter().copied()
    }

    /// Number of distinct attributes
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if no attributes are present
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl PartialEq for AttrSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.tags.iter().all(|tag| other.contains_tag(*tag))
    }
}

impl Eq for AttrSet {}

impl fmt::Debug for AttrSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags.iter()).finish()
    }
}

/// Builder for the attribute set of one field group
#[derive(Debug, Clone, Default)]
pub struct FieldAttrs(AttrSet);

impl FieldAttrs {
    /// Start an empty field attribute set
    pub const fn new() -> Self {
        Self(AttrSet::new())
    }

    /// Add the field attribute `A`
    pub fn with<A: FieldAttribute>(mut self) -> Self {
        const {
            assert!(
                std::mem::size_of::<A>() == 0,
                "attributes must be zero-sized marker types"
            )
        };
        self.0.insert(AttrTag::of::<A>());
        self
    }

    /// Finish the builder
    pub fn into_set(self) -> AttrSet {
        self.0
    }
}

impl From<FieldAttrs> for AttrSet {
    fn from(attrs: FieldAttrs) -> Self {
        attrs.0
    }
}

/// Builder for the attribute set of a class
#[derive(Debug, Clone, Default)]
pub struct ClassAttrs(AttrSet);

impl ClassAttrs {
    /// Start an empty class attribute set
    pub const fn new() -> Self {
        Self(AttrSet::new())
    }

    /// Add the class attribute `A`
    pub fn with<A: ClassAttribute>(mut self) -> Self {
        const {
            assert!(
                std::mem::size_of::<A>() == 0,
                "attributes must be zero-sized marker types"
            )
        };
        self.0.insert(AttrTag::of::<A>());
        self
    }

    /// Finish the builder
    pub fn into_set(self) -> AttrSet {
        self.0
    }
}

impl From<ClassAttrs> for AttrSet {
    fn from(attrs: ClassAttrs) -> Self {
        attrs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    attribute!(struct Hidden: field);
    attribute!(struct Abstract: class);

    #[test]
    fn test_attribute_macro_name() {
        assert_eq!(Hidden::NAME, "Hidden");
        assert_eq!(AttrTag::of::<Optional>().name(), "Optional");
    }

    #[test]
    fn test_field_attrs_dedup() {
        let set = FieldAttrs::new()
            .with::<Optional>()
            .with::<Hidden>()
            .with::<Optional>()
            .into_set();

        assert_eq!(set.len(), 2);
        assert!(set.contains::<Optional>());
        assert!(set.contains::<Hidden>());
        assert!(!set.contains::<Abstract>());
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a = FieldAttrs::new().with::<Optional>().with::<Hidden>().into_set();
        let b = FieldAttrs::new().with::<Hidden>().with::<Optional>().into_set();
        let c = FieldAttrs::new().with::<Hidden>().into_set();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_set() {
        assert!(EMPTY_ATTRS.is_empty());
        assert_eq!(EMPTY_ATTRS, AttrSet::default());
        assert_eq!(ClassAttrs::new().into_set(), AttrSet::new());
    }

    #[test]
    fn test_class_attrs() {
        let set: AttrSet = ClassAttrs::new().with::<Abstract>().with::<Optional>().into();
        let names: Vec<_> = set.iter().map(|tag| tag.name()).collect();
        assert_eq!(names, vec!["Abstract", "Optional"]);
    }
}
