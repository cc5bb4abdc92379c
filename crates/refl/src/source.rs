//! Metadata sources
//!
//! A [`Source<T>`] holds whatever a declaration knows about `T`, one
//! optional value per facet. A type has at most two sources:
//!
//! 1. The **embedded** source, written next to the type through the
//!    [`Reflect`] trait (usually by `#[derive(Reflect)]`).
//! 2. The **external** source, registered out of band with
//!    [`register_external`](crate::register_external) for types that
//!    cannot be modified, such as foreign or standard library types.
//!
//! Facets are merged independently: for each facet the embedded value
//! wins, the external value fills in, and anything neither declares
//! reports its neutral default.

use std::any::Any;

use crate::attr::AttrSet;
use crate::error::{ReflError, Result};
use crate::groups::AttrGroup;
use crate::info::TypeKey;
use crate::member::Member;

/// In-type metadata declaration
///
/// Implemented by `#[derive(Reflect)]`, or by hand:
///
/// ```
/// use refl::{field, FieldAttrs, Optional, Reflect, Source};
///
/// struct Pos {
///     x: f32,
///     y: f32,
/// }
///
/// impl Reflect for Pos {
///     fn embedded_source() -> Source<Self> {
///         Source::new()
///             .name("Pos")
///             .decl(FieldAttrs::new(), [field!(Pos, x)])
///             .decl(FieldAttrs::new().with::<Optional>(), [field!(Pos, y)])
///     }
/// }
///
/// refl::register::<Pos>().unwrap();
/// assert_eq!(refl::member_index::<Pos>("y"), Some(1));
/// assert!(refl::member_has_attr::<Pos, Optional>(1));
/// ```
pub trait Reflect: Sized + 'static {
    /// Metadata declared by the type itself.
    ///
    /// Runs once, when `Self` is first resolved. It may query other types
    /// but not `Self`.
    fn embedded_source() -> Source<Self>;
}

/// Per-facet metadata for `T`, built with chained setters
pub struct Source<T> {
    name: Option<&'static str>,
    class_attrs: Option<AttrSet>,
    bases: Option<Vec<TypeKey>>,
    virtual_bases: Option<Vec<TypeKey>>,
    members: Option<Vec<Member<T>>>,
    groups: Option<Vec<AttrGroup>>,
    track_names: bool,
}

impl<T: 'static> Default for Source<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Source<T> {
    /// Create a source that declares nothing
    pub fn new() -> Self {
        Self {
            name: None,
            class_attrs: None,
            bases: None,
            virtual_bases: None,
            members: None,
            groups: None,
            track_names: true,
        }
    }

    /// Declare the class name
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Declare the class attributes
    pub fn class_attrs(mut self, attrs: impl Into<AttrSet>) -> Self {
        self.class_attrs = Some(attrs.into());
        self
    }

    /// Append a direct non-virtual base
    pub fn base<B: 'static>(self) -> Self {
        self.base_key(TypeKey::of::<B>())
    }

    /// Append a direct non-virtual base by key
    pub fn base_key(mut self, key: TypeKey) -> Self {
        self.bases.get_or_insert_with(Vec::new).push(key);
        self
    }

    /// Append a direct virtual base
    pub fn virtual_base<B: 'static>(self) -> Self {
        self.virtual_base_key(TypeKey::of::<B>())
    }

    /// Append a direct virtual base by key
    pub fn virtual_base_key(mut self, key: TypeKey) -> Self {
        self.virtual_bases.get_or_insert_with(Vec::new).push(key);
        self
    }

    /// Declare that the type has no bases of either kind
    pub fn no_bases(mut self) -> Self {
        self.bases.get_or_insert_with(Vec::new);
        self.virtual_bases.get_or_insert_with(Vec::new);
        self
    }

    /// Declare one group of members sharing `attrs`.
    ///
    /// Groups are laid out in call order; calling `decl` with no members
    /// still declares the member facets (an empty struct).
    pub fn decl<I>(mut self, attrs: impl Into<AttrSet>, members: I) -> Self
    where
        I: IntoIterator<Item = Member<T>>,
    {
        let list = self.members.get_or_insert_with(Vec::new);
        let before = list.len();
        list.extend(members);
        let len = list.len() - before;
        self.groups
            .get_or_insert_with(Vec::new)
            .push(AttrGroup::new(len, attrs));
        self
    }

    /// Replace the member attribute groups.
    ///
    /// Lets an external source describe attributes of members declared
    /// elsewhere.
    pub fn member_groups(mut self, groups: Vec<AttrGroup>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Do not record member names, even where members carry them
    pub fn without_member_names(mut self) -> Self {
        self.track_names = false;
        self
    }

    pub(crate) fn erase(self) -> Result<ErasedSource> {
        let key = TypeKey::of::<T>();

        let (members, names) = match self.members {
            Some(members) => {
                let names: Option<Vec<&'static str>> = if self.track_names {
                    members.iter().map(Member::name).collect()
                } else {
                    None
                };
                if self.track_names && names.is_none() {
                    tracing::debug!(
                        type_name = key.type_name(),
                        "some members are unnamed, member names not tracked"
                    );
                }
                (Some(ErasedMembers::new(members)), names)
            }
            None => (None, None),
        };

        if let (Some(groups), Some(members)) = (&self.groups, &members) {
            let grouped: usize = groups.iter().map(|group| group.len).sum();
            if grouped != members.count {
                return Err(ReflError::GroupSizeMismatch {
                    type_name: key.type_name(),
                    grouped,
                    members: members.count,
                });
            }
        }

        Ok(ErasedSource {
            key,
            name: self.name,
            class_attrs: self.class_attrs,
            bases: self.bases,
            virtual_bases: self.virtual_bases,
            members,
            groups: self.groups,
            names,
        })
    }
}

/// Member accessors with the object type erased
pub(crate) struct ErasedMembers {
    pub count: usize,
    pub field_types: Box<[TypeKey]>,
    /// `Vec<Member<T>>` for the owning type
    pub table: Box<dyn Any + Send + Sync>,
}

impl ErasedMembers {
    fn new<T: 'static>(members: Vec<Member<T>>) -> Self {
        Self {
            count: members.len(),
            field_types: members.iter().map(Member::field_type).collect(),
            table: Box::new(members),
        }
    }
}

/// A source with its facets detached from `T`
pub(crate) struct ErasedSource {
    pub key: TypeKey,
    pub name: Option<&'static str>,
    pub class_attrs: Option<AttrSet>,
    pub bases: Option<Vec<TypeKey>>,
    pub virtual_bases: Option<Vec<TypeKey>>,
    pub members: Option<ErasedMembers>,
    pub groups: Option<Vec<AttrGroup>>,
    pub names: Option<Vec<&'static str>>,
}

impl ErasedSource {
    pub fn empty(key: TypeKey) -> Self {
        Self {
            key,
            name: None,
            class_attrs: None,
            bases: None,
            virtual_bases: None,
            members: None,
            groups: None,
            names: None,
        }
    }
}

/// Link-time record of an embedded source, collected at registry start
///
/// `#[derive(Reflect)]` submits one per non-generic type.
#[derive(Clone, Copy)]
pub struct Embedded {
    key: fn() -> TypeKey,
    source: fn() -> Result<ErasedSource>,
}

fn erase_embedded<T: Reflect>() -> Result<ErasedSource> {
    T::embedded_source().erase()
}

impl Embedded {
    /// Record for the embedded source of `T`
    pub const fn new<T: Reflect>() -> Self {
        Self {
            key: TypeKey::of::<T>,
            source: erase_embedded::<T>,
        }
    }

    pub(crate) fn key(&self) -> TypeKey {
        (self.key)()
    }

    pub(crate) fn source(&self) -> Result<ErasedSource> {
        (self.source)()
    }
}

inventory::collect!(Embedded);
