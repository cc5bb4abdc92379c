//! Refl Static Reflection
//!
//! Structural metadata for user types: class name, class attributes,
//! direct and virtual bases, and members with their names and attributes.
//!
//! Metadata comes from up to two sources per type, an embedded one
//! written next to the type (`#[derive(Reflect)]` or a hand-written
//! [`Reflect`] impl) and an external one registered with
//! [`register_external`]. They are merged facet by facet the first time the
//! type is queried, and the resulting [`TypeInfo`] is shared for the rest
//! of the process.
//!
//! ```
//! use refl::{field, ClassAttrs, FieldAttrs, Optional, Source};
//!
//! struct Span {
//!     start: usize,
//!     end: usize,
//! }
//!
//! refl::register_external(
//!     Source::<Span>::new()
//!         .name("Span")
//!         .class_attrs(ClassAttrs::new().with::<Optional>())
//!         .decl(FieldAttrs::new(), [field!(Span, start), field!(Span, end)]),
//! )
//! .unwrap();
//!
//! let info = refl::type_info::<Span>();
//! assert_eq!(info.name(), Some("Span"));
//! assert_eq!(info.member_index("end"), Some(1));
//! assert!(refl::class_has_attr::<Span, Optional>());
//! ```

pub mod api;
pub mod attr;
pub mod config;
pub mod error;
pub mod groups;
pub mod hierarchy;
pub mod index;
pub mod info;
pub mod member;
pub mod registry;
pub mod source;

pub use api::*;
pub use attr::{
    AttrSet, AttrTag, Attribute, ClassAttribute, ClassAttrs, FieldAttribute, FieldAttrs, Optional,
};
pub use config::RegistryConfig;
pub use error::{ReflError, Result};
pub use groups::{AttrGroup, MemberGroups};
pub use index::{NameFacet, NameIndex};
pub use info::{TypeInfo, TypeKey};
pub use member::Member;
pub use registry::{
    config, configure, dynamic_type_info, register, register_external, registered_types,
    subtypes_of, try_type_info, try_type_info_by_key, type_info, type_info_by_key,
};
pub use source::{Embedded, Reflect, Source};

#[cfg(feature = "derive")]
pub use refl_derive::Reflect;

#[doc(hidden)]
pub use inventory;
