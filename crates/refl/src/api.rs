//! Per-type queries
//!
//! Thin generic wrappers over [`type_info`], for call sites that name the
//! reflected type statically. All of them panic on a configuration error
//! of `T`; use [`try_type_info`](crate::try_type_info) and the `try_`
//! methods of [`TypeInfo`] to handle those instead.

use crate::attr::{AttrSet, Attribute};
use crate::info::TypeInfo;
use crate::member::Member;
use crate::registry::type_info;

/// Reflected class name of `T`, if declared
pub fn name<T: 'static>() -> Option<&'static str> {
    type_info::<T>().name()
}

/// Class attributes of `T`
pub fn class_attrs<T: 'static>() -> &'static AttrSet {
    type_info::<T>().class_attrs()
}

/// Check if `T` carries the class attribute `A`
pub fn class_has_attr<T: 'static, A: Attribute>() -> bool {
    type_info::<T>().has_class_attr::<A>()
}

/// Direct non-virtual bases of `T`
pub fn bases<T: 'static>() -> &'static [&'static TypeInfo] {
    type_info::<T>().bases()
}

/// Direct virtual bases of `T`
pub fn direct_virtual_bases<T: 'static>() -> &'static [&'static TypeInfo] {
    type_info::<T>().direct_virtual_bases()
}

/// All virtual bases of `T`, each once
pub fn virtual_bases<T: 'static>() -> &'static [&'static TypeInfo] {
    type_info::<T>().virtual_bases()
}

/// Direct bases of `T` followed by all of its virtual bases
pub fn combined_bases<T: 'static>() -> &'static [&'static TypeInfo] {
    type_info::<T>().combined_bases()
}

/// Number of members of `T`
pub fn member_count<T: 'static>() -> usize {
    type_info::<T>().member_count()
}

/// Check if member accessors of `T` are declared
pub fn members_known<T: 'static>() -> bool {
    type_info::<T>().members_known()
}

/// Check if member names of `T` are tracked
pub fn member_names_known<T: 'static>() -> bool {
    type_info::<T>().member_names_known()
}

/// Accessor of the member at `index`, or `None` out of range
pub fn get_member<T: 'static>(index: usize) -> Option<&'static Member<T>> {
    type_info::<T>().members::<T>()?.get(index)
}

/// Accessor of the member at `index`.
///
/// # Panics
///
/// Panics if `index` is out of range or the members of `T` are not
/// declared.
pub fn member<T: 'static>(index: usize) -> &'static Member<T> {
    match get_member::<T>(index) {
        Some(member) => member,
        None => panic!(
            "Member index {index} out of range for reflected type {} with {} members",
            std::any::type_name::<T>(),
            member_count::<T>()
        ),
    }
}

/// Attributes of the member at `index`; empty out of range
pub fn member_attrs<T: 'static>(index: usize) -> &'static AttrSet {
    type_info::<T>().member_attrs(index)
}

/// Check if the member at `index` carries the attribute `A`
pub fn member_has_attr<T: 'static, A: Attribute>(index: usize) -> bool {
    type_info::<T>().has_member_attr::<A>(index)
}

/// Name of the member at `index`
pub fn member_name<T: 'static>(index: usize) -> Option<&'static str> {
    type_info::<T>().member_name(index)
}

/// Position of the member named `name`
pub fn member_index<T: 'static>(name: &str) -> Option<usize> {
    type_info::<T>().member_index(name)
}

/// Position of the direct base named `name`
pub fn base_index<T: 'static>(name: &str) -> Option<usize> {
    type_info::<T>().base_index(name)
}

/// Position of the virtual base named `name`
pub fn virtual_base_index<T: 'static>(name: &str) -> Option<usize> {
    type_info::<T>().virtual_base_index(name)
}

/// Position of the base named `name` among the combined bases
pub fn combined_base_index<T: 'static>(name: &str) -> Option<usize> {
    type_info::<T>().combined_base_index(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{FieldAttrs, Optional};
    use crate::field;
    use crate::registry::register_external;
    use crate::source::Source;

    struct Sample {
        left: i64,
        right: i64,
    }

    fn register_sample() {
        // Several tests share the registration; only the first one wins.
        let _ = register_external(
            Source::<Sample>::new()
                .name("Sample")
                .decl(FieldAttrs::new(), [field!(Sample, left)])
                .decl(FieldAttrs::new().with::<Optional>(), [field!(Sample, right)]),
        );
    }

    #[test]
    fn test_member_queries() {
        register_sample();

        assert_eq!(name::<Sample>(), Some("Sample"));
        assert_eq!(member_count::<Sample>(), 2);
        assert!(members_known::<Sample>());
        assert!(member_names_known::<Sample>());
        assert_eq!(member_name::<Sample>(0), Some("left"));
        assert_eq!(member_name::<Sample>(2), None);
        assert!(member_has_attr::<Sample, Optional>(1));
        assert!(!member_has_attr::<Sample, Optional>(0));
        assert!(member_attrs::<Sample>(7).is_empty());
    }

    #[test]
    fn test_member_access() {
        register_sample();

        let mut sample = Sample { left: 1, right: 2 };
        *member::<Sample>(1).get_mut_as::<i64>(&mut sample).unwrap() = 20;
        assert_eq!(sample.right, 20);
        assert_eq!(member::<Sample>(0).get_as::<i64>(&sample), Some(&1));
        assert!(get_member::<Sample>(2).is_none());
        assert_eq!(sample.left, 1);
    }

    #[test]
    #[should_panic(expected = "Member index 5 out of range")]
    fn test_member_out_of_range() {
        register_sample();
        member::<Sample>(5);
    }

    #[test]
    fn test_neutral_defaults() {
        struct Bare;

        assert_eq!(name::<Bare>(), None);
        assert!(class_attrs::<Bare>().is_empty());
        assert!(bases::<Bare>().is_empty());
        assert!(virtual_bases::<Bare>().is_empty());
        assert!(combined_bases::<Bare>().is_empty());
        assert!(!members_known::<Bare>());
        assert_eq!(member_index::<Bare>("x"), None);
        assert_eq!(base_index::<Bare>("x"), None);
        assert_eq!(combined_base_index::<Bare>("x"), None);
    }
}
