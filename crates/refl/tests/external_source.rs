//! Reflecting types through externally registered sources

use std::ops::Range;

use refl::{field, AttrGroup, ClassAttrs, FieldAttrs, Optional, ReflError, Reflect, Source, TypeKey};

refl::attribute!(pub struct Inclusive: field, class);

#[derive(Reflect)]
struct Shape {
    #[refl(attrs(Optional))]
    sides: u32,
}

#[test]
fn test_foreign_type_with_external_source() {
    refl::register_external(
        Source::<Range<u32>>::new()
            .name("Range")
            .class_attrs(ClassAttrs::new().with::<Inclusive>())
            .decl(FieldAttrs::new(), [field!(Range<u32>, start)])
            .decl(FieldAttrs::new().with::<Optional>(), [field!(Range<u32>, end)]),
    )
    .unwrap();

    let mut range = 2..5u32;
    assert_eq!(refl::name::<Range<u32>>(), Some("Range"));
    assert!(refl::class_has_attr::<Range<u32>, Inclusive>());
    assert!(refl::member_has_attr::<Range<u32>, Optional>(1));
    assert_eq!(refl::member_index::<Range<u32>>("end"), Some(1));

    *refl::member::<Range<u32>>(1).get_mut_as::<u32>(&mut range).unwrap() = 9;
    assert_eq!(range, 2..9);
}

#[test]
fn test_tuple_type_with_unnamed_members() {
    refl::register_external(
        Source::<(f32, f32)>::new()
            .decl(FieldAttrs::new(), [field!((f32, f32), 0), field!((f32, f32), 1)])
            .without_member_names(),
    )
    .unwrap();

    let point = (1.5f32, -2.0f32);
    assert_eq!(refl::name::<(f32, f32)>(), None);
    assert_eq!(refl::member_count::<(f32, f32)>(), 2);
    assert!(!refl::member_names_known::<(f32, f32)>());
    assert_eq!(refl::member_index::<(f32, f32)>("0"), None);
    assert_eq!(refl::member::<(f32, f32)>(1).get_as::<f32>(&point), Some(&-2.0));
}

#[test]
fn test_embedded_source_wins() {
    refl::register_external(
        Source::<Shape>::new()
            .name("Polygon")
            .class_attrs(ClassAttrs::new().with::<Inclusive>())
            .member_groups(vec![AttrGroup::new(1, FieldAttrs::new().with::<Inclusive>())]),
    )
    .unwrap();

    let info = refl::type_info::<Shape>();
    assert_eq!(info.name(), Some("Shape"));
    assert!(info.class_attrs().is_empty());
    assert!(info.has_member_attr::<Optional>(0));
    assert!(!info.has_member_attr::<Inclusive>(0));
}

struct Late;

#[test]
fn test_register_after_first_use() {
    assert_eq!(refl::name::<Late>(), None);

    let err = refl::register_external(Source::<Late>::new().name("Late")).unwrap_err();
    assert_eq!(
        err,
        ReflError::AlreadyResolved {
            type_name: std::any::type_name::<Late>(),
        }
    );
    assert_eq!(refl::name::<Late>(), None);
}

struct Twice;

#[test]
fn test_second_external_source_rejected() {
    refl::register_external(Source::<Twice>::new().name("Twice")).unwrap();
    let err = refl::register_external(Source::<Twice>::new().name("Again")).unwrap_err();

    assert!(matches!(err, ReflError::AlreadyRegistered { .. }));
    assert_eq!(refl::name::<Twice>(), Some("Twice"));
}

struct Cells {
    a: u8,
    b: u8,
}

#[test]
fn test_group_sizes_checked_at_registration() {
    let err = refl::register_external(
        Source::<Cells>::new()
            .decl(FieldAttrs::new(), [field!(Cells, a), field!(Cells, b)])
            .member_groups(vec![AttrGroup::new(3, FieldAttrs::new())]),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ReflError::GroupSizeMismatch {
            grouped: 3,
            members: 2,
            ..
        }
    ));
    assert!(!refl::members_known::<Cells>());
}

struct Knot;
struct Loop;

#[test]
fn test_cyclic_external_graph_terminates() {
    refl::register_external(Source::<Knot>::new().name("Knot").virtual_base::<Loop>()).unwrap();
    refl::register_external(Source::<Loop>::new().name("Loop").virtual_base::<Knot>()).unwrap();

    let virtual_bases = refl::virtual_bases::<Knot>();
    let keys: Vec<TypeKey> = virtual_bases.iter().map(|info| info.key()).collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&TypeKey::of::<Loop>()));
}
