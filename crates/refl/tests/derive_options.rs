use refl::{Optional, Reflect, TypeKey};

refl::attribute!(pub struct Hidden: field);

#[derive(Reflect)]
struct Settings {
    #[refl(attrs(Optional))]
    volume: u8,
    #[refl(attrs(Optional))]
    brightness: u8,
    width: u32,
    #[refl(skip)]
    dirty: bool,
    #[refl(attrs(Optional))]
    theme: String,
    #[refl(attrs(Optional, Hidden), rename = "secret")]
    token: String,
}

#[test]
fn test_consecutive_fields_share_a_group() {
    let info = refl::type_info::<Settings>();
    let groups: Vec<usize> = info.member_groups().iter().map(|group| group.len).collect();

    assert_eq!(groups, [2, 1, 1, 1]);
    assert_eq!(info.member_group(1), Some(0));
    assert_eq!(info.member_group(3), Some(2));
    assert!(info.has_member_attr::<Optional>(3));
    assert!(!info.has_member_attr::<Optional>(2));
    assert!(info.has_member_attr::<Hidden>(4));
}

#[test]
fn test_skip_and_rename() {
    let info = refl::type_info::<Settings>();

    assert_eq!(info.member_count(), 5);
    assert_eq!(info.member_index("dirty"), None);
    assert_eq!(info.member_index("token"), None);
    assert_eq!(info.member_index("secret"), Some(4));
    assert_eq!(info.member_type(2), Some(TypeKey::of::<u32>()));
    assert_eq!(info.member_type(4), Some(TypeKey::of::<String>()));

    let mut settings = Settings {
        volume: 3,
        brightness: 7,
        width: 640,
        dirty: false,
        theme: "dark".to_string(),
        token: String::new(),
    };
    refl::member::<Settings>(4)
        .get_mut_as::<String>(&mut settings)
        .unwrap()
        .push_str("abc");
    assert_eq!(settings.token, "abc");
    assert!(!settings.dirty);
    assert_eq!(
        (settings.volume, settings.brightness, settings.width, settings.theme.as_str()),
        (3, 7, 640, "dark")
    );
}

#[test]
fn test_attribute_names() {
    let attrs = refl::member_attrs::<Settings>(4);
    let mut names: Vec<&str> = attrs.iter().map(|tag| tag.name()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Hidden", "Optional"]);
}
