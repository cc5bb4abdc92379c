//! Registry configured without autoloading and with eager validation.
//!
//! Runs as its own test binary so `configure` precedes every other use of
//! the registry.

use refl::{NameFacet, ReflError, Reflect, RegistryConfig};

#[derive(Reflect)]
struct NotLoaded {
    value: u8,
}

#[derive(Reflect)]
struct Duplicated {
    #[refl(rename = "value")]
    first: u8,
    value: u8,
}

#[derive(Reflect)]
struct Clean {
    value: u8,
}

#[test]
fn test_eager_validation_without_autoload() {
    refl::configure(RegistryConfig {
        autoload_embedded: false,
        eager_validation: true,
    })
    .unwrap();
    assert!(refl::config().eager_validation);
    assert_eq!(
        refl::configure(RegistryConfig::default()),
        Err(ReflError::AlreadyConfigured)
    );

    // Derived but never registered.
    assert_eq!(refl::name::<NotLoaded>(), None);
    assert!(!refl::members_known::<NotLoaded>());

    refl::register::<Duplicated>().unwrap();
    let err = refl::try_type_info::<Duplicated>().unwrap_err();
    assert!(matches!(
        err,
        ReflError::DuplicateName {
            facet: NameFacet::Members,
            name: "value",
            ..
        }
    ));

    refl::register::<Clean>().unwrap();
    let info = refl::try_type_info::<Clean>().unwrap();
    assert_eq!(info.member_index("value"), Some(0));

    let values = [NotLoaded { value: 1 }.value, Duplicated { first: 2, value: 3 }.first];
    assert_eq!(values, [1, 2]);
    assert_eq!(Clean { value: 4 }.value, 4);
}
