//! Member accessors
//!
//! A [`Member<T>`] reaches one field of a `T`, shared or mutable, without
//! the caller knowing the field type statically. The field is handed out
//! as `dyn Any`; the typed helpers downcast it.

use std::any::Any;
use std::fmt;

use crate::info::TypeKey;

/// Object-safe view over a pair of field projection functions
trait FieldAccess<T>: Send + Sync {
    fn get<'a>(&self, object: &'a T) -> &'a dyn Any;
    fn get_mut<'a>(&self, object: &'a mut T) -> &'a mut dyn Any;
}

struct FieldFns<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: 'static, F: Any> FieldAccess<T> for FieldFns<T, F> {
    fn get<'a>(&self, object: &'a T) -> &'a dyn Any {
        (self.get)(object)
    }

    fn get_mut<'a>(&self, object: &'a mut T) -> &'a mut dyn Any {
        (self.get_mut)(object)
    }
}

/// Accessor for one reflected field of `T`
pub struct Member<T> {
    access: Box<dyn FieldAccess<T>>,
    field_type: TypeKey,
    name: Option<&'static str>,
}

impl<T: 'static> Member<T> {
    /// Create an unnamed accessor from a pair of projections
    pub fn new<F: Any>(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self {
            access: Box::new(FieldFns { get, get_mut }),
            field_type: TypeKey::of::<F>(),
            name: None,
        }
    }

    /// Attach a field name
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Borrow the field of `object`
    pub fn get<'a>(&self, object: &'a T) -> &'a dyn Any {
        self.access.get(object)
    }

    /// Mutably borrow the field of `object`
    pub fn get_mut<'a>(&self, object: &'a mut T) -> &'a mut dyn Any {
        self.access.get_mut(object)
    }

    /// Borrow the field as `F`, or `None` if the field has another type
    pub fn get_as<'a, F: Any>(&self, object: &'a T) -> Option<&'a F> {
        self.get(object).downcast_ref()
    }

    /// Mutably borrow the field as `F`, or `None` if the field has another type
    pub fn get_mut_as<'a, F: Any>(&self, object: &'a mut T) -> Option<&'a mut F> {
        self.get_mut(object).downcast_mut()
    }

    /// Type of the field
    pub fn field_type(&self) -> TypeKey {
        self.field_type
    }

    /// Declared name of the field
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("field_type", &self.field_type.type_name())
            .finish()
    }
}

/// Build a named [`Member`] for a field of a struct.
///
/// ```
/// struct Pos {
///     x: f32,
/// }
///
/// let member = refl::field!(Pos, x);
/// let mut pos = Pos { x: 1.5 };
/// *member.get_mut_as::<f32>(&mut pos).unwrap() += 1.0;
/// assert_eq!(member.name(), Some("x"));
/// assert_eq!(pos.x, 2.5);
/// ```
#[macro_export]
macro_rules! field {
    ($ty:ty, $field:tt) => {
        $crate::Member::<$ty>::new(
            |object: &$ty| &object.$field,
            |object: &mut $ty| &mut object.$field,
        )
        .named(stringify!($field))
    };
}
