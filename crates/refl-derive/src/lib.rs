// refl-derive: `#[derive(Reflect)]` for refl
//
// Writes the embedded metadata source of a struct: its class name, class
// attributes, bases, and one member accessor per field.
//
// Example:
// ```
// #[derive(Reflect)]
// #[refl(extends(Entity, virtual Named), attrs(Optional))]
// struct Player {
//     #[refl(attrs(Optional))]
//     title: String,
//     hp: i32,
//     #[refl(skip)]
//     cache: Vec<u8>,
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod options;
mod reflect;

/// Derives `refl::Reflect` for a struct.
///
/// Container options, in `#[refl(...)]`:
/// - `name = "..."`: reflected class name (default: the struct name)
/// - `unnamed`: declare no class name
/// - `extends(A, virtual B, ...)`: direct bases, in order; `virtual`
///   marks a virtual base
/// - `attrs(X, ...)`: class attributes
///
/// Field options, in `#[refl(...)]`:
/// - `attrs(X, ...)`: member attributes
/// - `rename = "..."`: reflected member name
/// - `skip`: leave the field out
///
/// Consecutive fields with the same attributes form one attribute group.
/// Tuple struct members carry no names. Non-generic types are collected
/// by the registry automatically; generic instantiations need
/// `refl::register::<T>()`.
#[proc_macro_derive(Reflect, attributes(refl))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    reflect::expand_reflect(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
