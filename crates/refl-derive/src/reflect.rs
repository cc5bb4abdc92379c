// #[derive(Reflect)] implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Fields, GenericParam, Index, Member, Path, Result};

use crate::options::{FieldOptions, TypeOptions};

/// A run of consecutive fields sharing one attribute list
struct Group {
    attrs: Vec<Path>,
    members: Vec<TokenStream>,
}

fn attrs_key(attrs: &[Path]) -> Vec<String> {
    attrs.iter().map(|path| quote!(#path).to_string()).collect()
}

fn field_attrs(attrs: &[Path]) -> TokenStream {
    quote! { ::refl::FieldAttrs::new() #( .with::<#attrs>() )* }
}

/// Expands `#[derive(Reflect)]`.
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[derive(Reflect)]
/// #[refl(extends(Base))]
/// struct Pos {
///     x: f32,
/// }
///
/// // Output:
/// impl ::refl::Reflect for Pos {
///     fn embedded_source() -> ::refl::Source<Self> {
///         ::refl::Source::new()
///             .name("Pos")
///             .class_attrs(::refl::ClassAttrs::new())
///             .no_bases()
///             .base::<Base>()
///             .decl(
///                 ::refl::FieldAttrs::new(),
///                 [::refl::Member::<Self>::new::<f32>(|o: &Self| &o.x, |o: &mut Self| &mut o.x).named("x")],
///             )
///     }
/// }
///
/// ::refl::inventory::submit! { ::refl::Embedded::new::<Pos>() }
/// ```
pub fn expand_reflect(input: DeriveInput) -> Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "#[derive(Reflect)] only supports structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "#[derive(Reflect)] only supports structs",
            ))
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "reflected types must be 'static, lifetime parameters are not supported",
        ));
    }

    let options = TypeOptions::from_attrs(&input.attrs)?;
    let ident = &input.ident;

    let name = if options.unnamed {
        quote! {}
    } else {
        let name = match &options.name {
            Some(name) => name.value(),
            None => ident.to_string(),
        };
        quote! { .name(#name) }
    };

    let class_attrs = &options.attrs;
    let bases = options.bases.iter().map(|base| {
        let path = &base.path;
        if base.is_virtual {
            quote! { .virtual_base::<#path>() }
        } else {
            quote! { .base::<#path>() }
        }
    });

    let named = matches!(fields, Fields::Named(_));
    let mut groups: Vec<Group> = Vec::new();
    for (position, field) in fields.iter().enumerate() {
        let field_options = FieldOptions::from_attrs(&field.attrs)?;
        if field_options.skip {
            continue;
        }
        if !named {
            if let Some(rename) = &field_options.rename {
                return Err(syn::Error::new_spanned(
                    rename,
                    "`rename` needs a named field, tuple struct members carry no names",
                ));
            }
        }

        let access = match &field.ident {
            Some(field_ident) => Member::Named(field_ident.clone()),
            None => Member::Unnamed(Index::from(position)),
        };
        let ty = &field.ty;
        let mut member = quote! {
            ::refl::Member::<Self>::new::<#ty>(
                |object: &Self| &object.#access,
                |object: &mut Self| &mut object.#access,
            )
        };
        if let Some(field_ident) = &field.ident {
            let member_name = match &field_options.rename {
                Some(rename) => rename.value(),
                None => field_ident.to_string(),
            };
            member = quote! { #member.named(#member_name) };
        }

        match groups.last_mut() {
            Some(group) if attrs_key(&group.attrs) == attrs_key(&field_options.attrs) => {
                group.members.push(member);
            }
            _ => groups.push(Group {
                attrs: field_options.attrs,
                members: vec![member],
            }),
        }
    }

    let decls = if groups.is_empty() {
        quote! { .decl(::refl::FieldAttrs::new(), ::std::iter::empty()) }
    } else {
        let decls = groups.iter().map(|group| {
            let attrs = field_attrs(&group.attrs);
            let members = &group.members;
            quote! { .decl(#attrs, [ #( #members ),* ]) }
        });
        quote! { #( #decls )* }
    };

    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!('static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let submit = if input.generics.params.is_empty() {
        quote! {
            ::refl::inventory::submit! {
                ::refl::Embedded::new::<#ident>()
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::refl::Reflect for #ident #ty_generics #where_clause {
            fn embedded_source() -> ::refl::Source<Self> {
                ::refl::Source::new()
                    #name
                    .class_attrs(::refl::ClassAttrs::new() #( .with::<#class_attrs>() )*)
                    .no_bases()
                    #( #bases )*
                    #decls
            }
        }

        #submit
    })
}
