// #[refl(...)] option parsing

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, LitStr, Path, Result, Token};

/// One entry of `extends(...)`
pub struct BaseSpec {
    pub is_virtual: bool,
    pub path: Path,
}

impl Parse for BaseSpec {
    fn parse(input: ParseStream) -> Result<Self> {
        let is_virtual = input.peek(Token![virtual]);
        if is_virtual {
            input.parse::<Token![virtual]>()?;
        }
        Ok(BaseSpec {
            is_virtual,
            path: input.parse()?,
        })
    }
}

/// Options on the struct itself
#[derive(Default)]
pub struct TypeOptions {
    pub name: Option<LitStr>,
    pub unnamed: bool,
    pub bases: Vec<BaseSpec>,
    pub attrs: Vec<Path>,
}

/// Options on one field
#[derive(Default)]
pub struct FieldOptions {
    pub rename: Option<LitStr>,
    pub attrs: Vec<Path>,
    pub skip: bool,
}

fn parse_list<T: Parse>(meta: &syn::meta::ParseNestedMeta) -> Result<Vec<T>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let items = Punctuated::<T, Token![,]>::parse_terminated(&content)?;
    Ok(items.into_iter().collect())
}

fn refl_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("refl"))
}

impl TypeOptions {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut options = TypeOptions::default();
        for attr in refl_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    options.name = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("unnamed") {
                    options.unnamed = true;
                } else if meta.path.is_ident("extends") {
                    options.bases.extend(parse_list::<BaseSpec>(&meta)?);
                } else if meta.path.is_ident("attrs") {
                    options.attrs.extend(parse_list::<Path>(&meta)?);
                } else {
                    return Err(meta.error("unknown refl option, expected `name`, `unnamed`, `extends` or `attrs`"));
                }
                Ok(())
            })?;
        }

        if options.unnamed {
            if let Some(name) = &options.name {
                return Err(syn::Error::new_spanned(
                    name,
                    "`name` and `unnamed` cannot be combined",
                ));
            }
        }
        Ok(options)
    }
}

impl FieldOptions {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut options = FieldOptions::default();
        for attr in refl_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    options.rename = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("attrs") {
                    options.attrs.extend(parse_list::<Path>(&meta)?);
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                } else {
                    return Err(meta.error("unknown refl field option, expected `attrs`, `rename` or `skip`"));
                }
                Ok(())
            })?;
        }
        Ok(options)
    }
}
