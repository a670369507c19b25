//! Record derive macro implementation

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase,
};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// `rename_all` targets.
#[derive(Clone, Copy)]
enum RenameRule {
    Snake,
    LowerCamel,
    UpperCamel,
    ScreamingSnake,
    Kebab,
    Lower,
    Upper,
}

impl RenameRule {
    fn parse(lit: &syn::LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "snake_case" => Self::Snake,
            "camelCase" => Self::LowerCamel,
            "PascalCase" => Self::UpperCamel,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unknown rename_all rule `{other}`"),
                ));
            }
        })
    }

    fn apply(self, name: &str) -> String {
        match self {
            Self::Snake => name.to_snake_case(),
            Self::LowerCamel => name.to_lower_camel_case(),
            Self::UpperCamel => name.to_upper_camel_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
        }
    }
}

#[derive(Default)]
struct RecordAttrs {
    rename_all: Option<(RenameRule, Span)>,
    rename: Option<String>,
    skip: bool,
}

impl syn::parse::Parse for RecordAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = RecordAttrs::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            match ident.to_string().as_str() {
                "skip" => attrs.skip = true,
                "rename" => {
                    let _: syn::Token![=] = input.parse()?;
                    let value: syn::LitStr = input.parse()?;
                    attrs.rename = Some(value.value());
                }
                "rename_all" => {
                    let _: syn::Token![=] = input.parse()?;
                    let value: syn::LitStr = input.parse()?;
                    attrs.rename_all = Some((RenameRule::parse(&value)?, ident.span()));
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown record attribute `{other}`"),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }

        Ok(attrs)
    }
}

fn parse_attrs(attrs: &[syn::Attribute]) -> Result<RecordAttrs> {
    let mut merged = RecordAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        let syn::Meta::List(meta_list) = &attr.meta else {
            return Err(syn::Error::new_spanned(attr, "expected #[record(...)]"));
        };
        let parsed = syn::parse2::<RecordAttrs>(meta_list.tokens.clone())?;
        merged.skip |= parsed.skip;
        if parsed.rename.is_some() {
            merged.rename = parsed.rename;
        }
        if parsed.rename_all.is_some() {
            merged.rename_all = parsed.rename_all;
        }
    }
    Ok(merged)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let struct_attrs = parse_attrs(&input.attrs)?;
    if struct_attrs.skip || struct_attrs.rename.is_some() {
        return Err(syn::Error::new_spanned(
            &input,
            "`skip` and `rename` apply to fields; use `rename_all` on the struct",
        ));
    }
    let rule = struct_attrs.rename_all.map(|(rule, _)| rule);

    let mut pushes = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_attrs(&field.attrs)?;
        if let Some((_, span)) = attrs.rename_all {
            return Err(syn::Error::new(span, "`rename_all` applies to the struct"));
        }
        if attrs.skip {
            continue;
        }

        let field_name = ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name).to_string();
        let column = match (attrs.rename, rule) {
            (Some(column), _) => Some(column),
            (None, Some(rule)) => Some(rule.apply(&field_name)),
            (None, None) => None,
        };

        pushes.push(match column {
            Some(column) => quote! {
                record.push(::sqlweave::Field::new(#field_name, self.#ident).rename(#column));
            },
            None => quote! {
                record.push(::sqlweave::Field::new(#field_name, self.#ident));
            },
        });
    }

    Ok(quote! {
        impl #impl_generics ::sqlweave::IntoRecord for #name #ty_generics #where_clause {
            fn into_record(self) -> ::sqlweave::Record {
                #[allow(unused_mut)]
                let mut record = ::sqlweave::Record::new();
                #(#pushes)*
                record
            }
        }
    })
}
