//! `#[record]` turns a sea-orm `Model` struct into a tracked record: it adds
//! the surrogate `id` key plus creation/modification timestamps and wires the
//! generated `ActiveModel`/`Entity` into the DAO base traits.
//!
//! Place it above `#[sea_orm::model]` so the injected fields are visible to the
//! sea-orm derives.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Expr, ExprLit, Field, Fields, Ident, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Path,
    Token, parse_macro_input, parse_quote, punctuated::Punctuated,
};

struct RecordArgs {
    traits: Path,
    id: Ident,
    created_at: Ident,
    updated_at: Ident,
}

impl RecordArgs {
    fn parse(args: Punctuated<Meta, Token![,]>) -> syn::Result<Self> {
        let mut parsed = Self {
            traits: parse_quote!(crate::db::dao::record),
            id: Ident::new("id", Span::call_site()),
            created_at: Ident::new("created_at", Span::call_site()),
            updated_at: Ident::new("updated_at", Span::call_site()),
        };

        for meta in args {
            let Meta::NameValue(MetaNameValue { path, value, .. }) = meta else {
                return Err(syn::Error::new_spanned(
                    meta,
                    "expected `key = \"value\"`, e.g. created_at = \"created_date\"",
                ));
            };
            let key = path
                .get_ident()
                .map(ToString::to_string)
                .ok_or_else(|| syn::Error::new_spanned(&path, "expected a plain key"))?;
            let value = string_literal(value)?;

            match key.as_str() {
                "traits" => parsed.traits = value.parse()?,
                "id" => parsed.id = Ident::new(&value.value(), value.span()),
                "created_at" => parsed.created_at = Ident::new(&value.value(), value.span()),
                "updated_at" => parsed.updated_at = Ident::new(&value.value(), value.span()),
                _ => {
                    return Err(syn::Error::new_spanned(
                        path,
                        "unknown record key; expected traits, id, created_at or updated_at",
                    ));
                }
            }
        }

        Ok(parsed)
    }
}

fn string_literal(value: Expr) -> syn::Result<LitStr> {
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

/// `created_date` -> `CreatedDate`, matching the `Column` variants sea-orm derives.
fn column_variant(field: &Ident) -> Ident {
    let camel: String = field
        .to_string()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    Ident::new(&camel, field.span())
}

fn has_field(fields: &Punctuated<Field, Token![,]>, name: &Ident) -> bool {
    fields
        .iter()
        .any(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
}

#[proc_macro_attribute]
pub fn record(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let args = match RecordArgs::parse(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut model = parse_macro_input!(item as ItemStruct);
    let Fields::Named(named) = &mut model.fields else {
        return syn::Error::new_spanned(&model, "#[record] needs a struct with named fields")
            .to_compile_error()
            .into();
    };

    let RecordArgs {
        traits,
        id,
        created_at,
        updated_at,
    } = args;

    let mut leading: Punctuated<Field, Token![,]> = Punctuated::new();
    if !has_field(&named.named, &id) {
        leading.push(parse_quote! {
            #[sea_orm(primary_key, auto_increment = false)]
            pub #id: uuid::Uuid
        });
    }
    for stamp in [&created_at, &updated_at] {
        if !has_field(&named.named, stamp) {
            leading.push(parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub #stamp: sea_orm::entity::prelude::DateTimeWithTimeZone
            });
        }
    }
    leading.extend(named.named.iter().cloned());
    named.named = leading;

    let created_column = column_variant(&created_at);

    quote! {
        #model

        impl #traits::StampedRecord for ActiveModel {
            fn assign_id(&mut self, id: uuid::Uuid) {
                self.#id = sea_orm::ActiveValue::Set(id);
            }

            fn stamp_created(&mut self, at: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#created_at = sea_orm::ActiveValue::Set(at);
            }

            fn stamp_updated(&mut self, at: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#updated_at = sea_orm::ActiveValue::Set(at);
            }
        }

        impl #traits::RecordEntity for Entity {
            fn created_at_column() -> Column {
                Column::#created_column
            }
        }
    }
    .into()
}
