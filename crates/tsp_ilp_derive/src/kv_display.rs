use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input, spanned::Spanned};

use crate::utils;

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new(input.span(), "KvDisplay requires named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut lines = Vec::new();
    for field in fields {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut key = field_ident.to_string();
        let mut fmt_mode = String::from("display");
        for attr in &field.attrs {
            if !attr.path().is_ident("kv") {
                continue;
            }
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    key = utils::lit_str(&meta)?;
                    Ok(())
                } else if meta.path.is_ident("fmt") {
                    fmt_mode = utils::lit_str(&meta)?;
                    Ok(())
                } else {
                    Err(meta.error("unsupported kv attribute; expected name/fmt"))
                }
            });
            if let Err(err) = result {
                return err.to_compile_error().into();
            }
        }

        let value = match fmt_mode.as_str() {
            "display" => quote! { self.#field_ident },
            "path" => quote! { self.#field_ident.display() },
            "len" => quote! { self.#field_ident.len() },
            other => {
                return syn::Error::new(field.span(), format!("unsupported kv fmt mode: {other}"))
                    .to_compile_error()
                    .into();
            }
        };
        lines.push(quote! {
            write!(f, "\n\t{} = {}", #key, #value)?;
        });
    }

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                #(#lines)*
                Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}
