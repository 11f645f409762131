use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

struct OptionField {
    arm: proc_macro2::TokenStream,
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new(input.span(), "CliOptions requires named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut options = Vec::new();
    for field in fields {
        match collect_field(field) {
            Ok(Some(option)) => options.push(option),
            Ok(None) => {}
            Err(err) => return err.to_compile_error().into(),
        }
    }

    let arms = options.iter().map(|option| &option.arm);
    let expanded = quote! {
        impl #struct_ident {
            /// Applies `--name value`. Returns false when the option is not
            /// one of the derived fields so the caller can handle it.
            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms)*
                    _ => Ok(false),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

fn collect_field(field: &syn::Field) -> syn::Result<Option<OptionField>> {
    let Some(field_ident) = &field.ident else {
        return Ok(None);
    };

    let mut long_name: Option<String> = None;
    let mut parse_with: Option<Path> = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("cli") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("long") {
                long_name = Some(utils::lit_str(&meta)?);
                Ok(())
            } else if meta.path.is_ident("parse_with") {
                let lit: LitStr = meta.value()?.parse()?;
                parse_with = Some(syn::parse_str(&lit.value())?);
                Ok(())
            } else {
                Err(meta.error("unsupported cli attribute; expected long/parse_with"))
            }
        })?;
    }

    let Some(long_name) = long_name else {
        return Ok(None);
    };

    let long_lit = LitStr::new(&long_name, Span::call_site());
    let parse_expr = utils::value_parse_expr(&field.ty, parse_with.as_ref());
    let arm = quote! {
        #long_lit => {
            let raw = value.ok_or_else(|| {
                crate::Error::invalid_input(format!("Missing value for --{name}"))
            })?;
            self.#field_ident = #parse_expr;
            Ok(true)
        }
    };

    Ok(Some(OptionField { arm }))
}
