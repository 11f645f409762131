use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    // The option name only appears in error messages.
    let mut option_name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in &input.attrs {
        if !attr.path().is_ident("cli_value") {
            continue;
        }
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                option_name = utils::lit_str(&meta)?;
                Ok(())
            } else {
                Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
            }
        });
        if let Err(err) = result {
            return err.to_compile_error().into();
        }
    }

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut names = Vec::new();

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(
                variant.span(),
                "CliValue only supports enums with unit variants",
            )
            .to_compile_error()
            .into();
        }

        let variant_ident = &variant.ident;
        let mut canonical = utils::to_kebab_case(&variant_ident.to_string());
        let mut aliases: Vec<String> = Vec::new();

        for attr in &variant.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    canonical = utils::lit_str(&meta)?;
                    Ok(())
                } else if meta.path.is_ident("alias") {
                    aliases.push(utils::lit_str(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported cli attribute; expected name/alias"))
                }
            });
            if let Err(err) = result {
                return err.to_compile_error().into();
            }
        }

        let canonical_lit = LitStr::new(&canonical, Span::call_site());
        let accepted: Vec<LitStr> = std::iter::once(&canonical)
            .chain(aliases.iter())
            .map(|name| LitStr::new(name, Span::call_site()))
            .collect();

        parse_arms.push(quote! { #(#accepted)|* => Ok(Self::#variant_ident), });
        display_arms.push(quote! { Self::#variant_ident => #canonical_lit, });
        names.push(canonical);
    }

    let option_lit = LitStr::new(&option_name, Span::call_site());
    let expected_lit = LitStr::new(&names.join("|"), Span::call_site());
    let name_lits: Vec<LitStr> = names
        .iter()
        .map(|name| LitStr::new(name, Span::call_site()))
        .collect();

    let expanded = quote! {
        impl #enum_ident {
            /// Canonical CLI spellings of all variants.
            pub const NAMES: &'static [&'static str] = &[#(#name_lits),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit, raw, #expected_lit
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    #(#display_arms)*
                })
            }
        }
    };

    TokenStream::from(expanded)
}
