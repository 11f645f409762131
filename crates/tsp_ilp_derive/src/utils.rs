use syn::{LitStr, Path, Type};

pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Expression that turns the raw CLI string into the field value: either a
/// caller-supplied `parse_with` path or `str::parse` against the field type.
pub fn value_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    match parse_with {
        Some(path) => quote::quote! { #path(&raw)? },
        None => quote::quote! {
            raw.parse::<#ty>().map_err(|e| {
                crate::Error::invalid_input(format!("Invalid value for --{name}: {raw} ({e})"))
            })?
        },
    }
}

/// Reads a `name = "literal"` attribute value.
pub fn lit_str(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}
