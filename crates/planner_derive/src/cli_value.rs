use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

/// Command-line spellings of one variant: the canonical name first, then aliases.
fn variant_spellings(ident: &Ident, attrs: &[Attribute]) -> syn::Result<Vec<String>> {
    let mut canonical = utils::to_kebab_case(&ident.to_string());
    let mut aliases = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            let lit: LitStr = meta.value()?.parse()?;
            if meta.path.is_ident("name") {
                canonical = lit.value();
            } else if meta.path.is_ident("alias") {
                aliases.push(lit.value());
            } else {
                return Err(meta.error("unsupported cli attribute; expected name/alias"));
            }
            Ok(())
        })?;
    }
    aliases.insert(0, canonical);
    Ok(aliases)
}

fn option_name(enum_ident: &Ident, attrs: &[Attribute]) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                name = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
        })?;
    }
    Ok(name)
}

/// Generates `VARIANTS`, `parse`, `FromStr` and `Display` for a unit-only
/// enum. Input is matched case-insensitively with `_` read as `-`.
pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = input.ident.clone();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let option = match option_name(&enum_ident, &input.attrs) {
        Ok(name) => LitStr::new(&name, Span::call_site()),
        Err(err) => return err.to_compile_error().into(),
    };

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut canonical_names = Vec::new();

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.span(), "CliValue only supports unit variants")
                .to_compile_error()
                .into();
        }

        let ident = &variant.ident;
        let spellings = match variant_spellings(ident, &variant.attrs) {
            Ok(spellings) => spellings,
            Err(err) => return err.to_compile_error().into(),
        };
        let lits: Vec<LitStr> = spellings
            .iter()
            .map(|s| LitStr::new(s, Span::call_site()))
            .collect();
        let canonical = &lits[0];

        parse_arms.push(quote! { #(#lits)|* => Ok(Self::#ident), });
        display_arms.push(quote! { Self::#ident => #canonical, });
        canonical_names.push(canonical.clone());
    }

    let expanded = quote! {
        impl #enum_ident {
            /// Canonical command-line spellings, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[#(#canonical_names),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
                match normalized.as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_config(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option,
                        raw,
                        Self::VARIANTS.join("|")
                    ))),
                }
            }
        }

        impl std::str::FromStr for #enum_ident {
            type Err = crate::Error;

            fn from_str(raw: &str) -> crate::Result<Self> {
                Self::parse(raw)
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
