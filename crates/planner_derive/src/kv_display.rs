use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

enum Render {
    Display,
    Debug,
}

fn parse_render(attrs: &[Attribute]) -> syn::Result<Render> {
    let mut render = Render::Display;
    for attr in attrs.iter().filter(|a| a.path().is_ident("kv")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("debug") {
                render = Render::Debug;
                return Ok(());
            }
            Err(meta.error("unsupported kv attribute; expected debug"))
        })?;
    }
    Ok(render)
}

/// `Display` as a tab-indented `key = value` block with the `=` signs lined
/// up. Fields marked `#[kv(debug)]` render with `{:?}`.
pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "KvDisplay requires named fields")
            .to_compile_error()
            .into();
    };

    let mut rows = Vec::new();
    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let render = match parse_render(&field.attrs) {
            Ok(render) => render,
            Err(err) => return err.to_compile_error().into(),
        };
        let key = field_ident.to_string();
        let value = match render {
            Render::Display => quote! { &self.#field_ident },
            Render::Debug => quote! { format!("{:?}", self.#field_ident) },
        };
        rows.push((key, value));
    }

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let template: String = rows
        .iter()
        .map(|(key, _)| format!("\n\t{key:<width$} = {{}}"))
        .collect();
    let template_lit = LitStr::new(&template, Span::call_site());
    let values = rows.iter().map(|(_, value)| value);

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #template_lit, #(#values),*)
            }
        }
    };

    TokenStream::from(expanded)
}
