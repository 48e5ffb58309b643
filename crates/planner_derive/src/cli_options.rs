use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, LitStr, Meta, Path, Type,
    parse_macro_input, spanned::Spanned,
};

use crate::utils;

/// Per-field `#[cli(...)]` settings.
#[derive(Default)]
struct CliField {
    long: Option<String>,
    parse_with: Option<Path>,
    flag: bool,
}

/// Generates option handling for every field carrying `#[cli(long = "...")]`:
///
/// - `apply_cli_option(name, value)` assigns the parsed value and reports
///   whether the name was recognised,
/// - `#[cli(flag)]` on a `bool` field accepts `--name`, `--name=<bool>` and
///   `--no-name`,
/// - `cli_usage()` lists every option with a value hint and the first line
///   of its doc comment.
pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "CliOptions requires named fields")
            .to_compile_error()
            .into();
    };

    let mut arms = Vec::new();
    let mut usage_rows = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let cli = match parse_cli_attrs(&field.attrs) {
            Ok(cli) => cli,
            Err(err) => return err.to_compile_error().into(),
        };
        let Some(long_name) = cli.long else {
            continue;
        };

        let long_lit = LitStr::new(&long_name, Span::call_site());
        let doc_lit = LitStr::new(&first_doc_line(&field.attrs), Span::call_site());

        if cli.flag {
            let negated_lit = LitStr::new(&format!("no-{long_name}"), Span::call_site());
            arms.push(quote! {
                #long_lit => {
                    self.#field_ident = match value {
                        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                            "1" | "true" | "yes" | "on" => true,
                            "0" | "false" | "no" | "off" => false,
                            _ => {
                                return Err(crate::Error::invalid_config(format!(
                                    "Invalid boolean for --{name}: {raw} (expected true/false)"
                                )));
                            }
                        },
                        None => true,
                    };
                    Ok(true)
                }
            });
            arms.push(quote! {
                #negated_lit => {
                    if value.is_some() {
                        return Err(crate::Error::invalid_config(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    self.#field_ident = false;
                    Ok(true)
                }
            });
            usage_rows.push(quote! {
                (format!("--{}[=<bool>]", #long_lit), #doc_lit)
            });
            usage_rows.push(quote! {
                (format!("--{}", #negated_lit), "")
            });
            continue;
        }

        let parse_expr = utils::build_cli_parse_expr(&field.ty, cli.parse_with.as_ref());
        let hint = value_hint(&field.ty, cli.parse_with.as_ref());

        arms.push(quote! {
            #long_lit => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_config(format!("Missing value for --{name}"))
                })?;
                self.#field_ident = #parse_expr;
                Ok(true)
            }
        });
        usage_rows.push(quote! {
            (format!("--{} <{}>", #long_lit, #hint), #doc_lit)
        });
    }

    let expanded = quote! {
        impl #struct_ident {
            /// Splits `name=value`, or takes the next argument as the value
            /// unless it is another option.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((k, v)) = raw_name.split_once('=') {
                    return (k.to_string(), Some(v.to_string()));
                }

                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next(),
                    _ => None,
                };

                (raw_name.to_string(), value)
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }

            /// One line per option: `--name <hint>` padded, then its description.
            pub fn cli_usage() -> String {
                let rows: Vec<(String, &str)> = vec![#(#usage_rows),*];
                let width = rows.iter().map(|(opt, _)| opt.len()).max().unwrap_or(0);
                rows.iter()
                    .map(|(opt, doc)| {
                        if doc.is_empty() {
                            format!("  {opt}\n")
                        } else {
                            format!("  {opt:<width$}  {doc}\n")
                        }
                    })
                    .collect()
            }
        }
    };

    TokenStream::from(expanded)
}

fn parse_cli_attrs(attrs: &[Attribute]) -> syn::Result<CliField> {
    let mut cli = CliField::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("long") {
                let lit: LitStr = meta.value()?.parse()?;
                cli.long = Some(lit.value());
                return Ok(());
            }
            if meta.path.is_ident("parse_with") {
                let lit: LitStr = meta.value()?.parse()?;
                cli.parse_with = Some(syn::parse_str(&lit.value())?);
                return Ok(());
            }
            if meta.path.is_ident("flag") {
                cli.flag = true;
                return Ok(());
            }
            Err(meta.error("unsupported cli attribute; expected long/parse_with/flag"))
        })?;
    }
    Ok(cli)
}

/// Runtime expression naming the accepted values. Enum parsers list their
/// variants; plain types show the type name and strings read as paths.
fn value_hint(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parser) = parse_with
        && parser.segments.len() > 1
    {
        let mut owner = parser.clone();
        owner.segments = parser
            .segments
            .iter()
            .take(parser.segments.len() - 1)
            .cloned()
            .collect();
        return quote! { #owner::VARIANTS.join("|") };
    }

    let name = utils::type_name(ty);
    let hint = if name == "String" { "path".to_string() } else { name };
    quote! { #hint }
}

fn first_doc_line(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .find_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .unwrap_or_default()
}
