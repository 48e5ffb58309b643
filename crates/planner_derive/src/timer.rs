use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, parse_macro_input};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    let label = if attr.is_empty() {
        sig.ident.to_string()
    } else {
        parse_macro_input!(attr as LitStr).value()
    };
    let label_lit = LitStr::new(&label, sig.ident.span());

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            struct __PlannerTimer(&'static str, ::std::time::Instant);

            impl ::std::ops::Drop for __PlannerTimer {
                fn drop(&mut self) {
                    log::debug!(
                        "{}: elapsed_s={:.3}",
                        self.0,
                        self.1.elapsed().as_secs_f64()
                    );
                }
            }

            let __planner_timer = __PlannerTimer(#label_lit, ::std::time::Instant::now());
            #block
        }
    };

    TokenStream::from(expanded)
}
