//! Module containing proc macro function for timing stuff

use crate::imports::*;

pub fn timer(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(item as syn::ItemFn);
    let syn::ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = ast;
    let fn_name = sig.ident.to_string();

    quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "logging")]
            let now = std::time::Instant::now();
            let timed_result = #block;
            #[cfg(feature = "logging")]
            log::debug!("`{}` took {:?}", #fn_name, now.elapsed());
            timed_result
        }
    }
    .into()
}
