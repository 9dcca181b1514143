mod imports;
use crate::imports::*;
mod approx_eq_derive;
mod serde_api_derive;
mod timer;

#[proc_macro_error]
#[proc_macro_derive(ApproxEq)]
/// generate `ApproxEq` impl that compares every named field with the same tolerance
pub fn approx_eq_derive(input: TokenStream) -> TokenStream {
    approx_eq_derive::approx_eq_derive(input)
}

#[proc_macro_error]
#[proc_macro_derive(SerdeAPI)]
/// macro for deriving default implementation of SerdeAPI trait
pub fn serde_api_derive(item: TokenStream) -> TokenStream {
    serde_api_derive::serde_api_derive(item)
}

#[proc_macro_error]
#[proc_macro_attribute]
/// logs the wall time of the decorated function at debug level when the
/// calling crate is built with its `logging` feature
pub fn timer(attr: TokenStream, item: TokenStream) -> TokenStream {
    timer::timer(attr, item)
}
