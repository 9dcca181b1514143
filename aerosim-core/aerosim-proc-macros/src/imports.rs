pub use proc_macro::TokenStream;
pub use proc_macro2::TokenStream as TokenStream2;
pub use proc_macro_error::{abort, abort_call_site, proc_macro_error};
pub use quote::{quote, TokenStreamExt};
pub use syn::{spanned::Spanned, DeriveInput, Fields};
