use crate::imports::*;

pub fn serde_api_derive(item: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(item as DeriveInput);
    let name = &ast.ident;
    if !matches!(ast.data, syn::Data::Struct(_) | syn::Data::Enum(_)) {
        abort_call_site!("#[derive(SerdeAPI)] only works on structs and enums");
    }
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    quote! {
        impl #impl_generics SerdeAPI for #name #ty_generics #where_clause {}
    }
    .into()
}
