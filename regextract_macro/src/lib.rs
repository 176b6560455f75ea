//! Crate with the derive macro for [regextract](https://crates.io/crates/regextract). Not usable as a standalone crate.

use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, DeriveInput, Token,
};

mod attribute;
mod error;
mod pattern;
mod utils;

pub(crate) use attribute::*;
pub(crate) use error::*;
pub(crate) use pattern::*;
pub(crate) use utils::*;

mod derive;

#[proc_macro_derive(Extract, attributes(extract))]
pub fn derive_extract(input: TokenStream1) -> TokenStream1 {
    let input = parse_macro_input!(input as DeriveInput);

    let ident = input.ident;
    let generics = input.generics;
    let attrs = input.attrs;

    let res = match input.data {
        syn::Data::Struct(data) => derive::parse_struct(ident, generics, attrs, data),
        syn::Data::Enum(data) => derive::parse_enum(ident, generics, attrs, data),
        syn::Data::Union(data) => derive::parse_union(ident, data),
    };
    match res {
        Ok(res) => res.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
