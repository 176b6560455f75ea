use std::fmt::Display;

use quote::ToTokens;

pub type Result<T> = std::result::Result<T, syn::Error>;

pub fn err_spanned<T: ToTokens, U: Display, R>(tokens: T, message: U) -> Result<R> {
    Err(syn::Error::new_spanned(tokens, message))
}

/// Collects several errors, so that all of them are reported at once.
#[derive(Default)]
pub struct ErrorBuilder {
    error: Option<syn::Error>,
}

impl ErrorBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_spanned<T: ToTokens, U: Display>(&mut self, tokens: T, message: U) -> &mut Self {
        self.with_error(syn::Error::new_spanned(tokens, message))
    }
    pub fn with_error(&mut self, error: syn::Error) -> &mut Self {
        match &mut self.error {
            Some(existing) => existing.combine(error),
            None => self.error = Some(error),
        }
        self
    }
    pub fn ok_or_build(&mut self) -> Result<()> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
