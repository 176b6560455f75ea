//! Utilities for the macros. These elements are public but doc_hidden

use crate::{Error, Extract, Plan};

/// The plan of an [`extract!`](crate::extract!) call site, which keeps the result of building it
/// in a `lazy_static`.
///
/// A broken pattern is built once and then panics at every use. The pattern is a literal at the
/// call site, so that is a bug in the calling code, and the panic points there.
#[track_caller]
pub fn built<'a, T: Extract>(plan: &'a Result<Plan<T>, Error>, pattern: &str) -> &'a Plan<T> {
    match plan {
        Ok(plan) => plan,
        Err(err) => panic!("regextract: invalid pattern {:?}: {}", pattern, err),
    }
}
