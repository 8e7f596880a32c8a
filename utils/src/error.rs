
///
/// The application-level error type and its helpers.
///
/// `error!` builds an ad-hoc error from a format string, in the same way 
/// that `format!` builds a string.
///
pub use anyhow::{anyhow as error, bail, ensure, Context, Error, Result};
