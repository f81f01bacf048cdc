//! # Macros
//!
//! Procedural macros shared by the Verity crates.
//!
//! The only macro today is [`macro@verity_error`], which turns a plain enum into the error
//! type every crate in the workspace exposes.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! verity-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait with `.context(...)` for
///   `Result<T, Name>` and for `Result<T, Source>` of every wrapped source error.
/// * **Conversions**: Implements `From<Source>` for variants holding a `source` field (or a
///   field marked `#[source]`/`#[from]`), so `?` works across crate boundaries.
/// * **Formatting helper**: Emits a private `format_context` function for `#[error(...)]`
///   strings.
///
/// # Requirements
///
/// 1. Must be applied to an **enum** with **named-field** variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[verity_derive::verity_error]
/// pub enum CodecError {
///     #[error("Domain violation{}: {source}", format_context(.context))]
///     Domain { source: verity_domain::DomainError, context: Option<Cow<'static, str>> },
///
///     #[error("Truncated input{}: {message}", format_context(.context))]
///     Truncated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn decode(code: i32) -> Result<verity_domain::DomainState, CodecError> {
///     verity_domain::DomainState::try_from(code).context("Reading host state")
/// }
/// ```
#[proc_macro_attribute]
pub fn verity_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
