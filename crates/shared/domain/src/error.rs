use std::borrow::Cow;

/// Construction-time contract violations of the domain types.
#[verity_derive::verity_error]
pub enum DomainError {
    /// A persisted or transmitted state integer outside `0..=2`.
    #[error("Invalid domain state code{}: {message}", format_context(.context))]
    InvalidStateCode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A required field was absent or empty.
    #[error("Required field missing{}: {message}", format_context(.context))]
    NullRequiredField { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A verification request was built without a package set.
    #[error("Package set missing{}: {message}", format_context(.context))]
    NullPackageSet { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid host{}: {message}", format_context(.context))]
    InvalidHost { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
