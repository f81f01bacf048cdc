use std::borrow::Cow;

/// A specialized [`CodecError`] enum of this crate.
///
/// Every failure is fatal for the record being decoded; nothing is replaced by a default.
#[verity_derive::verity_error]
pub enum CodecError {
    /// The bytes decoded but violate a domain invariant (state code, host, required field).
    #[error("Domain violation{}: {source}", format_context(.context))]
    Domain { source: verity_domain::DomainError, context: Option<Cow<'static, str>> },

    #[error("Input truncated{}: {message}", format_context(.context))]
    Truncated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A negative, impossible, or inconsistent element count.
    #[error("Unexpected element count{}: {message}", format_context(.context))]
    UnexpectedCount { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown flag bits{}: {message}", format_context(.context))]
    InvalidFlags { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid UTF-8{}: {source}", format_context(.context))]
    InvalidUtf8 { source: std::string::FromUtf8Error, context: Option<Cow<'static, str>> },

    #[error("Trailing bytes after record{}: {message}", format_context(.context))]
    TrailingBytes { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CodecError {
    /// Whether the record carried a host state code outside the known range.
    #[must_use]
    pub const fn is_invalid_state_code(&self) -> bool {
        matches!(
            self,
            Self::Domain { source: verity_domain::DomainError::InvalidStateCode { .. }, .. }
        )
    }
}
