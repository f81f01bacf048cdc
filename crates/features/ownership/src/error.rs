use std::borrow::Cow;

/// A specialized [`OwnershipError`] enum of this crate.
#[verity_derive::verity_error]
pub enum OwnershipError {
    /// No record exists for the (user, package) pair.
    #[error("Unknown package state{}: {message}", format_context(.context))]
    UnknownPackageState { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Another package holds the exclusive selection for the host. Expected outcome of a
    /// user action, not a fault.
    #[error("Host already owned{}: {message}", format_context(.context))]
    HostAlreadyOwned { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The package never declared the host.
    #[error("Host not declared by package{}: {message}", format_context(.context))]
    UndeclaredHost { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Domain violation{}: {source}", format_context(.context))]
    Domain { source: verity_domain::DomainError, context: Option<Cow<'static, str>> },
}

impl OwnershipError {
    /// Whether this is an ownership conflict the caller is expected to branch on.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::HostAlreadyOwned { .. })
    }
}
