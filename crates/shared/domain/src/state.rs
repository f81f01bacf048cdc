use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Link-handling state of one host for one package and user.
///
/// The discriminants are the persisted codes and never change. `Ord` follows ownership
/// precedence: `Verified` > `Selected` > `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum DomainState {
    /// Unverified and unselected; the package cannot open links for the host.
    #[default]
    None = 0,
    /// Chosen by the user. Exclusive across packages unless they are all verified.
    Selected = 1,
    /// Asserted by the verification agent. Not exclusive.
    Verified = 2,
}

impl DomainState {
    pub const ALL: [Self; 3] = [Self::None, Self::Selected, Self::Verified];

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "DOMAIN_STATE_NONE",
            Self::Selected => "DOMAIN_STATE_SELECTED",
            Self::Verified => "DOMAIN_STATE_VERIFIED",
        }
    }

    /// Diagnostic name for a raw code; unknown codes render as lowercase hex.
    #[must_use]
    pub fn describe_code(code: i32) -> String {
        Self::try_from(code).map_or_else(|_| format!("{code:x}"), |state| state.name().to_owned())
    }

    /// Whether this state lets the package auto-open links, ignoring the link-handling toggle.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Selected | Self::Verified)
    }
}

impl TryFrom<i32> for DomainState {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Selected),
            2 => Ok(Self::Verified),
            other => Err(DomainError::InvalidStateCode {
                message: other.to_string().into(),
                context: None,
            }),
        }
    }
}

impl From<DomainState> for i32 {
    fn from(state: DomainState) -> Self {
        state.code()
    }
}

impl fmt::Display for DomainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
