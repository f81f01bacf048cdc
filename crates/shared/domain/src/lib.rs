//! # Domain Models
//!
//! Pure types shared by every Verity crate: link-ownership state for packages and users,
//! the verification request envelope and geolocation time-zone suggestions.
//! Keep it lean: no I/O, locking, or encoding here. Just data and the invariants that
//! belong to a single value.

pub mod config;
mod error;
mod geolocation;
mod host;
mod package;
mod request;
mod state;

pub use crate::error::{DomainError, DomainErrorExt};
pub use crate::geolocation::{GeolocationSuggestion, SuggestionKind};
pub use crate::host::{Host, UserId};
pub use crate::package::PackageUserState;
pub use crate::request::VerificationRequest;
pub use crate::state::DomainState;
pub use uuid::Uuid;
