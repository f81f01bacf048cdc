//! # Host Ownership
//!
//! Tracks, per user, which installed packages are approved to open links for which hosts.
//!
//! A host can be approved for a package in two ways: the verification agent proved the
//! package belongs to the host's owner (`Verified`), or the user picked the package by hand
//! (`Selected`). Any number of packages may be verified for a host. A selection is
//! exclusive unless the requester and every current holder are verified for the host.
//!
//! All state of one user sits behind one lock; different users never block each other.

mod error;
mod registry;
mod scope;

pub use crate::error::{OwnershipError, OwnershipErrorExt};
pub use crate::registry::{HostOwnershipRegistry, RegistryInner};
pub use crate::scope::HostApproval;
