use crate::error::DomainError;
use crate::host::{Host, UserId};
use crate::state::DomainState;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Link-handling state of one package for one user.
///
/// Covers every web domain the package declares, whether or not it asked for automatic
/// verification. Consumers must check [`PackageUserState::link_handling_allowed`] before
/// honoring any entry of [`PackageUserState::host_to_state`]: when the user disables link
/// handling the per-host states are kept but carry no authority.
///
/// [`PackageUserState::verified_hosts`] remembers what the verification agent confirmed,
/// including hosts whose state the user has since turned into `Selected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageUserState {
    identifier: Uuid,
    package_name: String,
    user: UserId,
    link_handling_allowed: bool,
    host_to_state: BTreeMap<Host, DomainState>,
    verified_hosts: BTreeSet<Host>,
}

impl PackageUserState {
    /// Builds a snapshot from already validated parts. Hosts in state `Verified` count as
    /// verified; add verified hosts that are now `Selected` with
    /// [`PackageUserState::with_verified_hosts`].
    ///
    /// # Errors
    /// Returns [`DomainError::NullRequiredField`] if `package_name` is empty.
    pub fn new(
        identifier: Uuid,
        package_name: impl Into<String>,
        user: UserId,
        link_handling_allowed: bool,
        host_to_state: BTreeMap<Host, DomainState>,
    ) -> Result<Self, DomainError> {
        let package_name = package_name.into();
        if package_name.is_empty() {
            return Err(DomainError::NullRequiredField {
                message: "package_name".into(),
                context: None,
            });
        }
        let verified_hosts = host_to_state
            .iter()
            .filter(|(_, state)| **state == DomainState::Verified)
            .map(|(host, _)| host.clone())
            .collect();
        Ok(Self {
            identifier,
            package_name,
            user,
            link_handling_allowed,
            host_to_state,
            verified_hosts,
        })
    }

    /// Marks more hosts as verified by the agent.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidHost`] for a host the package does not declare.
    pub fn with_verified_hosts(
        mut self,
        hosts: impl IntoIterator<Item = Host>,
    ) -> Result<Self, DomainError> {
        for host in hosts {
            if !self.host_to_state.contains_key(&host) {
                return Err(DomainError::InvalidHost {
                    message: format!("{host} is verified but not declared").into(),
                    context: Some(self.package_name.clone().into()),
                });
            }
            self.verified_hosts.insert(host);
        }
        Ok(self)
    }

    /// A fresh record: new identifier, link handling on, every declared host at `None`.
    ///
    /// # Errors
    /// Returns [`DomainError::NullRequiredField`] if `package_name` is empty.
    pub fn declare(
        package_name: impl Into<String>,
        user: UserId,
        hosts: impl IntoIterator<Item = Host>,
    ) -> Result<Self, DomainError> {
        let map = hosts.into_iter().map(|host| (host, DomainState::None)).collect();
        Self::new(Uuid::new_v4(), package_name, user, true, map)
    }

    #[must_use]
    pub const fn identifier(&self) -> Uuid {
        self.identifier
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    #[must_use]
    pub const fn link_handling_allowed(&self) -> bool {
        self.link_handling_allowed
    }

    #[must_use]
    pub const fn host_to_state(&self) -> &BTreeMap<Host, DomainState> {
        &self.host_to_state
    }

    #[must_use]
    pub const fn verified_hosts(&self) -> &BTreeSet<Host> {
        &self.verified_hosts
    }

    #[must_use]
    pub fn is_verified(&self, host: &str) -> bool {
        self.verified_hosts.contains(host)
    }

    /// State for `host`, `None` when the host is not declared.
    #[must_use]
    pub fn state_of(&self, host: &str) -> Option<DomainState> {
        self.host_to_state.get(host).copied()
    }

    /// Hosts this package may auto-open right now, honoring the link-handling toggle.
    pub fn approved_hosts(&self) -> impl Iterator<Item = (&Host, DomainState)> {
        let allowed = self.link_handling_allowed;
        self.host_to_state
            .iter()
            .filter(move |(_, state)| allowed && state.is_approved())
            .map(|(host, state)| (host, *state))
    }

    pub const fn set_link_handling_allowed(&mut self, allowed: bool) {
        self.link_handling_allowed = allowed;
    }

    /// Writes a host state and returns the previous one. Writing `Verified` also marks the
    /// host as verified; other states leave the verified set alone.
    pub fn set_state(&mut self, host: Host, state: DomainState) -> Option<DomainState> {
        if state == DomainState::Verified {
            self.verified_hosts.insert(host.clone());
        }
        self.host_to_state.insert(host, state)
    }

    pub fn remove_host(&mut self, host: &str) -> Option<DomainState> {
        self.verified_hosts.remove(host);
        self.host_to_state.remove(host)
    }

    pub fn into_host_to_state(self) -> BTreeMap<Host, DomainState> {
        self.host_to_state
    }
}
