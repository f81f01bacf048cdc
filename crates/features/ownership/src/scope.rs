//! Ownership state of a single user.
//!
//! [`UserScope`] holds no lock. The registry wraps each scope in its own `RwLock` and calls
//! into it for exactly one logical operation per guard, which is what makes every method
//! here atomic: each one validates everything first and only then mutates.

use crate::error::OwnershipError;
use fxhash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tracing::debug;
use verity_domain::{DomainState, Host, PackageUserState, UserId, Uuid};

/// A package allowed to auto-open a host, as seen by link resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostApproval {
    pub package: String,
    pub state: DomainState,
}

#[derive(Debug, Default)]
pub(crate) struct UserScope {
    packages: FxHashMap<String, PackageUserState>,
    /// Packages whose record holds `Selected` for the host. Never contains empty sets.
    selected: FxHashMap<Host, BTreeSet<String>>,
}

fn unknown(package: &str) -> OwnershipError {
    OwnershipError::UnknownPackageState { message: package.to_owned().into(), context: None }
}

fn undeclared(package: &str, host: &Host) -> OwnershipError {
    OwnershipError::UndeclaredHost { message: format!("{host} for {package}").into(), context: None }
}

impl UserScope {
    pub(crate) fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    fn entry(&self, package: &str) -> Result<&PackageUserState, OwnershipError> {
        self.packages.get(package).ok_or_else(|| unknown(package))
    }

    /// Looks up the package and checks it declared `host`.
    fn declared_entry(
        &mut self,
        package: &str,
        host: &Host,
    ) -> Result<&mut PackageUserState, OwnershipError> {
        let state = self.packages.get_mut(package).ok_or_else(|| unknown(package))?;
        if state.state_of(host.as_str()).is_none() {
            return Err(undeclared(package, host));
        }
        Ok(state)
    }

    fn release(&mut self, package: &str, host: &Host) -> bool {
        let Some(holders) = self.selected.get_mut(host) else {
            return false;
        };
        let removed = holders.remove(package);
        if holders.is_empty() {
            self.selected.remove(host);
        }
        removed
    }

    /// Refuses `package` a share of `host` unless it and every other holder are verified.
    fn check_shared_selection(
        &self,
        package: &str,
        host: &Host,
        requester_verified: bool,
    ) -> Result<(), OwnershipError> {
        let Some(holders) = self.selected.get(host) else {
            return Ok(());
        };
        let others: Vec<&str> =
            holders.iter().map(String::as_str).filter(|holder| *holder != package).collect();
        if others.is_empty() {
            return Ok(());
        }

        let others_verified = others
            .iter()
            .all(|holder| self.packages.get(*holder).is_some_and(|s| s.is_verified(host.as_str())));
        if requester_verified && others_verified {
            return Ok(());
        }
        Err(OwnershipError::HostAlreadyOwned {
            message: host.to_string().into(),
            context: Some(format!("held by {}", others.join(", ")).into()),
        })
    }

    pub(crate) fn register(
        &mut self,
        user: UserId,
        package: &str,
        declared: BTreeSet<Host>,
        link_handling_default: bool,
    ) -> Result<Uuid, OwnershipError> {
        if let Some(existing) = self.packages.get(package) {
            let identifier = existing.identifier();
            let dropped: Vec<Host> = existing
                .host_to_state()
                .keys()
                .filter(|host| !declared.contains(*host))
                .cloned()
                .collect();

            for host in &dropped {
                self.release(package, host);
            }
            let state = self.packages.get_mut(package).ok_or_else(|| unknown(package))?;
            for host in &dropped {
                state.remove_host(host.as_str());
            }
            for host in declared {
                if state.state_of(host.as_str()).is_none() {
                    state.set_state(host, DomainState::None);
                }
            }
            debug!(%user, package, dropped = dropped.len(), "Package hosts updated");
            return Ok(identifier);
        }

        let mut state = PackageUserState::declare(package, user, declared)?;
        state.set_link_handling_allowed(link_handling_default);
        let identifier = state.identifier();
        self.packages.insert(package.to_owned(), state);
        debug!(%user, package, %identifier, "Package registered");
        Ok(identifier)
    }

    /// Installs a snapshot under the same sharing rule as [`UserScope::set_selected`].
    pub(crate) fn restore(&mut self, state: PackageUserState) -> Result<(), OwnershipError> {
        let package = state.package_name().to_owned();
        let selected: Vec<Host> = state
            .host_to_state()
            .iter()
            .filter(|(_, s)| **s == DomainState::Selected)
            .map(|(host, _)| host.clone())
            .collect();

        for host in &selected {
            self.check_shared_selection(&package, host, state.is_verified(host.as_str()))
                .map_err(|err| match err {
                    OwnershipError::HostAlreadyOwned { message, .. } => {
                        OwnershipError::HostAlreadyOwned {
                            message,
                            context: Some(format!("Restoring {package}").into()),
                        }
                    },
                    other => other,
                })?;
        }

        if let Some(previous) = self.packages.remove(&package) {
            for host in previous.host_to_state().keys() {
                self.release(&package, host);
            }
        }
        for host in selected {
            self.selected.entry(host).or_default().insert(package.clone());
        }

        debug!(user = %state.user(), package = package.as_str(), "Package state restored");
        self.packages.insert(package, state);
        Ok(())
    }

    /// Returns whether anything changed.
    pub(crate) fn set_verified(&mut self, package: &str, host: &Host) -> Result<bool, OwnershipError> {
        let state = self.declared_entry(package, host)?;
        let newly_verified = !state.is_verified(host.as_str());
        let previous = state.set_state(host.clone(), DomainState::Verified);

        if previous == Some(DomainState::Selected) {
            self.release(package, host);
        }
        Ok(newly_verified || previous != Some(DomainState::Verified))
    }

    pub(crate) fn set_selected(&mut self, package: &str, host: &Host) -> Result<(), OwnershipError> {
        let requester_verified = {
            let state = self.entry(package)?;
            if state.state_of(host.as_str()).is_none() {
                return Err(undeclared(package, host));
            }
            state.is_verified(host.as_str())
        };
        if self.selected.get(host).is_some_and(|holders| holders.contains(package)) {
            return Ok(());
        }
        self.check_shared_selection(package, host, requester_verified)?;

        let state = self.declared_entry(package, host)?;
        state.set_state(host.clone(), DomainState::Selected);
        self.selected.entry(host.clone()).or_default().insert(package.to_owned());
        Ok(())
    }

    pub(crate) fn clear_selected(&mut self, package: &str, host: &Host) -> Result<(), OwnershipError> {
        let state = self.entry(package)?;
        if state.state_of(host.as_str()) != Some(DomainState::Selected) {
            return Ok(());
        }
        let fallback = if state.is_verified(host.as_str()) {
            DomainState::Verified
        } else {
            DomainState::None
        };

        self.release(package, host);
        let state = self.declared_entry(package, host)?;
        state.set_state(host.clone(), fallback);
        Ok(())
    }

    pub(crate) fn set_link_handling_allowed(
        &mut self,
        package: &str,
        allowed: bool,
    ) -> Result<(), OwnershipError> {
        let state = self.packages.get_mut(package).ok_or_else(|| unknown(package))?;
        state.set_link_handling_allowed(allowed);
        Ok(())
    }

    pub(crate) fn remove(&mut self, package: &str) -> Result<PackageUserState, OwnershipError> {
        let state = self.packages.remove(package).ok_or_else(|| unknown(package))?;
        for host in state.host_to_state().keys() {
            self.release(package, host);
        }
        Ok(state)
    }

    pub(crate) fn snapshot(&self, package: &str) -> Result<PackageUserState, OwnershipError> {
        self.entry(package).cloned()
    }

    pub(crate) fn verified_hosts(&self, package: &str) -> Result<BTreeSet<Host>, OwnershipError> {
        self.entry(package).map(|state| state.verified_hosts().clone())
    }

    pub(crate) fn selected_owners(&self, host: &Host) -> BTreeSet<String> {
        self.selected.get(host).cloned().unwrap_or_default()
    }

    pub(crate) fn packages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.packages.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn approved(&self, host: &Host) -> Vec<HostApproval> {
        let mut approvals: Vec<HostApproval> = self
            .packages
            .iter()
            .filter(|(_, state)| state.link_handling_allowed())
            .filter_map(|(name, state)| {
                let host_state = state.state_of(host.as_str())?;
                host_state
                    .is_approved()
                    .then(|| HostApproval { package: name.clone(), state: host_state })
            })
            .collect();
        approvals.sort_by(|a, b| {
            (Reverse(a.state), &a.package).cmp(&(Reverse(b.state), &b.package))
        });
        approvals
    }
}
