use crate::error::{OwnershipError, OwnershipErrorExt};
use crate::scope::{HostApproval, UserScope};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info};
use verity_domain::config::RegistryConfig;
use verity_domain::{DomainState, Host, PackageUserState, UserId, Uuid};

/// The internal shared state of a [`HostOwnershipRegistry`].
#[derive(Debug, Default)]
pub struct RegistryInner {
    pub(crate) config: RegistryConfig,
    /// Read-locked for the whole of every operation, so a scope is never detached while in
    /// use. Write-locked only to add or drop a user.
    users: RwLock<FxHashMap<UserId, RwLock<UserScope>>>,
}

/// Cross-package index of which packages may open links for a host, per user.
///
/// Every mutation takes the user's write lock for the whole check-then-write, so the
/// "single selected owner unless all owners are verified" rule is never observable as
/// broken. Snapshot reads take the read lock and copy. Users only contend while a user is
/// being added or dropped.
///
/// The handle is reference-counted and cheap to clone across threads.
///
/// # Example
///
/// ```rust
/// use verity_domain::UserId;
/// use verity_ownership::{HostOwnershipRegistry, OwnershipError};
///
/// # fn main() -> Result<(), OwnershipError> {
/// let registry = HostOwnershipRegistry::default();
/// let user = UserId(0);
/// registry.register_package(user, "com.example.mail", ["example.com"])?;
/// registry.register_package(user, "com.example.web", ["example.com"])?;
///
/// registry.set_selected(user, "com.example.mail", "example.com")?;
/// let err = registry.set_selected(user, "com.example.web", "example.com").unwrap_err();
/// assert!(err.is_conflict());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HostOwnershipRegistry {
    inner: Arc<RegistryInner>,
}

impl Deref for HostOwnershipRegistry {
    type Target = RegistryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

fn parse_host(host: impl AsRef<str>) -> Result<Host, OwnershipError> {
    Host::try_from(host.as_ref()).context("Parsing host")
}

fn unknown_user(user: UserId, package: &str) -> OwnershipError {
    OwnershipError::UnknownPackageState {
        message: package.to_owned().into(),
        context: Some(format!("No state for user {user}").into()),
    }
}

impl HostOwnershipRegistry {
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self { inner: Arc::new(RegistryInner { config, users: RwLock::default() }) }
    }

    fn write<T>(
        &self,
        user: UserId,
        package: &str,
        op: impl FnOnce(&mut UserScope) -> Result<T, OwnershipError>,
    ) -> Result<T, OwnershipError> {
        let users = self.users.read();
        let scope = users.get(&user).ok_or_else(|| unknown_user(user, package))?;
        let mut guard = scope.write();
        op(&mut guard)
    }

    fn read<T>(
        &self,
        user: UserId,
        package: &str,
        op: impl FnOnce(&UserScope) -> Result<T, OwnershipError>,
    ) -> Result<T, OwnershipError> {
        let users = self.users.read();
        let scope = users.get(&user).ok_or_else(|| unknown_user(user, package))?;
        let guard = scope.read();
        op(&guard)
    }

    fn read_or_default<T: Default>(&self, user: UserId, op: impl FnOnce(&UserScope) -> T) -> T {
        self.users.read().get(&user).map(|scope| op(&scope.read())).unwrap_or_default()
    }

    /// Like [`Self::write`], creating the user's scope when needed. A scope created here is
    /// dropped again if `op` fails and leaves it empty.
    fn write_or_create<T>(
        &self,
        user: UserId,
        op: impl FnOnce(&mut UserScope) -> Result<T, OwnershipError>,
    ) -> Result<T, OwnershipError> {
        let users = self.users.read();
        if let Some(scope) = users.get(&user) {
            let mut guard = scope.write();
            return op(&mut guard);
        }
        drop(users);

        let mut users = self.users.write();
        let scope = users.entry(user).or_default().get_mut();
        let result = op(scope);
        if result.is_err() && scope.is_empty() {
            users.remove(&user);
        }
        result
    }

    /// Drops the user's scope if it holds no package.
    fn prune(&self, user: UserId) {
        let mut users = self.users.write();
        if users.get_mut(&user).is_some_and(|scope| scope.get_mut().is_empty()) {
            users.remove(&user);
            debug!(%user, "Empty user scope dropped");
        }
    }

    /// Creates or updates the record of `package` for `user`.
    ///
    /// A new record starts with link handling at the configured default and every declared
    /// host at [`DomainState::None`]. An existing record keeps its identifier and the
    /// states of hosts that are still declared; hosts no longer declared are dropped and
    /// any selection they held is released.
    ///
    /// # Errors
    /// Returns [`OwnershipError::Domain`] for an empty package name or host.
    pub fn register_package<I, H>(
        &self,
        user: UserId,
        package: &str,
        declared_hosts: I,
    ) -> Result<Uuid, OwnershipError>
    where
        I: IntoIterator<Item = H>,
        H: AsRef<str>,
    {
        let declared =
            declared_hosts.into_iter().map(parse_host).collect::<Result<BTreeSet<_>, _>>()?;
        let link_handling_default = self.config.link_handling_default;
        self.write_or_create(user, |scope| {
            scope.register(user, package, declared, link_handling_default)
        })
    }

    /// Installs a previously persisted snapshot, replacing any record of the same package.
    ///
    /// # Errors
    /// Returns [`OwnershipError::HostAlreadyOwned`] if a host the snapshot marks as
    /// selected is held by another package. Nothing is applied in that case.
    pub fn restore_package(&self, state: PackageUserState) -> Result<(), OwnershipError> {
        self.write_or_create(state.user(), |scope| scope.restore(state))
    }

    /// Records that the verification agent verified `host` for `package`.
    ///
    /// Verification is additive: other packages keep their selected or verified state.
    /// Repeating the call is a no-op.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] or [`OwnershipError::UndeclaredHost`].
    pub fn set_verified(
        &self,
        user: UserId,
        package: &str,
        host: impl AsRef<str>,
    ) -> Result<(), OwnershipError> {
        let host = parse_host(host)?;
        let changed = self.write(user, package, |scope| scope.set_verified(package, &host))?;
        if changed {
            debug!(%user, package, %host, "Host verified");
        }
        Ok(())
    }

    /// Grants the user selection of `host` to `package`.
    ///
    /// # Errors
    /// Returns [`OwnershipError::HostAlreadyOwned`] when another package holds the
    /// selection and not every party is verified for the host.
    pub fn set_selected(
        &self,
        user: UserId,
        package: &str,
        host: impl AsRef<str>,
    ) -> Result<(), OwnershipError> {
        let host = parse_host(host)?;
        self.write(user, package, |scope| scope.set_selected(package, &host))
            .inspect(|_| debug!(%user, package, %host, "Host selected"))
            .inspect_err(|err| {
                if err.is_conflict() {
                    debug!(%user, package, %host, error = %err, "Selection refused");
                }
            })
    }

    /// Withdraws the user selection; the record falls back to `Verified` or `None`.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] for an unknown package.
    pub fn clear_selected(
        &self,
        user: UserId,
        package: &str,
        host: impl AsRef<str>,
    ) -> Result<(), OwnershipError> {
        let host = parse_host(host)?;
        self.write(user, package, |scope| scope.clear_selected(package, &host))
    }

    /// Toggles link handling. Host states are left as they are; readers must check
    /// [`PackageUserState::link_handling_allowed`] before honoring them.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] for an unknown package.
    pub fn set_link_handling_allowed(
        &self,
        user: UserId,
        package: &str,
        allowed: bool,
    ) -> Result<(), OwnershipError> {
        self.write(user, package, |scope| scope.set_link_handling_allowed(package, allowed))?;
        debug!(%user, package, allowed, "Link handling toggled");
        Ok(())
    }

    /// Copy of the host states of `package`. Mutating it never touches the registry.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] for an unknown package.
    pub fn host_to_state_map(
        &self,
        user: UserId,
        package: &str,
    ) -> Result<BTreeMap<Host, DomainState>, OwnershipError> {
        self.package_state(user, package).map(PackageUserState::into_host_to_state)
    }

    /// Full snapshot of the record, e.g. for the codec.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] for an unknown package.
    pub fn package_state(
        &self,
        user: UserId,
        package: &str,
    ) -> Result<PackageUserState, OwnershipError> {
        self.read(user, package, |scope| scope.snapshot(package))
    }

    /// Hosts the agent verified for `package`, including ones the user has since selected.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] for an unknown package.
    pub fn verified_hosts(
        &self,
        user: UserId,
        package: &str,
    ) -> Result<BTreeSet<Host>, OwnershipError> {
        self.read(user, package, |scope| scope.verified_hosts(package))
    }

    /// Packages currently holding the user selection of `host`.
    #[must_use]
    pub fn selected_owners(&self, user: UserId, host: &Host) -> BTreeSet<String> {
        self.read_or_default(user, |scope| scope.selected_owners(host))
    }

    /// Who would open `host` for `user`: packages with link handling allowed whose state is
    /// `Verified` or `Selected`, verified ones first, then by name.
    #[must_use]
    pub fn approved_packages(&self, user: UserId, host: &Host) -> Vec<HostApproval> {
        self.read_or_default(user, |scope| scope.approved(host))
    }

    /// Package names with a record for `user`, sorted.
    #[must_use]
    pub fn packages(&self, user: UserId) -> Vec<String> {
        self.read_or_default(user, UserScope::packages)
    }

    /// Deletes the record and releases every selection it held. A user left without
    /// packages is dropped.
    ///
    /// # Errors
    /// Returns [`OwnershipError::UnknownPackageState`] for an unknown package.
    pub fn remove_package(
        &self,
        user: UserId,
        package: &str,
    ) -> Result<PackageUserState, OwnershipError> {
        let (removed, now_empty) = self.write(user, package, |scope| {
            scope.remove(package).map(|state| (state, scope.is_empty()))
        })?;
        debug!(%user, package, "Package removed");
        if now_empty {
            self.prune(user);
        }
        Ok(removed)
    }

    /// Drops every record of `user`. Returns whether the user had any state.
    pub fn remove_user(&self, user: UserId) -> bool {
        let removed = self.users.write().remove(&user);
        let had_state = removed.is_some_and(|scope| !scope.into_inner().is_empty());
        info!(%user, had_state, "User state removed");
        had_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_is_unknown_package_state() {
        let registry = HostOwnershipRegistry::default();
        let err = registry.set_selected(UserId(7), "com.example", "example.com").unwrap_err();
        assert!(matches!(err, OwnershipError::UnknownPackageState { .. }));
    }

    #[test]
    fn config_default_applies_to_new_packages() {
        let registry =
            HostOwnershipRegistry::new(RegistryConfig { link_handling_default: false });
        registry.register_package(UserId(0), "com.example", ["example.com"]).unwrap();
        assert!(!registry.package_state(UserId(0), "com.example").unwrap().link_handling_allowed());
    }

    #[test]
    fn empty_host_is_a_domain_error() {
        let registry = HostOwnershipRegistry::default();
        let err = registry.register_package(UserId(0), "com.example", [""]).unwrap_err();
        assert!(matches!(err, OwnershipError::Domain { .. }));
    }

    #[test]
    fn remove_user_drops_everything() {
        let registry = HostOwnershipRegistry::default();
        registry.register_package(UserId(3), "com.example", ["example.com"]).unwrap();

        assert!(registry.remove_user(UserId(3)));
        assert!(registry.packages(UserId(3)).is_empty());
        assert!(!registry.remove_user(UserId(3)));
    }

    #[test]
    fn last_package_removal_drops_the_user() {
        let registry = HostOwnershipRegistry::default();
        registry.register_package(UserId(3), "com.a", ["example.com"]).unwrap();
        registry.register_package(UserId(3), "com.b", ["example.com"]).unwrap();

        registry.remove_package(UserId(3), "com.a").unwrap();
        assert!(registry.users.read().contains_key(&UserId(3)));

        registry.remove_package(UserId(3), "com.b").unwrap();
        assert!(registry.users.read().is_empty());
    }

    #[test]
    fn failed_first_registration_leaves_no_user() {
        let registry = HostOwnershipRegistry::default();
        registry.register_package(UserId(4), "", ["example.com"]).unwrap_err();
        assert!(registry.users.read().is_empty());
    }
}
