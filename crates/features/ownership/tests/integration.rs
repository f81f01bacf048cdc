use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Barrier};
use std::thread;
use verity_domain::{DomainState, Host, UserId};
use verity_ownership::*;

const USER: UserId = UserId(0);

fn host(name: &str) -> Host {
    Host::try_from(name).unwrap()
}

fn registry_with(packages: &[&str], hosts: &[&str]) -> HostOwnershipRegistry {
    let registry = HostOwnershipRegistry::default();
    for package in packages {
        registry.register_package(USER, package, hosts).unwrap();
    }
    registry
}

#[test]
fn test_second_selection_is_refused() {
    let registry = registry_with(&["com.a", "com.b"], &["example.com"]);

    registry.set_selected(USER, "com.a", "example.com").unwrap();
    let err = registry.set_selected(USER, "com.b", "example.com").unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(
        registry.selected_owners(USER, &host("example.com")),
        BTreeSet::from(["com.a".to_owned()])
    );
}

#[test]
fn test_select_then_clear_restores_the_map() {
    let registry = registry_with(&["com.a"], &["example.com", "shop.example.com"]);
    registry.set_verified(USER, "com.a", "shop.example.com").unwrap();
    let before = registry.host_to_state_map(USER, "com.a").unwrap();

    registry.set_selected(USER, "com.a", "example.com").unwrap();
    registry.set_selected(USER, "com.a", "shop.example.com").unwrap();
    registry.clear_selected(USER, "com.a", "example.com").unwrap();
    registry.clear_selected(USER, "com.a", "shop.example.com").unwrap();

    assert_eq!(registry.host_to_state_map(USER, "com.a").unwrap(), before);
}

#[test]
fn test_removed_package_releases_its_hosts() {
    let registry = registry_with(&["com.a", "com.b"], &["example.com"]);
    registry.set_selected(USER, "com.a", "example.com").unwrap();

    let removed = registry.remove_package(USER, "com.a").unwrap();
    assert_eq!(removed.state_of("example.com"), Some(DomainState::Selected));

    registry.set_selected(USER, "com.b", "example.com").unwrap();
    assert!(registry.package_state(USER, "com.a").is_err());
}

#[test]
fn test_returned_map_is_a_copy() {
    let registry = registry_with(&["com.a"], &["example.com"]);

    let mut map = registry.host_to_state_map(USER, "com.a").unwrap();
    map.insert(host("example.com"), DomainState::Selected);

    assert_eq!(
        registry.package_state(USER, "com.a").unwrap().state_of("example.com"),
        Some(DomainState::None)
    );
}

#[test]
fn test_link_toggle_hides_approvals_but_keeps_states() {
    let registry = registry_with(&["com.a"], &["example.com"]);
    registry.set_verified(USER, "com.a", "example.com").unwrap();

    registry.set_link_handling_allowed(USER, "com.a", false).unwrap();
    assert!(registry.approved_packages(USER, &host("example.com")).is_empty());
    assert_eq!(
        registry.package_state(USER, "com.a").unwrap().state_of("example.com"),
        Some(DomainState::Verified)
    );

    registry.set_link_handling_allowed(USER, "com.a", true).unwrap();
    assert_eq!(
        registry.approved_packages(USER, &host("example.com")),
        [HostApproval { package: "com.a".to_owned(), state: DomainState::Verified }]
    );
}

#[test]
fn test_users_are_isolated() {
    let registry = HostOwnershipRegistry::default();
    for user in [UserId(0), UserId(10)] {
        registry.register_package(user, "com.a", ["example.com"]).unwrap();
        registry.register_package(user, "com.b", ["example.com"]).unwrap();
    }

    registry.set_selected(UserId(0), "com.a", "example.com").unwrap();
    registry.set_selected(UserId(10), "com.b", "example.com").unwrap();

    let err = registry.set_selected(UserId(20), "com.a", "example.com").unwrap_err();
    assert!(matches!(err, OwnershipError::UnknownPackageState { .. }));
    assert!(registry.packages(UserId(20)).is_empty());
}

#[test]
fn test_restore_keeps_identifier() {
    let source = registry_with(&["com.a"], &["example.com"]);
    source.set_selected(USER, "com.a", "example.com").unwrap();
    let snapshot = source.package_state(USER, "com.a").unwrap();

    let target = HostOwnershipRegistry::default();
    target.restore_package(snapshot.clone()).unwrap();

    assert_eq!(target.package_state(USER, "com.a").unwrap(), snapshot);
    assert_eq!(
        target.selected_owners(USER, &host("example.com")),
        BTreeSet::from(["com.a".to_owned()])
    );
}

#[test]
fn test_restore_keeps_shared_verified_selection() {
    let source = registry_with(&["com.a", "com.b"], &["example.com"]);
    for package in ["com.a", "com.b"] {
        source.set_verified(USER, package, "example.com").unwrap();
        source.set_selected(USER, package, "example.com").unwrap();
    }

    let target = HostOwnershipRegistry::default();
    for package in ["com.a", "com.b"] {
        target.restore_package(source.package_state(USER, package).unwrap()).unwrap();
    }
    assert_eq!(
        target.selected_owners(USER, &host("example.com")),
        BTreeSet::from(["com.a".to_owned(), "com.b".to_owned()])
    );

    target.clear_selected(USER, "com.a", "example.com").unwrap();
    assert_eq!(
        target.host_to_state_map(USER, "com.a").unwrap(),
        BTreeMap::from([(host("example.com"), DomainState::Verified)])
    );
}

#[test]
fn test_registration_racing_user_removal_is_never_lost() {
    for _ in 0..256 {
        let registry = HostOwnershipRegistry::default();
        let barrier = Arc::new(Barrier::new(2));

        let register = {
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.register_package(USER, "com.a", ["example.com"])
            })
        };
        let remove = {
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.remove_user(USER)
            })
        };

        register.join().unwrap().unwrap();
        let removed_registration = remove.join().unwrap();

        // Either the removal saw the package, or the package is still there.
        let present = registry.packages(USER) == ["com.a"];
        assert!(present ^ removed_registration, "present={present} removed={removed_registration}");
    }
}

#[test]
fn test_concurrent_selection_has_one_winner() {
    for _ in 0..64 {
        let registry = registry_with(&["com.a", "com.b"], &["example.com"]);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = ["com.a", "com.b"]
            .into_iter()
            .map(|package| {
                let registry = registry.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.set_selected(USER, package, "example.com")
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();
        let conflicts =
            results.iter().filter(|r| r.as_ref().is_err_and(OwnershipError::is_conflict)).count();

        assert_eq!((winners, conflicts), (1, 1));
        assert_eq!(registry.selected_owners(USER, &host("example.com")).len(), 1);
    }
}
