use proptest::prelude::*;
use std::collections::BTreeMap;
use verity_codec::{CodecError, decode, encode};
use verity_domain::{
    DomainState, GeolocationSuggestion, Host, PackageUserState, UserId, Uuid, VerificationRequest,
};

fn package_state(hosts: &[(String, u8)], allowed: bool) -> PackageUserState {
    let map: BTreeMap<Host, DomainState> = hosts
        .iter()
        .map(|(name, code)| {
            let state = DomainState::ALL[usize::from(*code) % DomainState::ALL.len()];
            (Host::try_from(name.as_str()).unwrap(), state)
        })
        .collect();
    let selected: Vec<Host> = map
        .iter()
        .filter(|(_, state)| **state == DomainState::Selected)
        .map(|(host, _)| host.clone())
        .collect();
    PackageUserState::new(Uuid::new_v4(), "com.example.app", UserId(0), allowed, map)
        .and_then(|state| state.with_verified_hosts(selected))
        .unwrap()
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode::<PackageUserState>(&data);
        let _ = decode::<VerificationRequest>(&data);
        let _ = decode::<GeolocationSuggestion>(&data);
    }

    #[test]
    fn every_proper_prefix_of_a_record_fails(
        hosts in proptest::collection::vec(("[a-z]{1,12}\\.(com|org)", 0_u8..3), 0..6),
        allowed in any::<bool>(),
    ) {
        let bytes = encode(&package_state(&hosts, allowed));
        for cut in 0..bytes.len() {
            let err = decode::<PackageUserState>(&bytes[..cut]).unwrap_err();
            prop_assert!(
                matches!(err, CodecError::Truncated { .. } | CodecError::UnexpectedCount { .. }),
                "cut at {} gave {}", cut, err
            );
        }
    }
}
