use crate::error::{CodecError, CodecErrorExt};
use crate::flags::{PackageFlags, SuggestionFlags};
use crate::wire::{WireReader, WireWriter};
use crate::{Decode, Encode};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;
use verity_domain::{
    DomainState, GeolocationSuggestion, Host, PackageUserState, UserId, VerificationRequest,
};

/// Host string prefix plus the state code.
const MIN_HOST_ENTRY: usize = 4 + 4;
/// Length prefix of an empty string.
const MIN_STRING: usize = 4;

fn read_flags<F>(reader: &mut WireReader<'_>, what: &'static str) -> Result<F, CodecError>
where
    F: bitflags::Flags<Bits = u8>,
{
    let bits = reader.read_u8(what)?;
    F::from_bits(bits).ok_or_else(|| CodecError::InvalidFlags {
        message: format!("{what}: {bits:#04x}").into(),
        context: None,
    })
}

fn null_required(what: &'static str) -> CodecError {
    CodecError::from(verity_domain::DomainError::NullRequiredField {
        message: what.into(),
        context: None,
    })
}

fn duplicate(what: &'static str, key: &str) -> CodecError {
    CodecError::UnexpectedCount {
        message: format!("{what}: duplicate entry '{key}'").into(),
        context: None,
    }
}

impl Encode for PackageUserState {
    fn encode_to(&self, writer: &mut WireWriter) {
        let mut flags = PackageFlags::empty();
        flags.set(PackageFlags::LINK_HANDLING_ALLOWED, self.link_handling_allowed());

        writer.write_u8(flags.bits());
        writer.write_uuid(self.identifier());
        writer.write_str(self.package_name());
        writer.write_i32(self.user().0);
        writer.write_len(self.host_to_state().len());
        for (host, state) in self.host_to_state() {
            writer.write_str(host.as_str());
            writer.write_i32(state.code());
        }
        writer.write_str_list(self.verified_hosts().iter().map(Host::as_str));
    }
}

impl Decode for PackageUserState {
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let flags: PackageFlags = read_flags(reader, "package flags")?;
        let identifier = reader.read_uuid("identifier")?;
        let package_name = reader.read_str("package_name")?;
        let user = UserId(reader.read_i32("user")?);

        let count = reader
            .read_len(MIN_HOST_ENTRY, "host_to_state")?
            .ok_or_else(|| null_required("host_to_state"))?;

        let mut host_to_state = BTreeMap::new();
        for _ in 0..count {
            let raw_host = reader.read_str("host")?;
            let host = Host::try_from(raw_host.as_str()).context("Reading host_to_state")?;
            let code = reader.read_i32("state")?;
            let state = DomainState::try_from(code)
                .context(format!("Reading state of '{host}' for {package_name}"))?;
            if host_to_state.insert(host, state).is_some() {
                return Err(duplicate("host_to_state", &raw_host));
            }
        }

        let verified_count = reader
            .read_len(MIN_STRING, "verified_hosts")?
            .ok_or_else(|| null_required("verified_hosts"))?;
        let mut verified_hosts = BTreeSet::new();
        for _ in 0..verified_count {
            let raw_host = reader.read_str("verified host")?;
            let host = Host::try_from(raw_host.as_str()).context("Reading verified_hosts")?;
            if !verified_hosts.insert(host) {
                return Err(duplicate("verified_hosts", &raw_host));
            }
        }

        trace!(package = %package_name, %user, hosts = count, "Decoded package state");
        PackageUserState::new(
            identifier,
            package_name,
            user,
            flags.contains(PackageFlags::LINK_HANDLING_ALLOWED),
            host_to_state,
        )
        .and_then(|state| state.with_verified_hosts(verified_hosts))
        .context("Building package state")
    }
}

impl Encode for VerificationRequest {
    fn encode_to(&self, writer: &mut WireWriter) {
        writer.write_u8(0);
        writer.write_str_list(self.package_names().iter().map(String::as_str));
    }
}

impl Decode for VerificationRequest {
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let flags = reader.read_u8("request flags")?;
        if flags != 0 {
            return Err(CodecError::InvalidFlags {
                message: format!("request flags: {flags:#04x}").into(),
                context: None,
            });
        }

        let names = match reader.read_len(MIN_STRING, "package_names")? {
            None => None,
            Some(count) => {
                let mut names = BTreeSet::new();
                for _ in 0..count {
                    let name = reader.read_str("package_name")?;
                    if names.contains(&name) {
                        return Err(duplicate("package_names", &name));
                    }
                    names.insert(name);
                }
                Some(names)
            },
        };

        Self::try_from(names).context("Reading verification request")
    }
}

impl Encode for GeolocationSuggestion {
    fn encode_to(&self, writer: &mut WireWriter) {
        let mut flags = SuggestionFlags::empty();
        flags.set(SuggestionFlags::HAS_ZONE_IDS, self.zone_ids().is_some());

        writer.write_u8(flags.bits());
        if let Some(zones) = self.zone_ids() {
            writer.write_str_list(zones.iter().map(String::as_str));
        }
        writer.write_str_list(self.debug_info().iter().map(String::as_str));
    }
}

impl Decode for GeolocationSuggestion {
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let flags: SuggestionFlags = read_flags(reader, "suggestion flags")?;

        let zone_ids = if flags.contains(SuggestionFlags::HAS_ZONE_IDS) {
            let zones = reader.read_opt_str_list("zone_ids")?;
            if zones.is_none() {
                return Err(CodecError::UnexpectedCount {
                    message: "zone_ids flagged present but encoded as null".into(),
                    context: None,
                });
            }
            zones
        } else {
            None
        };
        let debug_info = reader.read_opt_str_list("debug_info")?.ok_or_else(|| {
            CodecError::UnexpectedCount {
                message: "debug_info encoded as null".into(),
                context: None,
            }
        })?;

        let mut suggestion = Self::new(zone_ids);
        suggestion.add_debug_info(debug_info);
        Ok(suggestion)
    }
}
