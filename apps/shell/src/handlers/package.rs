use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::debug;
use verity::codec::encode;
use verity::domain::UserId;
use verity::ownership::HostOwnershipRegistry;

/// Host decisions to apply after registration, in order: verifications, then selections.
#[derive(Debug)]
pub(crate) struct PackageRequest {
    pub(crate) name: String,
    pub(crate) user: UserId,
    pub(crate) hosts: Vec<String>,
    pub(crate) verified: Vec<String>,
    pub(crate) selected: Vec<String>,
    pub(crate) link_handling: bool,
}

pub(crate) fn run(
    out: &mut impl Write,
    registry: &HostOwnershipRegistry,
    request: PackageRequest,
    file: &Path,
) -> Result<()> {
    let PackageRequest { name, user, hosts, verified, selected, link_handling } = request;

    let identifier = registry.register_package(user, &name, &hosts)?;
    debug!(%user, package = name.as_str(), %identifier, "Package registered");

    for host in &verified {
        registry
            .set_verified(user, &name, host)
            .with_context(|| format!("Failed to verify {host}"))?;
    }
    for host in &selected {
        registry
            .set_selected(user, &name, host)
            .with_context(|| format!("Failed to select {host}"))?;
    }
    if !link_handling {
        registry.set_link_handling_allowed(user, &name, false)?;
    }

    let state = registry.package_state(user, &name)?;
    super::write_record(file, &encode(&state))?;

    let approved = state.approved_hosts().count();
    writeln!(
        out,
        "{name} ({identifier}) for {user}: {} host(s), {approved} approved, written to {}",
        state.host_to_state().len(),
        file.display()
    )?;
    Ok(())
}
