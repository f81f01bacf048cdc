use crate::args::RecordKind;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use verity::codec::{Decode, decode};
use verity::domain::{GeolocationSuggestion, PackageUserState, VerificationRequest};

pub(crate) fn run(out: &mut impl Write, file: &Path, kind: RecordKind) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let printed = match kind {
        RecordKind::Package => print::<PackageUserState>(out, &bytes),
        RecordKind::Request => print::<VerificationRequest>(out, &bytes),
        RecordKind::Geolocation => print::<GeolocationSuggestion>(out, &bytes),
    };
    printed.with_context(|| format!("Failed to inspect {} as {kind:?}", file.display()))
}

fn print<T: Decode + Serialize>(out: &mut impl Write, bytes: &[u8]) -> Result<()> {
    let record: T = decode(bytes)?;
    serde_json::to_writer_pretty(&mut *out, &record)?;
    writeln!(out)?;
    Ok(())
}
