use anyhow::Result;
use std::io::Write;
use std::path::Path;
use verity::codec::encode;
use verity::domain::VerificationRequest;

pub(crate) fn run(out: &mut impl Write, packages: Vec<String>, file: &Path) -> Result<()> {
    let request: VerificationRequest = packages.into_iter().collect();
    super::write_record(file, &encode(&request))?;
    writeln!(
        out,
        "Verification request for {} package(s) written to {}",
        request.len(),
        file.display()
    )?;
    Ok(())
}
