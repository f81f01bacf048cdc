use anyhow::Result;
use std::io::Write;
use std::path::Path;
use verity::codec::encode;
use verity::timezone::SuggestionArgs;

pub(crate) fn run(
    out: &mut impl Write,
    suggestion: SuggestionArgs,
    json: bool,
    file: Option<&Path>,
) -> Result<()> {
    let suggestion = suggestion.into_suggestion();

    if json {
        serde_json::to_writer_pretty(&mut *out, &suggestion)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{suggestion}")?;
    }

    if let Some(path) = file {
        super::write_record(path, &encode(&suggestion))?;
    }
    Ok(())
}
