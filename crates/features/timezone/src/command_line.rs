use crate::error::{TimeZoneError, TimeZoneErrorExt};
use clap::{Args, Parser};
use std::ffi::OsString;
use std::io::{self, Write};
use tracing::debug;
use verity_domain::GeolocationSuggestion;

/// Debug entry attached to every suggestion built from arguments.
pub const COMMAND_LINE_MARKER: &str = "Command line injection";

const UNCERTAIN: &str = "UNCERTAIN";
const EMPTY: &str = "EMPTY";

/// Arguments describing a geolocation suggestion.
///
/// Embeddable in a larger command line with `#[command(flatten)]`.
#[derive(Debug, Clone, Args)]
pub struct SuggestionArgs {
    /// UNCERTAIN, EMPTY, or a comma-separated list of Olson zone ids
    #[arg(
        long = "zone_ids",
        value_name = "UNCERTAIN|EMPTY|<Olson ID>+",
        allow_hyphen_values = true
    )]
    pub zone_ids: String,
}

impl SuggestionArgs {
    #[must_use]
    pub fn into_suggestion(self) -> GeolocationSuggestion {
        let suggestion = GeolocationSuggestion::new(parse_zone_ids_arg(&self.zone_ids))
            .with_debug_info(COMMAND_LINE_MARKER);
        debug!(suggestion = %suggestion, "Suggestion built from arguments");
        suggestion
    }
}

/// Stand-alone argument list, as handed over by a shell command dispatcher.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
struct SuggestionCommandLine {
    #[command(flatten)]
    args: SuggestionArgs,
}

/// Interprets a `--zone_ids` value.
///
/// `UNCERTAIN` is no opinion, `EMPTY` is an opinionated empty list. Anything else is split on
/// commas in order; empty tokens are skipped and nothing is trimmed or deduplicated.
#[must_use]
pub fn parse_zone_ids_arg(value: &str) -> Option<Vec<String>> {
    match value {
        UNCERTAIN => None,
        EMPTY => Some(Vec::new()),
        list => Some(
            list.split(',').filter(|token| !token.is_empty()).map(str::to_owned).collect(),
        ),
    }
}

/// Builds a suggestion from an argument list such as `["--zone_ids", "Europe/Paris"]`.
///
/// The last `--zone_ids` wins when repeated.
///
/// # Errors
/// Returns [`TimeZoneError::ArgumentParse`] for an unknown option, a missing `--zone_ids` or a
/// `--zone_ids` without value.
pub fn parse_command_line_args<I, T>(args: I) -> Result<GeolocationSuggestion, TimeZoneError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let parsed = SuggestionCommandLine::try_parse_from(args)
        .map_err(TimeZoneError::from)
        .context("Geolocation suggestion")?;
    Ok(parsed.args.into_suggestion())
}

/// Writes the option summary shown by shell help.
///
/// # Errors
/// Propagates write failures of `out`.
pub fn print_command_line_opts(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Geolocation suggestion options:")?;
    writeln!(out, "  --zone_ids {{{UNCERTAIN}|{EMPTY}|<Olson ID>+}}")?;
    writeln!(out)?;
    writeln!(out, "See verity_domain::GeolocationSuggestion for more information")
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::SuggestionKind;

    #[test]
    fn uncertain_has_no_zones() {
        let suggestion = parse_command_line_args(["--zone_ids", "UNCERTAIN"]).unwrap();
        assert_eq!(suggestion.kind(), SuggestionKind::Uncertain);
        assert_eq!(suggestion.debug_info(), [COMMAND_LINE_MARKER]);
    }

    #[test]
    fn empty_is_opinionated() {
        let suggestion = parse_command_line_args(["--zone_ids", "EMPTY"]).unwrap();
        assert_eq!(suggestion.kind(), SuggestionKind::NoZone);
    }

    #[test]
    fn list_keeps_order() {
        let suggestion =
            parse_command_line_args(["--zone_ids", "America/Denver,America/Phoenix"]).unwrap();
        assert_eq!(suggestion, GeolocationSuggestion::certain(["America/Denver", "America/Phoenix"]));
    }

    #[test]
    fn empty_tokens_are_skipped() {
        assert_eq!(
            parse_zone_ids_arg(",Europe/Paris,,Europe/Berlin,"),
            Some(vec!["Europe/Paris".to_owned(), "Europe/Berlin".to_owned()])
        );
        assert_eq!(parse_zone_ids_arg(" Europe/Paris"), Some(vec![" Europe/Paris".to_owned()]));
        assert_eq!(parse_zone_ids_arg("uncertain"), Some(vec!["uncertain".to_owned()]));
    }

    #[test]
    fn unknown_option_is_named() {
        let err = parse_command_line_args(["--zone_ids", "EMPTY", "--bogus"]).unwrap_err();
        assert!(matches!(err, TimeZoneError::ArgumentParse { .. }));
        assert!(err.to_string().contains("--bogus"), "unexpected message: {err}");
    }

    #[test]
    fn missing_zone_ids_is_an_error() {
        let err = parse_command_line_args(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, TimeZoneError::ArgumentParse { .. }));
        assert!(parse_command_line_args(["--zone_ids"]).is_err());
    }

    #[test]
    fn last_zone_ids_wins() {
        let suggestion =
            parse_command_line_args(["--zone_ids", "EMPTY", "--zone_ids", "UNCERTAIN"]).unwrap();
        assert_eq!(suggestion.kind(), SuggestionKind::Uncertain);
    }

    #[test]
    fn help_lists_grammar() {
        let mut out = Vec::new();
        print_command_line_opts(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--zone_ids {UNCERTAIN|EMPTY|<Olson ID>+}"));
    }
}
