//! # Time Zone Suggestions
//!
//! Builds [`GeolocationSuggestion`]s from shell-style argument lists, for injecting test
//! suggestions into a running detector:
//!
//! ```text
//! --zone_ids UNCERTAIN                       no opinion
//! --zone_ids EMPTY                           opinionated, no zone here
//! --zone_ids America/Denver,America/Phoenix  preferred zone first
//! ```
//!
//! ```rust
//! use verity_domain::SuggestionKind;
//!
//! let suggestion = verity_timezone::parse_command_line_args(["--zone_ids", "EMPTY"]).unwrap();
//! assert_eq!(suggestion.kind(), SuggestionKind::NoZone);
//! ```

mod command_line;
mod error;

pub use crate::command_line::{
    COMMAND_LINE_MARKER, SuggestionArgs, parse_command_line_args, parse_zone_ids_arg,
    print_command_line_opts,
};
pub use crate::error::{TimeZoneError, TimeZoneErrorExt};
pub use verity_domain::GeolocationSuggestion;
