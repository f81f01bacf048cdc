use std::borrow::Cow;

/// A specialized [`TimeZoneError`] enum of this crate.
#[verity_derive::verity_error]
pub enum TimeZoneError {
    /// Malformed suggestion arguments: unknown option, missing `--zone_ids` or a missing value.
    #[error("Argument parse error{}: {message}", format_context(.context))]
    ArgumentParse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<clap::Error> for TimeZoneError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let first = rendered.lines().next().unwrap_or_default();
        let message = first.strip_prefix("error: ").unwrap_or(first).to_owned();
        Self::ArgumentParse { message: message.into(), context: None }
    }
}
