use std::borrow::Cow;
use verity_derive::verity_error;

#[verity_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Host already owned{}: {message}", format_context(.context))]
    HostAlreadyOwned { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: DemoError = std::io::Error::other("disk").into();
    assert!(matches!(err, DemoError::Io { context: None, .. }));
}
