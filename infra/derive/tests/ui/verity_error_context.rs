use std::borrow::Cow;
use verity_derive::verity_error;

#[verity_error]
pub enum DemoError {
    #[error("Unknown package state{}: {message}", format_context(.context))]
    UnknownPackageState { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn lookup() -> Result<(), DemoError> {
    Err(DemoError::UnknownPackageState { message: "com.example".into(), context: None })
}

fn main() {
    let err = lookup().context("user 0").unwrap_err();
    assert_eq!(err.to_string(), "Unknown package state (user 0): com.example");
}
