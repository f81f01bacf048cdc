use verity_domain::config::LoggingConfig;
use verity_logger::{Logger, LoggerError};

#[test]
fn console_logger_installs_once_per_process() {
    let config = LoggingConfig::default();

    let first = Logger::from_config("verity-shell", &config).unwrap();
    assert!(!first.writes_file());

    let err = Logger::from_config("verity-shell", &config).unwrap_err();
    assert!(matches!(err, LoggerError::Subscriber { .. }), "unexpected error: {err}");
}
