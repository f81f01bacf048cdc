use serde::Deserialize;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the registry and the shell.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerityConfigInner {
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct VerityConfig {
    #[serde(flatten, default)]
    inner: Arc<VerityConfigInner>,
}

impl Deref for VerityConfig {
    type Target = VerityConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<VerityConfigInner> for VerityConfig {
    fn from(inner: VerityConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Logging output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files; file logging is off when absent.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
    /// Extra directives, e.g. `verity_ownership=debug`.
    pub env_filter: Option<String>,
}

/// Ownership registry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Link-handling toggle given to newly registered packages.
    pub link_handling_default: bool,
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
            max_files: 10,
            env_filter: None,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { link_handling_default: true }
    }
}
