use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};
use verity_domain::config::VerityConfig;

/// Prefix of environment overrides, e.g. `VERITY__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "VERITY";

/// Custom error type for config loading.
#[verity_derive::verity_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Defaults**: whatever `T`'s `Deserialize` impl fills in for missing keys.
/// 2. **File**: `path`, if given. The format follows the extension (`.toml`, `.json`, ...).
///    A given file must exist.
/// 3. **Environment**: variables prefixed with `VERITY__`. Nested keys use double
///    underscores (e.g. `VERITY__REGISTRY__LINK_HANDLING_DEFAULT` maps to
///    `registry.link_handling_default`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or unreadable, or if the merged
/// values do not match `T`.
///
/// # Example
/// ```rust
/// use verity_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct ShellConfig {
///     #[serde(default)]
///     verbose: bool,
/// }
///
/// let cfg: ShellConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path: Option<&Path> = path.as_ref().map(|p| p.as_ref());
    load_layered(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake)
}

fn load_layered<T>(path: Option<&Path>, environment: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    } else {
        debug!("No config file given, using defaults and environment");
    }

    let config = builder
        .add_source(environment)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// [`load_config`] for the top-level [`VerityConfig`].
///
/// # Errors
/// See [`load_config`].
pub fn load_verity_config(path: Option<&Path>) -> Result<VerityConfig, ConfigError> {
    load_config(path)
}
