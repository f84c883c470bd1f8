//! Configuration management for the wallet checker
use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::config::serialization::api_prefix_deserializer;
use crate::config::serialization::duration_milliseconds_deserializer;
use crate::resolver::resolve_base_url;

pub use crate::config::error::WalletConfigError;

mod error;
mod serialization;

/// Path prefix of the wallet endpoints when none is configured.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Request timeout, in milliseconds, when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 8000;

/// Prefix of the environment variables read by [`Settings::new`].
pub const ENV_PREFIX: &str = "VITE";

/// Top-level configuration for the wallet checker
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// Explicit origin of the wallet API. Empty values are ignored.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Path prefix of the wallet endpoints
    #[serde(deserialize_with = "api_prefix_deserializer")]
    pub api_prefix: String,
    /// Whether this is a development build, which targets the local API
    pub dev: bool,
    /// Origin of the page hosting the checker, if any
    #[serde(default)]
    pub page_origin: Option<String>,
    /// Timeout applied to every request
    #[serde(
        rename = "request_timeout_ms",
        deserialize_with = "duration_milliseconds_deserializer"
    )]
    pub request_timeout: Duration,
}

impl Settings {
    /// Initializing the config with default values, then the optional config
    /// file, and finally any `VITE_` prefixed environment variables:
    ///
    /// ```text
    /// VITE_API_BASE_URL
    /// ^^^^ ^^^^^^^^^^^^
    ///   │ ^     └ The `api_base_url` field of `Settings`
    ///   │ └ prefix_separator("_")
    ///   └ with_prefix("VITE")
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        Self::load(config_path, environment())
    }

    fn load(
        config_path: Option<impl AsRef<Path>>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let mut cfg_builder = Config::builder();

        cfg_builder = cfg_builder.set_default("api_prefix", DEFAULT_API_PREFIX)?;
        cfg_builder = cfg_builder.set_default("dev", false)?;
        cfg_builder = cfg_builder.set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// The origin every request is sent to.
    pub fn base_url(&self) -> String {
        resolve_base_url(
            self.api_base_url.as_deref(),
            self.dev,
            self.page_origin.as_deref(),
        )
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let origins = [
            ("api_base_url", &self.api_base_url),
            ("page_origin", &self.page_origin),
        ];
        for (field, value) in origins {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                validate_origin(field, value.trim())
                    .map_err(|err| ConfigError::Message(err.to_string()))?;
            }
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Message(
                WalletConfigError::ZeroDurationForbidden("request_timeout_ms").to_string(),
            ));
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .try_parsing(true)
}

fn validate_origin(field: &'static str, value: &str) -> Result<(), WalletConfigError> {
    let url = Url::parse(value).map_err(|err| WalletConfigError::InvalidUrl(field, err))?;

    if !["http", "https"].contains(&url.scheme()) {
        return Err(WalletConfigError::InvalidUrlScheme(
            field,
            url.scheme().to_string(),
        ));
    }

    if url.host_str().is_none() {
        return Err(WalletConfigError::UrlHostRequired(field));
    }

    Ok(())
}
