use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default location of the caption service
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "captionify.toml";

/// Prefix for environment overrides, e.g. `CAPTIONIFY_API_URL`
pub const ENV_PREFIX: &str = "CAPTIONIFY";

/// Configuration for the caption client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the caption service
    pub api_url: String,

    /// Optional timeout for service requests (none by default)
    pub request_timeout_secs: Option<u64>,

    /// Directory to write log files in
    pub log_dir: String,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: None,
            log_dir: "logs".to_string(),
            user_agent: format!("captionify/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, an optional TOML file and
    /// `CAPTIONIFY_*` environment variables, in increasing precedence.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!("Loaded configuration: {:?}", config);

        config.validate()?;
        Ok(config)
    }

    /// Overrides the service URL (e.g. from a command-line flag)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parsed service URL
    pub fn api_base(&self) -> Result<Url> {
        let url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid api_url: {}", self.api_url))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => bail!("Unsupported api_url scheme '{}': must be http or https", other),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.api_base()?;
        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
