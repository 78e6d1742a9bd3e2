//! Layered gateway configuration.

// Leading `::` keeps the external crate distinct from this module's path.
use ::config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use vocetta_core::TelemetryConfig;
use vocetta_error::ConfigError;
use vocetta_rate_limit::RateLimitConfig;
use vocetta_synthesis::SynthesisConfig;

/// Limits for the two admission limiter classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitSection {
    /// Limits keyed by client address
    ip: RateLimitConfig,
    /// Limits keyed by user identity
    user: RateLimitConfig,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            ip: RateLimitConfig::per_ip(),
            user: RateLimitConfig::per_user(),
        }
    }
}

/// Monthly quota enforcement switches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default, deny_unknown_fields)]
pub struct QuotaSection {
    /// Enforce per-user character budgets
    enabled: bool,
}

/// Top-level gateway configuration.
///
/// Loaded with a precedence system: bundled defaults, then
/// `~/.config/vocetta/vocetta.toml`, then `./vocetta.toml`, with later
/// sources overriding earlier ones. User files are optional and may be
/// partial. The upstream API key is deliberately not part of this file;
/// it is read from the `OPENAI_API_KEY` environment variable.
///
/// # Examples
///
/// ```no_run
/// use vocetta_server::VocettaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VocettaConfig::load()?;
/// println!("binding {}:{}", config.host(), config.port());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default, deny_unknown_fields)]
pub struct VocettaConfig {
    /// Address to bind
    host: String,
    /// Port to bind
    port: u16,
    /// Log output settings
    telemetry: TelemetryConfig,
    /// Admission limiter settings
    rate_limit: RateLimitSection,
    /// Monthly quota settings
    quota: QuotaSection,
    /// Upstream speech API settings
    synthesis: SynthesisConfig,
}

impl Default for VocettaConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            telemetry: TelemetryConfig::default(),
            rate_limit: RateLimitSection::default(),
            quota: QuotaSection::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl VocettaConfig {
    /// Load configuration from a specific file, skipping the layered lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }

    /// Load configuration with precedence: user overrides > bundled defaults.
    ///
    /// Sources in order of precedence (later overrides earlier):
    /// 1. Bundled defaults (vocetta.toml shipped with the gateway)
    /// 2. User config in the home directory (`~/.config/vocetta/vocetta.toml`)
    /// 3. User config in the current directory (`./vocetta.toml`)
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be read or the merged
    /// result does not deserialize.
    pub fn load() -> Result<Self, ConfigError> {
        const DEFAULT_CONFIG: &str = include_str!("../../../vocetta.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vocetta/vocetta.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("vocetta").required(false));

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }
}
