//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Budget progress status thresholds.
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin (development default).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Budget progress status thresholds, in whole percent.
///
/// These tiers drive UI color-coding only; the over-budget flag is computed
/// independently of them.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProgressConfig {
    /// Percent-used at or above which status becomes "warning".
    #[serde(default = "default_warning_percent")]
    pub warning_percent: u32,
    /// Percent-used above which status becomes "critical".
    #[serde(default = "default_critical_percent")]
    pub critical_percent: u32,
}

fn default_warning_percent() -> u32 {
    70
}

fn default_critical_percent() -> u32 {
    90
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            warning_percent: default_warning_percent(),
            critical_percent: default_critical_percent(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_defaults() {
        let progress = ProgressConfig::default();
        assert_eq!(progress.warning_percent, 70);
        assert_eq!(progress.critical_percent, 90);
    }

    #[test]
    fn test_cors_default_is_open() {
        let cors = CorsConfig::default();
        assert!(cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let json = serde_json::json!({
            "server": {},
            "database": { "url": "postgres://localhost/fintrack" },
            "jwt": { "secret": "s3cret" }
        });
        let config: AppConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.access_token_expiry_secs, 900);
        assert_eq!(config.progress.warning_percent, 70);
    }
}
