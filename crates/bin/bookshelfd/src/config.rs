//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `bookshelf.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// API behaviour toggles.
    pub api: ApiConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Which [`BookRepository`](bookshelf_app::ports::BookRepository) backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable `SQLite` file (or `sqlite::memory:`).
    #[default]
    Sqlite,
    /// Volatile process memory.
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Validation(format!(
                "unknown storage backend `{other}`"
            ))),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Storage backend.
    pub backend: StorageBackend,
    /// `SQLite` connection URL or file path. Ignored by the memory backend.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// API behaviour toggles.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Reject `PUT` payloads that omit a required field instead of keeping
    /// the stored value.
    pub strict_put: bool,
}

impl Config {
    /// Load configuration from `bookshelf.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if an
    /// override holds an unusable value.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("bookshelf.toml")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("BOOKSHELF_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("BOOKSHELF_PORT") {
            self.server.port = parse_port("BOOKSHELF_PORT", &val)?;
        }
        if let Ok(val) = std::env::var("BOOKSHELF_BIND") {
            let (host, port) = split_bind("BOOKSHELF_BIND", &val)?;
            self.server.host = host;
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("BOOKSHELF_STORAGE") {
            self.database.backend = val.parse()?;
        }
        if let Ok(val) = std::env::var("BOOKSHELF_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("BOOKSHELF_STRICT_PUT") {
            self.api.strict_put = matches!(val.trim(), "1" | "true" | "yes" | "on");
        }
        if let Ok(val) = std::env::var("BOOKSHELF_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.backend == StorageBackend::Sqlite && self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database url must be set for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: "sqlite:bookshelf.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "bookshelfd=info,bookshelf_app=info,tower_http=debug".to_string(),
        }
    }
}

fn parse_port(var: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{var}: invalid port `{value}`")))
}

fn split_bind(var: &str, value: &str) -> Result<(String, u16), ConfigError> {
    let (host, port) = value.rsplit_once(':').ok_or_else(|| {
        ConfigError::Validation(format!("{var}: expected `host:port`, got `{value}`"))
    })?;
    Ok((host.to_string(), parse_port(var, port)?))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.backend, StorageBackend::Sqlite);
        assert_eq!(config.database.url, "sqlite:bookshelf.db?mode=rwc");
        assert!(!config.api.strict_put);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            backend = 'memory'
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [api]
            strict_put = true
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert!(config.api.strict_put);
    }

    #[test]
    fn should_reject_unknown_backend_in_toml() {
        let result: Result<Config, _> = toml::from_str("[database]\nbackend = 'postgres'");
        assert!(result.is_err());
    }

    #[test]
    fn should_parse_backend_names_case_insensitively() {
        assert_eq!(
            "Memory".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert_eq!(
            " sqlite ".parse::<StorageBackend>().unwrap(),
            StorageBackend::Sqlite
        );
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_url_for_sqlite_backend() {
        let mut config = Config::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());

        config.database.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database_url(), "sqlite:bookshelf.db?mode=rwc");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unparseable_port_override() {
        assert_eq!(parse_port("BOOKSHELF_PORT", "9090").unwrap(), 9090);
        assert!(matches!(
            parse_port("BOOKSHELF_PORT", "eighty"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            parse_port("BOOKSHELF_PORT", "70000"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_split_bind_override_into_host_and_port() {
        assert_eq!(
            split_bind("BOOKSHELF_BIND", "127.0.0.1:9000").unwrap(),
            ("127.0.0.1".to_string(), 9000)
        );
        assert!(matches!(
            split_bind("BOOKSHELF_BIND", "127.0.0.1"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            split_bind("BOOKSHELF_BIND", "127.0.0.1:http"),
            Err(ConfigError::Validation(_))
        ));
    }
}
