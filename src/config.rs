//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Port the service listens on when `INTAKE_PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 5001;

/// Server configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    pub port: u16,
    /// JSON file holding the conversation scripts. `None` means an empty corpus.
    pub scripts_path: Option<PathBuf>,
    /// JSON object of label → advisory. `None` selects the built-in table.
    pub guidelines_path: Option<PathBuf>,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            scripts_path: None,
            guidelines_path: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("INTAKE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = std::env::var("INTAKE_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let scripts_path = std::env::var("INTAKE_SCRIPTS_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let guidelines_path = std::env::var("INTAKE_GUIDELINES_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cors_origins = parse_origins(&std::env::var("INTAKE_CORS_ORIGINS").unwrap_or_default());

        Self {
            host,
            port,
            scripts_path,
            guidelines_path,
            cors_origins,
        }
    }

    /// Reject values that parse but cannot be served.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INTAKE_PORT".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "INTAKE_HOST".to_string(),
                message: "host must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address string for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated origin list. `*` anywhere means any origin.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5001);
        assert!(config.scripts_path.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:5001");
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("INTAKE_PORT"));
    }

    #[test]
    fn origins_parse_and_wildcard_collapses() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("http://a.test,*").is_empty());
        assert!(parse_origins("").is_empty());
    }
}
