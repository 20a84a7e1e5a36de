use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - OMDb section (if present) has an API key and a non-zero timeout
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(omdb) = &config.omdb {
        if omdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "omdb.api_key cannot be empty".to_string(),
            ));
        }
        if omdb.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "omdb.timeout_secs must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OmdbConfig, ServerConfig};
    use std::net::IpAddr;

    fn omdb(api_key: &str, timeout_secs: u32) -> OmdbConfig {
        OmdbConfig {
            api_key: api_key.to_string(),
            base_url: "http://www.omdbapi.com/".to_string(),
            timeout_secs,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_blank_omdb_key_fails() {
        let config = Config {
            omdb: Some(omdb("   ", 10)),
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            omdb: Some(omdb("key", 0)),
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_omdb_ok() {
        let config = Config {
            omdb: Some(omdb("key", 10)),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
