//! Configuration loading.
//!
//! Loads `~/.config/swaymate/config.toml` over the hardcoded defaults.

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::errors::ConfigError;

/// Load the daemon configuration.
///
/// A missing config file yields the defaults; an unreadable or unparsable
/// config file is an error.
pub fn load() -> Result<Config, ConfigError> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let config: Config =
                toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            info!(
                event = "core.config.loaded",
                path = %path.display(),
            );
            validate(&config)?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(ConfigError::IoError { source: e }),
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("swaymate").join("config.toml"))
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.max_tracked == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "max_tracked must be at least 1".to_string(),
        });
    }
    if config.port == config.debug_port {
        return Err(ConfigError::InvalidConfiguration {
            message: "port and debug_port must differ".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = Config {
            max_tracked: 0,
            ..Config::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_validate_rejects_port_clash() {
        let config = Config {
            debug_port: 7853,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&Config::default()).is_ok());
    }
}
