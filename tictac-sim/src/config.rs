//! Robot configuration loading

use thiserror::Error;
use tictac_core::config::{ConfigError, RobotConfig};

/// Configuration embedded at build time
///
/// Edit robot.toml and rebuild, or pass a file path on the command line.
pub const EMBEDDED_CONFIG: &str = include_str!("../robot.toml");

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(ConfigError),
}

/// Parse and validate a TOML configuration
pub fn parse_config(text: &str) -> Result<RobotConfig, ConfigLoadError> {
    let config: RobotConfig = toml::from_str(text)?;
    config.validate().map_err(ConfigLoadError::Invalid)?;
    Ok(config)
}

/// Load the configuration from `path`, or the embedded one
pub fn load_config(path: Option<&str>) -> Result<RobotConfig, ConfigLoadError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
                path: path.to_string(),
                source,
            })?;
            parse_config(&text)
        }
        None => parse_config(EMBEDDED_CONFIG),
    }
}
