//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{HeraldConfig, LogOutput, LoggingConfig, StreamConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &HeraldConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_stream_config(&config.stream)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is 'file'",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter target: '{module}'"
        )));
    }

    Ok(())
}

fn validate_stream_config(stream: &StreamConfig) -> ConfigResult<()> {
    if stream.channel_capacity == 0 {
        return Err(ConfigError::validation(
            "stream.channel_capacity must be greater than 0",
        ));
    }

    if stream.frame_preview_len == 0 {
        return Err(ConfigError::validation(
            "stream.frame_preview_len must be greater than 0",
        ));
    }

    Ok(())
}
