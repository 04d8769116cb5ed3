//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EventHubError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_logging_config(&settings.logging)?;

    if let Some(ref email_config) = settings.email {
        validate_email_config(email_config)?;
    }

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(EventHubError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.frontend_url.is_empty() {
        return Err(EventHubError::Config(
            "Frontend URL is required for activation links".to_string()
        ));
    }

    if !config.frontend_url.starts_with("http://") && !config.frontend_url.starts_with("https://") {
        return Err(EventHubError::Config(
            "Frontend URL must start with http:// or https://".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHubError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(EventHubError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventHubError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHubError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if config.session_ttl_seconds == 0 {
        return Err(EventHubError::Config(
            "Session TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate SMTP configuration
fn validate_email_config(config: &super::EmailConfig) -> Result<()> {
    if config.smtp_host.is_empty() {
        return Err(EventHubError::Config(
            "SMTP host is required when email is configured".to_string()
        ));
    }

    if config.from_email.is_empty() || !config.from_email.contains('@') {
        return Err(EventHubError::Config(
            "A valid sender email address is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_empty_database_url() {
        let mut settings = Settings::default();
        settings.database.url = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_inverted_pool_bounds() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        settings.database.max_connections = 5;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_bad_frontend_url() {
        let mut settings = Settings::default();
        settings.server.frontend_url = "localhost:8000".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_email_config_without_sender() {
        let mut settings = Settings::default();
        settings.email = Some(crate::config::EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: "secret".to_string(),
            from_email: "not-an-address".to_string(),
            from_name: "EventHub".to_string(),
        });
        assert!(validate_settings(&settings).is_err());
    }
}
