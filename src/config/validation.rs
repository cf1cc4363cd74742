use crate::config::types::{CanonicalRules, Config, FrontierConfig};
use crate::ConfigError;

/// Upper bound on concurrent replay workers
const MAX_WORKERS: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_frontier_config(&config.frontier)?;
    validate_canonical_rules(&config.canonical)?;
    Ok(())
}

/// Validates frontier configuration
fn validate_frontier_config(config: &FrontierConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.progress_interval == 0 {
        return Err(ConfigError::Validation(
            "progress_interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates canonicalization rules
fn validate_canonical_rules(rules: &CanonicalRules) -> Result<(), ConfigError> {
    for param in &rules.tracking_params {
        validate_param_name(param)?;
    }
    Ok(())
}

/// Validates a query parameter name (letters, digits, `_`, `-`, `.`)
fn validate_param_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Tracking parameter name cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Tracking parameter '{}' contains invalid characters",
            name
        )));
    }

    Ok(())
}
