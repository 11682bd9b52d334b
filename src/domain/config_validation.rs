//! Configuration validation.
//!
//! Checks every config entry taframe reads before any data is loaded.

use crate::domain::error::TaframeError;
use crate::ports::config_port::ConfigPort;

/// Input roles whose default column can be remapped under `[columns]`.
pub const COLUMN_ROLES: [&str; 5] = ["open", "high", "low", "close", "volume"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TaframeError> {
    validate_index_column(config)?;
    validate_columns(config)?;
    validate_fillna(config)?;
    validate_constants(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TaframeError {
    TaframeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_index_column(config: &dyn ConfigPort) -> Result<(), TaframeError> {
    if config.has_key("data", "index_column") && config.get_text("data", "index_column").is_none()
    {
        return Err(invalid("data", "index_column", "index_column must not be empty"));
    }
    Ok(())
}

fn validate_columns(config: &dyn ConfigPort) -> Result<(), TaframeError> {
    for role in COLUMN_ROLES {
        if config.has_key("columns", role) && config.get_text("columns", role).is_none() {
            return Err(invalid("columns", role, "column name must not be empty"));
        }
    }
    Ok(())
}

fn validate_fillna(config: &dyn ConfigPort) -> Result<(), TaframeError> {
    if let Some(raw) = config.get_text("output", "fillna") {
        if raw.parse::<f64>().is_err() {
            return Err(invalid("output", "fillna", "fillna must be a number"));
        }
    }
    Ok(())
}

fn validate_constants(config: &dyn ConfigPort) -> Result<(), TaframeError> {
    let every = config.get_int("constants", "every", 1);
    if every <= 0 {
        return Err(invalid("constants", "every", "every must be positive"));
    }
    let lower = config.get_int("constants", "lower", 0);
    let upper = config.get_int("constants", "upper", lower);
    if lower > upper {
        return Err(invalid("constants", "lower", "lower must not exceed upper"));
    }
    Ok(())
}
