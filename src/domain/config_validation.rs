//! Configuration validation.
//!
//! Validates all config fields before any data is touched.

use crate::domain::error::MatraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// How a `run` invocation uses the window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Single,
    Optimize,
}

impl RunMode {
    pub fn parse(value: &str) -> Option<RunMode> {
        match value.trim().to_lowercase().as_str() {
            "single" => Some(RunMode::Single),
            "optimize" => Some(RunMode::Optimize),
            _ => None,
        }
    }
}

/// Mode named in the config, defaulting to single when the key is absent.
pub fn resolve_mode(config: &dyn ConfigPort) -> Result<RunMode, MatraderError> {
    match config.get_string("strategy", "mode") {
        None => Ok(RunMode::Single),
        Some(s) => RunMode::parse(&s).ok_or_else(|| MatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "mode".to_string(),
            reason: format!("unknown mode '{}', expected single or optimize", s.trim()),
        }),
    }
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    validate_path(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    resolve_mode(config)?;
    validate_windows(config)?;
    validate_risk_free_rate(config)?;
    validate_periods_per_year(config)?;
    Ok(())
}

pub fn validate_optimize_config(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    validate_window_range(config, "fast_start", "fast_stop", "fast_step", 10, 60, 5)?;
    validate_window_range(config, "slow_start", "slow_stop", "slow_step", 100, 250, 10)?;
    Ok(())
}

fn validate_path(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MatraderError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    let start_str = config.get_string("data", "start_date");
    let end_str = config.get_string("data", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(MatraderError::ConfigInvalid {
            section: "data".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, MatraderError> {
    match value {
        None => Err(MatraderError::ConfigMissing {
            section: "data".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| MatraderError::ConfigInvalid {
                section: "data".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    let fast = config.get_int("strategy", "fast_window", 50);
    if fast < 1 {
        return Err(MatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "fast_window".to_string(),
            reason: "fast_window must be at least 1".to_string(),
        });
    }
    let slow = config.get_int("strategy", "slow_window", 200);
    if slow < 1 {
        return Err(MatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "slow_window".to_string(),
            reason: "slow_window must be at least 1".to_string(),
        });
    }
    if fast >= slow {
        return Err(MatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "fast_window".to_string(),
            reason: "fast_window must be less than slow_window".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    let value = config.get_double("strategy", "risk_free_rate", 0.0);
    if value < 0.0 || value >= 1.0 {
        return Err(MatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), MatraderError> {
    let value = config.get_double("strategy", "periods_per_year", 252.0);
    if value < 1.0 {
        return Err(MatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "periods_per_year".to_string(),
            reason: "periods_per_year must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_window_range(
    config: &dyn ConfigPort,
    start_key: &str,
    stop_key: &str,
    step_key: &str,
    default_start: i64,
    default_stop: i64,
    default_step: i64,
) -> Result<(), MatraderError> {
    let start = config.get_int("optimize", start_key, default_start);
    if start < 1 {
        return Err(MatraderError::ConfigInvalid {
            section: "optimize".to_string(),
            key: start_key.to_string(),
            reason: format!("{} must be at least 1", start_key),
        });
    }
    let stop = config.get_int("optimize", stop_key, default_stop);
    if stop < start {
        return Err(MatraderError::ConfigInvalid {
            section: "optimize".to_string(),
            key: stop_key.to_string(),
            reason: format!("{} must not be below {}", stop_key, start_key),
        });
    }
    let step = config.get_int("optimize", step_key, default_step);
    if step < 1 {
        return Err(MatraderError::ConfigInvalid {
            section: "optimize".to_string(),
            key: step_key.to_string(),
            reason: format!("{} must be at least 1", step_key),
        });
    }
    Ok(())
}
