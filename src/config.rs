use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub endpoints: EndpointConfig,
    pub poll: PollConfig,
}

/// One base URL per monitored subsystem; unset subsystems are not polled.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Two-household PLC aggregate (HMI dashboard).
    pub hmi: Option<String>,
    pub power_meter: Option<String>,
    pub transfer_switch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub request_timeout_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Config {
            endpoints: EndpointConfig {
                hmi: env::var("HMI_ENDPOINT").ok(),
                power_meter: env::var("POWER_METER_ENDPOINT").ok(),
                transfer_switch: env::var("TRANSFER_SWITCH_ENDPOINT").ok(),
            },
            poll: PollConfig {
                interval_ms: parse_var("POLL_INTERVAL_MS", 100)?,
                request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS", 5000)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.endpoints.hmi.is_none()
            && self.endpoints.power_meter.is_none()
            && self.endpoints.transfer_switch.is_none()
        {
            return Err(AppError::Config(
                "at least one of HMI_ENDPOINT, POWER_METER_ENDPOINT, TRANSFER_SWITCH_ENDPOINT must be set"
                    .to_string(),
            ));
        }

        if self.poll.interval_ms == 0 {
            return Err(AppError::Config(
                "POLL_INTERVAL_MS must be greater than 0".to_string(),
            ));
        }

        if self.poll.request_timeout_ms == 0 {
            return Err(AppError::Config(
                "REQUEST_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read a numeric env var, falling back to `default` when unset. A set but
/// unparsable value is a configuration error, not a silent default.
fn parse_var(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{name} must be an integer, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}
