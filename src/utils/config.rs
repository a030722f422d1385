use anyhow::{Context, Result};
use dotenv::dotenv;
use std::env;

/// Knobs for the simulated backend, read from the environment (a `.env`
/// file is honored). CLI flags may override both.
#[derive(Debug, Clone)]
pub struct Config {
    /// Multiplier over the built-in per-operation delays. 0 disables them.
    pub latency_scale: f32,
    /// Probability in [0, 1] that any simulated call fails.
    pub fail_rate: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let latency_scale = match env::var("ACADEMIX_LATENCY_SCALE") {
            Ok(raw) => raw
                .parse::<f32>()
                .context("ACADEMIX_LATENCY_SCALE must be a number")?,
            Err(_) => 1.0,
        };
        let fail_rate = match env::var("ACADEMIX_FAIL_RATE") {
            Ok(raw) => raw
                .parse::<f32>()
                .context("ACADEMIX_FAIL_RATE must be a number")?,
            Err(_) => 0.0,
        };
        Ok(Config {
            latency_scale,
            fail_rate,
        })
    }
}
