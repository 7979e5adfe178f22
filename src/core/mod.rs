//! Core module - configuration, errors, and common types

mod config;
mod error;
mod types;

pub use config::{AccountConfig, Config, DisplayConfig, Region};
pub use error::{Error, Result};
pub use types::{
    ClassificationResult, DisplayUnit, GlucoseSample, PollState, Severity, TrendCode,
    MMOL_L_CONVERSION_FACTOR,
};
