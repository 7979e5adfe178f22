//! Glucose reading sources
//!
//! Abstracts over where glucose samples come from:
//! - Dexcom Share: the real cloud API (requires Share credentials)
//! - Mock: scripted readings for demos and tests

mod dexcom;
mod mock;

pub use dexcom::DexcomSource;
pub use mock::MockSource;

use crate::core::{GlucoseSample, Result};

/// Trait for glucose reading sources
pub trait ReadingSource {
    /// Fetch the most recent glucose sample.
    ///
    /// `Ok(None)` means the source is reachable but has no recent reading,
    /// which is a normal state (e.g. the sensor has not transmitted lately).
    fn fetch_current(&mut self) -> Result<Option<GlucoseSample>>;

    /// Name of this reading source
    fn name(&self) -> &str;
}
