//! Scripted reading source for demos and tests

use crate::core::{GlucoseSample, Result, TrendCode};
use crate::source::ReadingSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Reading source that replays a fixed script of glucose scenarios.
///
/// Cycles through the script one entry per fetch, so demos are deterministic.
/// The fetch counter is shared so callers can observe activity after the
/// source has been handed to the poll loop.
pub struct MockSource {
    script: Vec<(u16, TrendCode)>,
    next: usize,
    fetches: Arc<AtomicUsize>,
}

impl MockSource {
    /// Scenarios covering low, normal, and high glucose
    pub fn with_default_scenarios() -> Self {
        Self::with_script(vec![
            (65, TrendCode::SingleDown),
            (85, TrendCode::Flat),
            (120, TrendCode::FortyFiveUp),
            (200, TrendCode::SingleUp),
            (250, TrendCode::DoubleUp),
        ])
    }

    pub fn with_script(script: Vec<(u16, TrendCode)>) -> Self {
        Self {
            script,
            next: 0,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of fetch invocations
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl ReadingSource for MockSource {
    fn fetch_current(&mut self) -> Result<Option<GlucoseSample>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.script.is_empty() {
            return Ok(None);
        }

        let (value, trend) = self.script[self.next % self.script.len()];
        self.next += 1;
        Ok(Some(GlucoseSample::new(value, trend)))
    }

    fn name(&self) -> &str {
        "Mock (scripted data)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_cycles() {
        let mut source = MockSource::with_script(vec![
            (100, TrendCode::Flat),
            (200, TrendCode::SingleUp),
        ]);

        let values: Vec<u16> = (0..4)
            .map(|_| source.fetch_current().unwrap().unwrap().value_mg_dl)
            .collect();
        assert_eq!(values, vec![100, 200, 100, 200]);
        assert_eq!(source.fetch_counter().load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_empty_script_yields_no_data() {
        let mut source = MockSource::with_script(Vec::new());
        assert!(source.fetch_current().unwrap().is_none());
    }
}
