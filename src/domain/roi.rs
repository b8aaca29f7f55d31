//! Profit-target ladder keyed by minutes since entry.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MinimalRoi {
    steps: BTreeMap<u32, f64>,
}

impl Default for MinimalRoi {
    fn default() -> Self {
        MinimalRoi {
            steps: BTreeMap::from([(0, 0.04), (30, 0.02), (60, 0.01)]),
        }
    }
}

impl MinimalRoi {
    /// Build a ladder; every target must be a finite non-negative fraction.
    pub fn new(steps: impl IntoIterator<Item = (u32, f64)>) -> Result<Self, String> {
        let steps: BTreeMap<u32, f64> = steps.into_iter().collect();
        if let Some((minutes, roi)) = steps
            .iter()
            .find(|(_, roi)| !(roi.is_finite() && **roi >= 0.0))
        {
            return Err(format!(
                "roi at {} minutes must be non-negative, got {}",
                minutes, roi
            ));
        }
        Ok(MinimalRoi { steps })
    }

    /// Target of the greatest key not above `minutes`; `None` before the
    /// first step.
    pub fn roi_at(&self, minutes: u32) -> Option<f64> {
        self.steps.range(..=minutes).next_back().map(|(_, roi)| *roi)
    }

    pub fn steps(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.steps.iter().map(|(m, r)| (*m, *r))
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
