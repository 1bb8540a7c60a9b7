//! Sample Series Module
//! Noise readings plotted by the chart and the animation state that jitters them.

use crate::charts::geometry::DB_MAX;
use crate::config::AnimationConfig;

/// Noise levels in dB, one per tick column. Length is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    values: Vec<f64>,
}

impl SampleSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Nudge every sample by a per-index sine offset, clamped to 0..=100 dB.
    pub fn apply_jitter(&mut self, phase: f64, animation: &AnimationConfig) {
        for (i, v) in self.values.iter_mut().enumerate() {
            let jitter = (phase + i as f64 * animation.index_phase).sin() * animation.amplitude;
            *v = (*v + jitter).clamp(0.0, DB_MAX);
        }
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Number of samples strictly above `threshold`.
    pub fn count_above(&self, threshold: f64) -> usize {
        self.values.iter().filter(|v| **v > threshold).count()
    }
}

/// Series plus the monotonic phase counter driving the jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub series: SampleSeries,
    pub phase: f64,
}

impl ChartState {
    pub fn new(series: SampleSeries) -> Self {
        Self { series, phase: 0.0 }
    }

    /// Advance the phase, then jitter the samples at the new phase.
    pub fn advance(&mut self, animation: &AnimationConfig) {
        self.phase += animation.phase_step;
        self.series.apply_jitter(self.phase, animation);
    }
}
