//! Temporal smoothing of per-frame metrics

use sliding_window::SlidingWindow;

/// Raw metric smoothed across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HeadX,
    HeadY,
    Tilt,
    ShoulderDiff,
    FaceSize,
    /// Eye contact as 0.0 / 1.0
    EyeContact,
}

const METRIC_COUNT: usize = 6;

impl Metric {
    pub const ALL: [Metric; METRIC_COUNT] = [
        Metric::HeadX,
        Metric::HeadY,
        Metric::Tilt,
        Metric::ShoulderDiff,
        Metric::FaceSize,
        Metric::EyeContact,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One sliding window per metric
///
/// Knows nothing about feedback or scoring; the only side effect of
/// [`TemporalSmoother::push`] is on the metric's own window.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    windows: [SlidingWindow<f64>; METRIC_COUNT],
}

impl TemporalSmoother {
    pub fn new(capacity: usize) -> Self {
        Self {
            windows: std::array::from_fn(|_| SlidingWindow::new(capacity)),
        }
    }

    /// Record a sample and return the running mean including it
    pub fn push(&mut self, metric: Metric, value: f64) -> f64 {
        let window = &mut self.windows[metric.index()];
        window.push(value);
        window.mean().unwrap_or(value)
    }

    /// Current mean, `None` before the first sample
    pub fn mean(&self, metric: Metric) -> Option<f64> {
        self.windows[metric.index()].mean()
    }

    pub fn window(&self, metric: Metric) -> &SlidingWindow<f64> {
        &self.windows[metric.index()]
    }

    pub fn capacity(&self) -> usize {
        self.windows[0].capacity()
    }

    /// Clear every window (between interview questions)
    pub fn reset(&mut self) {
        for window in &mut self.windows {
            window.clear();
        }
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(sliding_window::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_are_independent() {
        let mut smoother = TemporalSmoother::new(4);
        smoother.push(Metric::HeadX, 0.2);
        smoother.push(Metric::HeadX, 0.4);
        let tilt = smoother.push(Metric::Tilt, 10.0);

        assert!((smoother.mean(Metric::HeadX).unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(tilt, 10.0);
        assert_eq!(smoother.mean(Metric::FaceSize), None);
    }

    #[test]
    fn test_window_bounded_by_capacity() {
        let mut smoother = TemporalSmoother::new(8);
        for i in 0..20 {
            smoother.push(Metric::EyeContact, (i % 2) as f64);
        }
        assert_eq!(smoother.window(Metric::EyeContact).len(), 8);
        assert!((smoother.mean(Metric::EyeContact).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_all() {
        let mut smoother = TemporalSmoother::default();
        for metric in Metric::ALL {
            smoother.push(metric, 1.0);
        }
        smoother.reset();
        for metric in Metric::ALL {
            assert!(smoother.window(metric).is_empty());
        }
        assert_eq!(smoother.capacity(), 8);
    }
}
