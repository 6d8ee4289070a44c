//! Sliding window of recent amplitude samples.

use std::collections::VecDeque;

use crate::params::grid_constants::HISTORY_LEN;

/// Fixed-length FIFO of amplitude samples (oldest at the front).
///
/// The length never changes: every push evicts exactly one sample.
#[derive(Debug, Clone)]
pub struct AmplitudeHistory {
    samples: VecDeque<f64>,
}

impl AmplitudeHistory {
    /// Create a history of `HISTORY_LEN` silent samples
    pub fn new() -> Self {
        Self::with_len(HISTORY_LEN)
    }

    /// Create a history of `len` silent samples
    pub fn with_len(len: usize) -> Self {
        Self {
            samples: std::iter::repeat(0.0).take(len).collect(),
        }
    }

    /// Append the newest sample and drop the oldest
    pub fn push(&mut self, sample: f64) {
        if self.samples.is_empty() {
            return;
        }
        self.samples.pop_front();
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn newest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn oldest(&self) -> Option<f64> {
        self.samples.front().copied()
    }
}

impl Default for AmplitudeHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_full_of_silence() {
        let history = AmplitudeHistory::new();
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|s| s == 0.0));
    }

    #[test]
    fn test_length_is_constant() {
        let mut history = AmplitudeHistory::new();
        for i in 0..57 {
            history.push(i as f64 / 100.0);
            assert_eq!(history.len(), 10);
        }
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = AmplitudeHistory::new();
        for i in 1..=10 {
            history.push(i as f64);
        }
        assert_eq!(history.oldest(), Some(1.0));

        history.push(11.0);
        assert_eq!(history.newest(), Some(11.0));
        assert_eq!(history.oldest(), Some(2.0));
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            (2..=11).map(|i| i as f64).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_zero_length_history_ignores_pushes() {
        let mut history = AmplitudeHistory::with_len(0);
        history.push(0.5);
        assert!(history.is_empty());
    }
}
