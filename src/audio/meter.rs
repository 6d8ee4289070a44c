//! RMS amplitude meter.

/// Tracks the loudness of the most recent audio buffer.
///
/// Each buffer's RMS is combined with the previous level as
/// `max(rms, level * smoothing)`, so with smoothing 0 the level is the raw
/// per-buffer RMS and higher smoothing makes peaks decay slowly.
#[derive(Debug, Clone, Default)]
pub struct AmplitudeMeter {
    smoothing: f32,
    level: f32,
}

impl AmplitudeMeter {
    pub fn new(smoothing: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            level: 0.0,
        }
    }

    /// Feed one buffer of interleaved samples (all channels)
    pub fn process(&mut self, samples: impl IntoIterator<Item = f32>) {
        let (sum, count) = samples
            .into_iter()
            .fold((0.0f32, 0usize), |(sum, count), s| (sum + s * s, count + 1));
        if count == 0 {
            return;
        }

        let rms = (sum / count as f32).sqrt();
        let smoothed = self.level * self.smoothing;
        self.level = if rms.is_finite() { rms.max(smoothed) } else { smoothed };
    }

    /// Current level, nominally in [0, 1]
    pub fn level(&self) -> f32 {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_zero() {
        let mut meter = AmplitudeMeter::new(0.0);
        meter.process(vec![0.0; 256]);
        assert_eq!(meter.level(), 0.0);
    }

    #[test]
    fn test_rms_of_square_wave() {
        let mut meter = AmplitudeMeter::new(0.0);
        let samples: Vec<f32> = (0..512).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        meter.process(samples);
        assert!((meter.level() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unsmoothed_follows_latest_buffer() {
        let mut meter = AmplitudeMeter::new(0.0);
        meter.process(vec![0.8; 64]);
        meter.process(vec![0.1; 64]);
        assert!((meter.level() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_decays_slowly() {
        let mut meter = AmplitudeMeter::new(0.9);
        meter.process(vec![0.8; 64]);
        meter.process(vec![0.0; 64]);
        assert!((meter.level() - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_empty_buffer_keeps_level() {
        let mut meter = AmplitudeMeter::new(0.0);
        meter.process(vec![0.3; 16]);
        meter.process(Vec::new());
        assert!((meter.level() - 0.3).abs() < 1e-6);
    }
}
