//! Amplitude source configuration.

use std::path::PathBuf;

/// Where the amplitude signal comes from
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Default input device (microphone)
    Microphone,

    /// WAV clip played on the default output device
    Clip(PathBuf),
}

/// Amplitude metering configuration
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Active amplitude source
    pub source: AudioSource,

    /// Level smoothing factor in [0, 1]
    /// 0.0 = raw per-buffer RMS, values near 1.0 decay slowly
    pub smoothing: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            source: AudioSource::Microphone,
            smoothing: 0.0,
        }
    }
}

impl AudioConfig {
    /// Validate configuration (smoothing must stay inside [0, 1])
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(format!(
                "Smoothing must be within [0, 1], got {}",
                self.smoothing
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_microphone() {
        let config = AudioConfig::default();
        assert_eq!(config.source, AudioSource::Microphone);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_smoothing_out_of_range() {
        let config = AudioConfig {
            smoothing: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
