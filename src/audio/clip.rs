//! Pre-recorded WAV clip used as an alternative amplitude source.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Decoded clip, interleaved `f32` samples in [-1, 1]
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioClip {
    /// Load and decode a WAV file
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open clip {}", path.display()))?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to decode float samples")?,
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    bail!("Unsupported bit depth {}", spec.bits_per_sample);
                }
                let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / full_scale))
                    .collect::<Result<Vec<_>, _>>()
                    .context("Failed to decode integer samples")?
            }
        };

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Clip length in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.channels as f32 / self.sample_rate as f32
    }
}

/// Play position within a clip; yields silence past the end
#[derive(Debug, Clone)]
pub struct ClipCursor {
    clip: AudioClip,
    position: usize,
}

impl ClipCursor {
    pub fn new(clip: AudioClip) -> Self {
        Self { clip, position: 0 }
    }

    /// Fill an interleaved output buffer and advance
    pub fn fill(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.clip.samples.get(self.position).copied().unwrap_or(0.0);
            self.position += 1;
        }
    }

    pub fn finished(&self) -> bool {
        self.position >= self.clip.samples.len()
    }
}
