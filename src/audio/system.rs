//! Audio system owning the cpal stream and the shared amplitude meter.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::sync::{Arc, Mutex};

use super::clip::{AudioClip, ClipCursor};
use super::meter::AmplitudeMeter;
use crate::params::{AudioConfig, AudioSource};

/// Audio system publishing the current amplitude level
pub struct AudioSystem {
    /// Shared meter, written by the audio callback (thread-safe)
    meter: Arc<Mutex<AmplitudeMeter>>,

    /// Input or output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the configured source and start metering it
    pub fn new(config: &AudioConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid audio config: {}", e))?;

        let meter = Arc::new(Mutex::new(AmplitudeMeter::new(config.smoothing)));
        let host = cpal::default_host();

        let stream = match &config.source {
            AudioSource::Microphone => open_microphone(&host, Arc::clone(&meter))?,
            AudioSource::Clip(path) => {
                let clip = AudioClip::load(path)?;
                log::info!(
                    "Clip: {} ({} ch @ {}Hz, {:.1}s)",
                    path.display(),
                    clip.channels,
                    clip.sample_rate,
                    clip.duration_secs()
                );
                open_clip_playback(&host, clip, Arc::clone(&meter))?
            }
        };

        stream.play().context("Failed to start audio stream")?;

        Ok(Self {
            meter,
            _stream: stream,
        })
    }

    /// Current amplitude level; 0 if the meter is unavailable
    pub fn level(&self) -> f32 {
        self.meter.lock().map(|m| m.level()).unwrap_or(0.0)
    }
}

fn open_microphone(host: &cpal::Host, meter: Arc<Mutex<AmplitudeMeter>>) -> Result<cpal::Stream> {
    let device = host
        .default_input_device()
        .context("No audio input device found")?;

    let config = device
        .default_input_config()
        .context("Failed to get audio input config")?;

    log::info!(
        "Audio input: {} @ {}Hz, {} ch, {:?}",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        config.sample_rate().0,
        config.channels(),
        config.sample_format()
    );

    let format = config.sample_format();
    let stream_config: cpal::StreamConfig = config.into();

    match format {
        SampleFormat::F32 => build_input_stream::<f32>(&device, &stream_config, meter),
        SampleFormat::I16 => build_input_stream::<i16>(&device, &stream_config, meter),
        SampleFormat::U16 => build_input_stream::<u16>(&device, &stream_config, meter),
        SampleFormat::I32 => build_input_stream::<i32>(&device, &stream_config, meter),
        other => Err(anyhow!("Unsupported input sample format {:?}", other)),
    }
}

fn build_input_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    meter: Arc<Mutex<AmplitudeMeter>>,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if let Ok(mut meter) = meter.lock() {
                    meter.process(data.iter().map(|s| s.to_sample::<f32>()));
                }
            },
            |err| log::warn!("Audio input stream error: {}", err),
            None,
        )
        .context("Failed to build audio input stream")
}

fn open_clip_playback(
    host: &cpal::Host,
    clip: AudioClip,
    meter: Arc<Mutex<AmplitudeMeter>>,
) -> Result<cpal::Stream> {
    let device = host
        .default_output_device()
        .context("No audio output device found")?;

    log::info!(
        "Audio output: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );

    // Play at the clip's own channel count and rate
    let stream_config = cpal::StreamConfig {
        channels: clip.channels,
        sample_rate: cpal::SampleRate(clip.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let supported: Vec<SampleFormat> = device
        .supported_output_configs()
        .context("Failed to query audio output configs")?
        .filter(|c| {
            c.channels() == clip.channels
                && c.min_sample_rate().0 <= clip.sample_rate
                && clip.sample_rate <= c.max_sample_rate().0
        })
        .map(|c| c.sample_format())
        .collect();
    let format = output_sample_format(&supported).with_context(|| {
        format!(
            "Output device cannot play {} ch @ {}Hz",
            clip.channels, clip.sample_rate
        )
    })?;
    log::debug!("Clip output format: {:?}", format);

    let cursor = ClipCursor::new(clip);
    match format {
        SampleFormat::F32 => build_clip_stream::<f32>(&device, &stream_config, cursor, meter),
        SampleFormat::I16 => build_clip_stream::<i16>(&device, &stream_config, cursor, meter),
        SampleFormat::U16 => build_clip_stream::<u16>(&device, &stream_config, cursor, meter),
        SampleFormat::I32 => build_clip_stream::<i32>(&device, &stream_config, cursor, meter),
        other => Err(anyhow!("Unsupported output sample format {:?}", other)),
    }
}

/// Sample formats the clip stream can write, best first
const OUTPUT_FORMATS: [SampleFormat; 4] = [
    SampleFormat::F32,
    SampleFormat::I32,
    SampleFormat::I16,
    SampleFormat::U16,
];

/// Best writable format among those the device supports for the clip
fn output_sample_format(supported: &[SampleFormat]) -> Option<SampleFormat> {
    OUTPUT_FORMATS
        .iter()
        .find(|f| supported.contains(*f))
        .copied()
}

fn build_clip_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut cursor: ClipCursor,
    meter: Arc<Mutex<AmplitudeMeter>>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    // Decoded samples for the current buffer, reused between callbacks
    let mut scratch: Vec<f32> = Vec::new();
    let mut logged_end = false;

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                cursor.fill(&mut scratch);
                for (out, sample) in data.iter_mut().zip(&scratch) {
                    *out = sample.to_sample::<T>();
                }
                if let Ok(mut meter) = meter.lock() {
                    meter.process(scratch.iter().copied());
                }
                if cursor.finished() && !logged_end {
                    log::info!("Clip finished");
                    logged_end = true;
                }
            },
            |err| log::warn!("Audio output stream error: {}", err),
            None,
        )
        .context("Failed to build clip output stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_prefers_float() {
        let supported = [SampleFormat::I16, SampleFormat::F32];
        assert_eq!(output_sample_format(&supported), Some(SampleFormat::F32));
    }

    #[test]
    fn test_integer_only_device_gets_integer_format() {
        assert_eq!(
            output_sample_format(&[SampleFormat::U16, SampleFormat::I16]),
            Some(SampleFormat::I16)
        );
        assert_eq!(
            output_sample_format(&[SampleFormat::U16]),
            Some(SampleFormat::U16)
        );
    }

    #[test]
    fn test_unwritable_formats_yield_none() {
        assert_eq!(output_sample_format(&[SampleFormat::U8]), None);
        assert_eq!(output_sample_format(&[]), None);
    }
}
