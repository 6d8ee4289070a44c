//! Command-line argument parsing.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::params::{AudioConfig, AudioSource, RecordingConfig, RenderConfig, SketchParams};

/// Amplitude source selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceArg {
    /// Default microphone
    Mic,
    /// WAV clip given by --clip
    Clip,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "nanovisual")]
#[command(about = "Audio-reactive grid sketch driven by microphone amplitude", long_about = None)]
pub struct Args {
    /// Start directly on the grid instead of the welcome screen
    #[arg(long)]
    pub debug: bool,

    /// Amplitude source
    #[arg(long, value_enum, default_value = "mic")]
    pub source: SourceArg,

    /// WAV file played when --source clip is selected
    #[arg(long, value_name = "PATH", default_value = "sound.wav")]
    pub clip: PathBuf,

    /// Amplitude smoothing factor (0 = raw, towards 1 = slow decay)
    #[arg(long, value_name = "FACTOR", default_value = "0", value_parser = parse_smoothing)]
    pub smoothing: f32,

    /// Initial window width (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Initial window height (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Record frames to PNG (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,
}

/// Smoothing must lie in [0, 1]; anything else is a usage error
fn parse_smoothing(value: &str) -> Result<f32, String> {
    let factor: f32 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if !(0.0..=1.0).contains(&factor) {
        return Err(format!("must be within [0, 1], got {}", factor));
    }
    Ok(factor)
}

impl Args {
    pub fn sketch_params(&self) -> SketchParams {
        SketchParams { debug: self.debug }
    }

    pub fn audio_config(&self) -> AudioConfig {
        let source = match self.source {
            SourceArg::Mic => AudioSource::Microphone,
            SourceArg::Clip => AudioSource::Clip(self.clip.clone()),
        };
        AudioConfig {
            source,
            smoothing: self.smoothing,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..Default::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };

        let config = RecordingConfig::new(duration);
        std::fs::create_dir_all(config.frames_dir()).with_context(|| {
            format!(
                "Failed to create frames directory {}",
                config.frames_dir().display()
            )
        })?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["nanovisual"]);
        assert!(!args.debug);
        assert_eq!(args.audio_config().source, AudioSource::Microphone);
        assert_eq!(args.audio_config().smoothing, 0.0);
        assert_eq!(args.render_config().window_width, 1280);
        assert!(args.record.is_none());
    }

    #[test]
    fn test_clip_source_uses_clip_path() {
        let args = Args::parse_from(["nanovisual", "--source", "clip", "--clip", "drums.wav"]);
        assert_eq!(
            args.audio_config().source,
            AudioSource::Clip(PathBuf::from("drums.wav"))
        );
    }

    #[test]
    fn test_debug_flag_starts_on_grid() {
        let args = Args::parse_from(["nanovisual", "--debug"]);
        assert_eq!(args.sketch_params().initial_mode(), 2);
    }

    #[test]
    fn test_smoothing_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["nanovisual", "--smoothing", "1.5"]).is_err());
        assert!(Args::try_parse_from(["nanovisual", "--smoothing", "-0.1"]).is_err());
        assert!(Args::try_parse_from(["nanovisual", "--smoothing", "loud"]).is_err());

        let args = Args::try_parse_from(["nanovisual", "--smoothing", "0.9"]).unwrap();
        assert_eq!(args.audio_config().smoothing, 0.9);
        assert!(args.audio_config().validate().is_ok());
    }

    #[test]
    fn test_no_recording_by_default() {
        let args = Args::parse_from(["nanovisual"]);
        assert!(args.create_recording_config().unwrap().is_none());
    }
}
