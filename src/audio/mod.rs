//! Amplitude sources for the sketch.
//!
//! A cpal stream (microphone input, or playback of a WAV clip) feeds an RMS
//! meter on the audio thread; the render loop reads the latest level.

mod clip;
mod meter;
mod system;

// Re-export public types
pub use clip::{AudioClip, ClipCursor};
pub use meter::AmplitudeMeter;
pub use system::AudioSystem;
