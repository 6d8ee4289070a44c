//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (logical pixels, seconds, frames)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod render;
mod sketch;

// Re-export all types
pub use audio::{AudioConfig, AudioSource};
pub use render::{RecordingConfig, RenderConfig};
pub use sketch::{grid_constants, SketchParams};
