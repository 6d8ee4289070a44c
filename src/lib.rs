//! nanovisual library - audio-reactive grid sketch

pub mod audio;
pub mod cli;
pub mod params;
pub mod rendering;
pub mod sketch;
