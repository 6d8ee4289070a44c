//! Frame pacing checks.
//!
//! Amplitude is sampled once per drawn frame. While recording, frames are
//! written as a fixed-rate sequence, so a window that renders slower than
//! that rate produces a video running ahead of the audio it reacted to.

use std::time::{Duration, Instant};

/// Length of one measurement interval
const INTERVAL: Duration = Duration::from_secs(1);

/// Counts drawn frames per interval and flags intervals that fall behind
/// the recording rate
#[derive(Debug)]
pub struct FrameRateMonitor {
    target_fps: Option<u32>,
    interval_start: Instant,
    frames: u32,
    slow_intervals: u32,
}

impl FrameRateMonitor {
    /// `target_fps` is the recording rate, or `None` for a live session
    pub fn new(target_fps: Option<u32>) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    fn starting_at(target_fps: Option<u32>, now: Instant) -> Self {
        Self {
            target_fps,
            interval_start: now,
            frames: 0,
            slow_intervals: 0,
        }
    }

    pub fn record_frame(&mut self) {
        self.frame_at(Instant::now());
    }

    /// Count a frame drawn at `now`; returns the measured rate once an
    /// interval closes
    fn frame_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < INTERVAL {
            return None;
        }

        let fps = self.frames as f64 / elapsed.as_secs_f64();
        self.frames = 0;
        self.interval_start = now;

        match self.target_fps {
            Some(target) if fps < target as f64 => {
                self.slow_intervals += 1;
                log::warn!(
                    "Rendering at {:.1} fps, below the {} fps recording rate; \
                     the recording will run ahead of the audio",
                    fps,
                    target
                );
            }
            _ => log::debug!("FPS: {:.1}", fps),
        }
        Some(fps)
    }

    /// Intervals measured below the recording rate so far
    pub fn slow_intervals(&self) -> u32 {
        self.slow_intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `count` frames spaced `step` apart; returns the last measurement
    fn run(
        monitor: &mut FrameRateMonitor,
        start: Instant,
        count: u32,
        step: Duration,
    ) -> Option<f64> {
        let mut measured = None;
        for k in 1..=count {
            if let Some(fps) = monitor.frame_at(start + step * k) {
                measured = Some(fps);
            }
        }
        measured
    }

    #[test]
    fn test_no_measurement_before_interval() {
        let start = Instant::now();
        let mut monitor = FrameRateMonitor::starting_at(Some(60), start);
        assert_eq!(run(&mut monitor, start, 10, Duration::from_millis(10)), None);
    }

    #[test]
    fn test_slow_recording_is_flagged() {
        let start = Instant::now();
        let mut monitor = FrameRateMonitor::starting_at(Some(60), start);

        // 40 ms per frame is 25 fps
        let fps = run(&mut monitor, start, 25, Duration::from_millis(40)).unwrap();
        assert!((fps - 25.0).abs() < 1e-6);
        assert_eq!(monitor.slow_intervals(), 1);
    }

    #[test]
    fn test_fast_recording_is_not_flagged() {
        let start = Instant::now();
        let mut monitor = FrameRateMonitor::starting_at(Some(60), start);

        // 10 ms per frame is 100 fps
        let fps = run(&mut monitor, start, 100, Duration::from_millis(10)).unwrap();
        assert!((fps - 100.0).abs() < 1e-6);
        assert_eq!(monitor.slow_intervals(), 0);
    }

    #[test]
    fn test_live_session_never_flags() {
        let start = Instant::now();
        let mut monitor = FrameRateMonitor::starting_at(None, start);
        run(&mut monitor, start, 10, Duration::from_millis(200));
        assert_eq!(monitor.slow_intervals(), 0);
    }
}
