//! Tick-path bookkeeping. Two independent callback sources drive the
//! engine: the display-refresh path (throttled to a stop in hidden tabs)
//! and a fixed ~16 ms interval path that keeps running in the background.
//! Every delta is clamped per path before it reaches virtual time.

use std::time::Duration;

use crate::constants::{FRAME_DELTA_CLAMP_MS, INTERVAL_DELTA_CLAMP_MS};

/// Which callback source produced a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPath {
    /// Display-refresh callback (requestAnimationFrame on the web).
    Frame,
    /// Fixed-interval callback; survives backgrounding at reduced rate.
    Interval,
}

impl TickPath {
    #[inline]
    pub fn max_delta_ms(self) -> f64 {
        match self {
            TickPath::Frame => FRAME_DELTA_CLAMP_MS,
            TickPath::Interval => INTERVAL_DELTA_CLAMP_MS,
        }
    }
}

/// Clamp a raw elapsed interval for the given path. Negative or absent
/// baselines yield zero; oversized gaps (tab backgrounding, debugger
/// pauses, GC) collapse to the clamp bound.
#[inline]
pub fn clamped_delta(raw_ms: f64, path: TickPath) -> Duration {
    let ms = raw_ms.clamp(0.0, path.max_delta_ms());
    Duration::from_secs_f64(ms / 1000.0)
}

/// Per-consumer timestamp tracker for callers that need their own delta
/// stream (the audio director's real-time advance, a standalone ticker).
#[derive(Debug, Default)]
pub struct DeltaClock {
    last_ms: Option<f64>,
}

impl DeltaClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now_ms` and return the clamped delta since the previous
    /// sample. The first sample returns zero.
    pub fn advance(&mut self, now_ms: f64, path: TickPath) -> Duration {
        let delta = match self.last_ms {
            Some(last) => clamped_delta(now_ms - last, path),
            None => Duration::ZERO,
        };
        self.last_ms = Some(now_ms);
        delta
    }

    /// Drop the baseline so the next sample yields a zero delta. Used when
    /// a ticker resumes after a known discontinuity.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
