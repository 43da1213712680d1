//! Motion envelope: the state machine that owns the speed multiplier and
//! virtual time driving the oscillator.
//!
//! Virtual time advances by `delta * speed` only, never by wall-clock time
//! directly, so irregular callback timing cannot jump the ball. The envelope
//! eases speed up on play and eases it out on pause, timed so deceleration
//! always completes exactly at a center crossing.

use std::time::Duration;

use crate::clock::{clamped_delta, TickPath};
use crate::constants::{
    DECEL_CENTER_EPSILON, DECEL_SPEED_FLOOR, EDGE_THRESHOLD, RAMP_DURATION_MS,
};
use crate::waveform::{self, WaveformConfig};

/// Envelope phase. Exactly one holds at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Fully stopped at center; speed 0, virtual time 0.
    Idle,
    /// Easing speed from its captured start value to 1.
    RampingUp,
    /// Full speed.
    Steady,
    /// Pause was pressed while heading outward; full speed is held until
    /// the ball reaches an extremum, then deceleration begins inbound.
    WaitingForEdge,
    /// Easing out toward the center crossing.
    Decelerating,
}

/// The single owner of all motion state. Drives everything else: renderers
/// read `position()`, the audio director reads `position()` and `speed()`.
#[derive(Debug)]
pub struct MotionEngine {
    is_playing: bool,
    phase: Phase,
    speed: f64,
    virtual_time_ms: f64,
    position: f64,
    // Accumulated clamped real time; the ramp interpolates against this
    // rather than a wall clock so the engine stays fully delta-driven.
    real_time_ms: f64,
    ramp_start_ms: f64,
    ramp_start_speed: f64,
    decel_start_position: f64,
    last_timestamp_ms: Option<f64>,
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionEngine {
    pub fn new() -> Self {
        Self {
            is_playing: false,
            phase: Phase::Idle,
            speed: 0.0,
            virtual_time_ms: 0.0,
            position: 0.0,
            real_time_ms: 0.0,
            ramp_start_ms: 0.0,
            ramp_start_speed: 0.0,
            decel_start_position: 0.0,
            last_timestamp_ms: None,
        }
    }

    /// Begin (or restart) the ramp toward full speed. Captures the current
    /// speed as the ramp origin, so a play press mid-deceleration resumes
    /// smoothly instead of snapping back to zero.
    pub fn play(&mut self) {
        if self.is_playing && matches!(self.phase, Phase::RampingUp | Phase::Steady) {
            return;
        }
        self.is_playing = true;
        self.ramp_start_ms = self.real_time_ms;
        self.ramp_start_speed = self.speed;
        self.decel_start_position = 0.0;
        self.phase = Phase::RampingUp;
        log::debug!("[engine] play: ramp from speed {:.3}", self.speed);
    }

    /// Begin stopping. Heading toward center: decelerate immediately.
    /// Heading toward an edge: hold full speed until the extremum so the
    /// stop never reverses the ball mid-excursion, then decelerate on the
    /// inbound leg.
    pub fn pause(&mut self, cfg: &WaveformConfig) {
        if matches!(
            self.phase,
            Phase::Idle | Phase::WaitingForEdge | Phase::Decelerating
        ) {
            self.is_playing = false;
            return;
        }
        self.is_playing = false;
        let vel = waveform::velocity_sign(self.virtual_time_ms, cfg);
        if vel * self.position < 0.0 {
            self.decel_start_position = self.position.abs();
            self.phase = Phase::Decelerating;
            log::debug!(
                "[engine] pause: decelerating from |pos| {:.3}",
                self.decel_start_position
            );
        } else {
            // Cancel any ramp outright; the outbound excursion completes
            // at full speed.
            self.speed = 1.0;
            self.phase = Phase::WaitingForEdge;
            log::debug!("[engine] pause: waiting for edge");
        }
    }

    /// Timestamp-based entry point shared by every ticker. The baseline is
    /// common, so two sources firing within the same wall-clock tick simply
    /// advance the clock further instead of double-counting.
    pub fn advance(&mut self, now_ms: f64, path: TickPath, cfg: &WaveformConfig) -> Duration {
        let delta = match self.last_timestamp_ms {
            Some(last) => clamped_delta(now_ms - last, path),
            None => Duration::ZERO,
        };
        self.last_timestamp_ms = Some(now_ms);
        self.tick(delta, cfg);
        delta
    }

    /// Advance the envelope and virtual time by an already-clamped delta.
    pub fn tick(&mut self, dt: Duration, cfg: &WaveformConfig) {
        let delta_ms = dt.as_secs_f64() * 1000.0;
        self.real_time_ms += delta_ms;

        match self.phase {
            Phase::Idle => {
                self.speed = 0.0;
            }
            Phase::RampingUp => {
                let progress =
                    ((self.real_time_ms - self.ramp_start_ms) / RAMP_DURATION_MS).clamp(0.0, 1.0);
                let eased = ease_in_out_cubic(progress);
                self.speed = self.ramp_start_speed + (1.0 - self.ramp_start_speed) * eased;
                if progress >= 1.0 {
                    self.speed = 1.0;
                    self.phase = Phase::Steady;
                }
            }
            Phase::Steady | Phase::WaitingForEdge => {
                self.speed = 1.0;
            }
            Phase::Decelerating => {
                if self.decel_start_position <= DECEL_CENTER_EPSILON {
                    self.finish_deceleration();
                    return;
                }
                // Square-root ease-out: holds speed on the approach, drops
                // sharply near center. The floor keeps motion visible until
                // the explicit snap at the zero crossing.
                let ratio = (self.position.abs() / self.decel_start_position).min(1.0);
                self.speed = ratio.sqrt().max(DECEL_SPEED_FLOOR);
            }
        }

        let prev_position = self.position;
        if self.speed > 0.0 {
            self.virtual_time_ms += delta_ms * self.speed;
        }
        self.position = waveform::position(self.virtual_time_ms, cfg);

        match self.phase {
            Phase::WaitingForEdge => {
                let vel = waveform::velocity_sign(self.virtual_time_ms, cfg);
                // Either the ball has reached the edge band, or a coarse
                // tick stepped straight over it and the velocity already
                // points back toward center.
                if self.position.abs() >= EDGE_THRESHOLD || vel * self.position < 0.0 {
                    self.decel_start_position = self.position.abs();
                    self.phase = Phase::Decelerating;
                }
            }
            Phase::Decelerating => {
                if self.position == 0.0 || prev_position * self.position < 0.0 {
                    self.finish_deceleration();
                }
            }
            _ => {}
        }
    }

    // The single point where virtual time resets: the episode ends
    // atomically at the center crossing.
    fn finish_deceleration(&mut self) {
        self.phase = Phase::Idle;
        self.speed = 0.0;
        self.virtual_time_ms = 0.0;
        self.position = 0.0;
        self.decel_start_position = 0.0;
        log::debug!("[engine] stop complete at center");
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current fraction of full angular velocity, in [0, 1].
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn virtual_time_ms(&self) -> f64 {
        self.virtual_time_ms
    }

    /// Position as of the most recent tick, in [-1, 1].
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }
}

#[inline]
fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
