//! Pure waveform evaluation: accumulated virtual time in, position in
//! [-1, 1] out. No internal state; safe to call at any virtual time.

use serde::{Deserialize, Serialize};

/// Oscillator shape. Both shapes share zero-crossing and extremum timing
/// (quarter-period symmetry), so switching shape mid-flight changes slope
/// but never jumps position discontinuously.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    Sine,
    Triangle,
}

impl Motion {
    /// Parse a user-facing name; `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "smooth" => Some(Motion::Sine),
            "triangle" | "linear" => Some(Motion::Triangle),
            _ => None,
        }
    }
}

/// Periodicity parameters. Live-settable at any time; position is a
/// continuous function of virtual time, not of these parameters directly.
#[derive(Clone, Copy, Debug)]
pub struct WaveformConfig {
    pub cycles_per_minute: f64,
    pub motion: Motion,
}

impl WaveformConfig {
    #[inline]
    pub fn period_ms(&self) -> f64 {
        // cycles_per_minute is validated at the settings layer; the floor
        // here only keeps a degenerate config from dividing by zero.
        60_000.0 / self.cycles_per_minute.max(1e-6)
    }
}

/// Normalized phase in [0, 1) for the given virtual time.
#[inline]
fn phase(virtual_time_ms: f64, cfg: &WaveformConfig) -> f64 {
    (virtual_time_ms / cfg.period_ms()).rem_euclid(1.0)
}

/// Evaluate the oscillator position at `virtual_time_ms`.
///
/// Sine: `sin(2pi * t / period)`. Triangle: piecewise linear over four
/// quarter-period segments through 0, +1, 0, -1, 0.
pub fn position(virtual_time_ms: f64, cfg: &WaveformConfig) -> f64 {
    let q = phase(virtual_time_ms, cfg);
    match cfg.motion {
        Motion::Sine => (std::f64::consts::TAU * q).sin(),
        Motion::Triangle => {
            if q < 0.25 {
                4.0 * q
            } else if q < 0.75 {
                2.0 - 4.0 * q
            } else {
                4.0 * q - 4.0
            }
        }
    }
}

/// Analytic sign of the instantaneous velocity at `virtual_time_ms`:
/// +1 moving right, -1 moving left, 0 exactly at an extremum (sine only).
///
/// Derived from the waveform derivative, never by finite-differencing
/// position; a coarse tick cannot mis-report the travel direction.
pub fn velocity_sign(virtual_time_ms: f64, cfg: &WaveformConfig) -> f64 {
    let q = phase(virtual_time_ms, cfg);
    match cfg.motion {
        Motion::Sine => {
            let c = (std::f64::consts::TAU * q).cos();
            if c == 0.0 {
                0.0
            } else {
                c.signum()
            }
        }
        // Rising quarter-phases move right, falling ones move left.
        Motion::Triangle => {
            if !(0.25..0.75).contains(&q) {
                1.0
            } else {
                -1.0
            }
        }
    }
}
