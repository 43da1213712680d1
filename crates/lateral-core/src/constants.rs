// Shared motion/audio tuning constants used by both the engine and the
// web frontend.

// Motion envelope
pub const RAMP_DURATION_MS: f64 = 800.0; // play press -> full speed
pub const EDGE_THRESHOLD: f64 = 0.99; // |position| counted as "at the edge"
pub const DECEL_SPEED_FLOOR: f64 = 0.08; // keeps motion visible until the center snap
pub const DECEL_CENTER_EPSILON: f64 = 0.01; // below this the ball is already centered

// Per-path delta clamps (ms). Large gaps from backgrounding or GC pauses are
// absorbed, never propagated into virtual time.
pub const FRAME_DELTA_CLAMP_MS: f64 = 50.0;
pub const INTERVAL_DELTA_CLAMP_MS: f64 = 100.0;

// Interval ticker cadence (ms); keeps audio panning alive in hidden tabs.
pub const INTERVAL_TICK_MS: i32 = 16;

// Trail history depth handed to visual consumers.
pub const TRAIL_CAPACITY: usize = 64;

// Reverb impulse responses are capped regardless of preset and decay.
pub const MAX_IMPULSE_SECONDS: f32 = 6.0;

// Per-channel stereo width scalars; slight decorrelation between channels.
pub const IMPULSE_CHANNEL_WIDTH: [f32; 2] = [1.0, 0.97];
