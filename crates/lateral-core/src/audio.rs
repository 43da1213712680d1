//! Audio-position synchronization: derives pan, gain and music playback
//! rate from the same virtual-time clock that drives the visuals.
//!
//! The director never touches a platform audio API. Each tick it emits a
//! small batch of [`AudioCommand`]s that the host adapter applies to its
//! graph, which keeps the engine testable and the adapter dumb.

use std::time::Duration;

use smallvec::SmallVec;

use crate::reverb::{ImpulseKey, ImpulseSpec};
use crate::settings::Settings;

pub type CommandBatch = SmallVec<[AudioCommand; 8]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCommand {
    ToneFrequency(f32),
    TonePan(f32),
    /// Tone volume scaled by the speed multiplier; the tone silences itself
    /// through ramps and deceleration without separate mute logic.
    ToneGain(f32),
    MusicPan(f32),
    /// Mirrors the speed multiplier exactly: true rate coupling, the music
    /// audibly speeds up and slows down with the ball.
    MusicRate(f32),
    MusicGain(f32),
    ReverbMix {
        wet: f32,
        dry: f32,
    },
    /// (Re)start the music source at the tracked read offset.
    StartMusic {
        offset_sec: f64,
    },
    StopMusic,
}

/// Logical music read position, tracked in continuous time.
///
/// Playback rate changes every tick, so the host engine's paused-offset
/// query is meaningless mid-flight; the transport integrates
/// `real_delta * rate` itself and wraps on the buffer duration.
#[derive(Debug, Default)]
pub struct MusicTransport {
    offset_sec: f64,
    duration_sec: Option<f64>,
}

impl MusicTransport {
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration_sec = (seconds > 0.0).then_some(seconds);
        self.wrap();
    }

    pub fn advance(&mut self, real_delta: Duration, rate: f64) {
        self.offset_sec += real_delta.as_secs_f64() * rate;
        self.wrap();
    }

    pub fn seek(&mut self, seconds: f64) {
        self.offset_sec = seconds.max(0.0);
        self.wrap();
    }

    #[inline]
    pub fn offset_sec(&self) -> f64 {
        self.offset_sec
    }

    fn wrap(&mut self) {
        if let Some(d) = self.duration_sec {
            self.offset_sec = self.offset_sec.rem_euclid(d);
        }
    }
}

#[derive(Debug, Default)]
struct LastParams {
    tone_frequency: Option<f32>,
    music_gain: Option<f32>,
    reverb_wet: Option<f32>,
}

/// Per-tick bridge from motion state to audio parameters.
#[derive(Debug, Default)]
pub struct AudioDirector {
    transport: MusicTransport,
    music_loaded: bool,
    music_active: bool,
    reverb_key: Option<ImpulseKey>,
    next_request_id: u64,
    last: LastParams,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the decoded music buffer is ready.
    pub fn music_ready(&mut self, duration_sec: f64) {
        self.music_loaded = true;
        self.transport.set_duration(duration_sec);
        log::info!("[audio] music buffer ready ({duration_sec:.1}s)");
    }

    #[inline]
    pub fn music_offset_sec(&self) -> f64 {
        self.transport.offset_sec()
    }

    /// Derive this tick's parameter updates. `position` and `speed` come
    /// from the motion engine; `real_delta` is the clamped delta the engine
    /// actually applied, so the transport and virtual time stay in step.
    pub fn tick(
        &mut self,
        real_delta: Duration,
        position: f64,
        speed: f64,
        settings: &Settings,
    ) -> CommandBatch {
        let mut out = CommandBatch::new();
        let enabled = settings.audio_enabled;

        let freq = settings.frequency as f32;
        if self.last.tone_frequency != Some(freq) {
            self.last.tone_frequency = Some(freq);
            out.push(AudioCommand::ToneFrequency(freq));
        }
        out.push(AudioCommand::TonePan(
            (position * settings.tone_pan_amount) as f32,
        ));
        let tone_gain = if enabled {
            (settings.tone_volume * speed) as f32
        } else {
            0.0
        };
        out.push(AudioCommand::ToneGain(tone_gain));

        let want_music = enabled && self.music_loaded && speed > 0.0;
        if want_music && !self.music_active {
            self.music_active = true;
            out.push(AudioCommand::StartMusic {
                offset_sec: self.transport.offset_sec(),
            });
        } else if !want_music && self.music_active {
            self.music_active = false;
            out.push(AudioCommand::StopMusic);
        }
        if self.music_active {
            self.transport.advance(real_delta, speed);
            out.push(AudioCommand::MusicRate(speed as f32));
            out.push(AudioCommand::MusicPan(
                (position * settings.music_pan_amount) as f32,
            ));
            let music_gain = settings.music_volume as f32;
            if self.last.music_gain != Some(music_gain) {
                self.last.music_gain = Some(music_gain);
                out.push(AudioCommand::MusicGain(music_gain));
            }
        }

        let wet = if settings.reverb_enabled {
            settings.reverb_mix as f32
        } else {
            0.0
        };
        if self.last.reverb_wet != Some(wet) {
            self.last.reverb_wet = Some(wet);
            out.push(AudioCommand::ReverbMix {
                wet,
                dry: 1.0 - wet,
            });
        }

        out
    }

    /// Return a render request when the effective `(type, decay)` key has
    /// changed since the last request. The caller checks its impulse cache
    /// before submitting to a renderer.
    pub fn impulse_request(&mut self, settings: &Settings, sample_rate: f32) -> Option<ImpulseSpec> {
        if !settings.reverb_enabled {
            return None;
        }
        let key = ImpulseKey::new(settings.reverb_type, settings.reverb_decay);
        if self.reverb_key == Some(key) {
            return None;
        }
        self.reverb_key = Some(key);
        self.next_request_id += 1;
        Some(ImpulseSpec {
            id: self.next_request_id,
            sample_rate,
            reverb_type: settings.reverb_type,
            decay_sec: settings.reverb_decay as f32,
        })
    }
}
