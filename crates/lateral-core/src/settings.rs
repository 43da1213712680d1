//! Live-mutable settings and their persistence seam.
//!
//! The engine and audio director re-read settings every tick rather than
//! snapshotting, so UI changes apply immediately. Updates arrive as string
//! key/value pairs from whatever panel the host wires up; unparsable values
//! substitute the field's documented default instead of erroring.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::{LateralError, Result};
use crate::reverb::ReverbType;
use crate::waveform::{Motion, WaveformConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Full left-right-left sweeps per minute.
    pub cycles_per_minute: f64,
    pub motion: Motion,
    pub audio_enabled: bool,
    /// Tone oscillator frequency in Hz.
    pub frequency: f64,
    /// How far the tone pans with the ball, 0 = mono, 1 = full width.
    pub tone_pan_amount: f64,
    pub music_pan_amount: f64,
    pub tone_volume: f64,
    pub music_volume: f64,
    pub reverb_enabled: bool,
    pub reverb_type: ReverbType,
    /// Wet share of the reverb output, 0..1.
    pub reverb_mix: f64,
    /// Reverb tail length in seconds.
    pub reverb_decay: f64,
    /// Strength handed to the visual wave/fluid consumers.
    pub wave_force: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cycles_per_minute: 40.0,
            motion: Motion::Sine,
            audio_enabled: true,
            frequency: 220.0,
            tone_pan_amount: 1.0,
            music_pan_amount: 0.5,
            tone_volume: 0.5,
            music_volume: 0.8,
            reverb_enabled: false,
            reverb_type: ReverbType::Hall,
            reverb_mix: 0.3,
            reverb_decay: 2.0,
            wave_force: 0.5,
        }
    }
}

impl Settings {
    /// Waveform parameters as of this instant.
    #[inline]
    pub fn waveform(&self) -> WaveformConfig {
        WaveformConfig {
            cycles_per_minute: self.cycles_per_minute,
            motion: self.motion,
        }
    }

    /// Apply a single `key=value` update from the UI layer.
    ///
    /// Unknown keys error; bad values never do. A value that fails to parse
    /// or falls outside the field's range substitutes the default (pure
    /// substitution policy, logged at warn).
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = Settings::default();
        match key {
            "cycles_per_minute" => {
                self.cycles_per_minute = num(key, value, defaults.cycles_per_minute, 1.0, 120.0)
            }
            "motion" => {
                self.motion = Motion::parse(value).unwrap_or_else(|| {
                    log::warn!("[settings] bad motion {value:?}, using default");
                    defaults.motion
                })
            }
            "audio_enabled" => self.audio_enabled = flag(key, value, defaults.audio_enabled),
            "frequency" => self.frequency = num(key, value, defaults.frequency, 40.0, 2000.0),
            "tone_pan_amount" => {
                self.tone_pan_amount = num(key, value, defaults.tone_pan_amount, 0.0, 1.0)
            }
            "music_pan_amount" => {
                self.music_pan_amount = num(key, value, defaults.music_pan_amount, 0.0, 1.0)
            }
            "tone_volume" => self.tone_volume = num(key, value, defaults.tone_volume, 0.0, 1.0),
            "music_volume" => self.music_volume = num(key, value, defaults.music_volume, 0.0, 1.0),
            "reverb_enabled" => self.reverb_enabled = flag(key, value, defaults.reverb_enabled),
            "reverb_type" => {
                self.reverb_type = ReverbType::parse(value).unwrap_or_else(|| {
                    log::warn!("[settings] bad reverb_type {value:?}, using default");
                    defaults.reverb_type
                })
            }
            "reverb_mix" => self.reverb_mix = num(key, value, defaults.reverb_mix, 0.0, 1.0),
            "reverb_decay" => self.reverb_decay = num(key, value, defaults.reverb_decay, 0.1, 10.0),
            "wave_force" => self.wave_force = num(key, value, defaults.wave_force, 0.0, 1.0),
            _ => return Err(LateralError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse persisted JSON; corrupt input falls back to defaults.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("[settings] corrupt stored settings ({e}), using defaults");
            Settings::default()
        })
    }
}

fn num(key: &str, value: &str, default: f64, lo: f64, hi: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= lo && v <= hi => v,
        _ => {
            log::warn!("[settings] bad {key} {value:?}, using {default}");
            default
        }
    }
}

fn flag(key: &str, value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => true,
        "false" | "0" | "off" | "no" => false,
        _ => {
            log::warn!("[settings] bad {key} {value:?}, using {default}");
            default
        }
    }
}

/// Persistence seam. The web adapter backs this with localStorage; tests
/// and native hosts use [`MemoryStore`].
pub trait SettingsStore {
    fn load(&self) -> Result<Option<Settings>>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// In-memory store holding the serialized form, like a real backend would.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.slot.borrow().as_deref().map(Settings::from_json))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.slot.borrow_mut() = Some(settings.to_json());
        Ok(())
    }
}
