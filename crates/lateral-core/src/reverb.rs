//! Reverb impulse-response synthesis.
//!
//! Impulses are derived artifacts keyed by `(type, decay)`; regeneration is
//! requested whenever either changes and runs off the interactive thread
//! (see `worker`). Synthesis is a pure function of the request and the RNG,
//! so a seeded RNG makes it fully deterministic.

use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{IMPULSE_CHANNEL_WIDTH, MAX_IMPULSE_SECONDS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReverbType {
    Room,
    Hall,
    Plate,
    Cathedral,
}

impl ReverbType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "room" => Some(ReverbType::Room),
            "hall" => Some(ReverbType::Hall),
            "plate" => Some(ReverbType::Plate),
            "cathedral" => Some(ReverbType::Cathedral),
            _ => None,
        }
    }

    pub fn preset(self) -> ReverbPreset {
        match self {
            ReverbType::Room => ReverbPreset {
                early_delay: 0.010,
                diffusion: 0.70,
                damping: 0.50,
                duration_mul: 1.0,
            },
            ReverbType::Hall => ReverbPreset {
                early_delay: 0.020,
                diffusion: 0.60,
                damping: 0.30,
                duration_mul: 2.0,
            },
            ReverbType::Plate => ReverbPreset {
                early_delay: 0.005,
                diffusion: 0.90,
                damping: 0.20,
                duration_mul: 1.5,
            },
            ReverbType::Cathedral => ReverbPreset {
                early_delay: 0.030,
                diffusion: 0.80,
                damping: 0.15,
                duration_mul: 3.0,
            },
        }
    }
}

/// Per-type synthesis constants.
#[derive(Clone, Copy, Debug)]
pub struct ReverbPreset {
    /// Early-reflection time constant in seconds.
    pub early_delay: f32,
    /// One-pole smoothing amount; only applied above 0.5.
    pub diffusion: f32,
    /// Linear-in-progress high-end rolloff, 0..1.
    pub damping: f32,
    /// Impulse length as a multiple of the decay setting.
    pub duration_mul: f32,
}

/// Cache/supersession key: type plus decay rounded to the millisecond, so
/// float jitter from a UI slider cannot defeat matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImpulseKey {
    reverb_type: ReverbType,
    decay_millis: u32,
}

impl ImpulseKey {
    pub fn new(reverb_type: ReverbType, decay_sec: f64) -> Self {
        Self {
            reverb_type,
            decay_millis: (decay_sec.max(0.0) * 1000.0).round() as u32,
        }
    }
}

/// A render request, as carried over the worker protocol.
#[derive(Clone, Copy, Debug)]
pub struct ImpulseSpec {
    pub id: u64,
    pub sample_rate: f32,
    pub reverb_type: ReverbType,
    pub decay_sec: f32,
}

impl ImpulseSpec {
    pub fn key(&self) -> ImpulseKey {
        ImpulseKey::new(self.reverb_type, self.decay_sec as f64)
    }
}

/// Rendered stereo impulse, as carried back over the worker protocol.
#[derive(Clone, Debug)]
pub struct ImpulseResponse {
    pub id: u64,
    pub sample_rate: f32,
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl ImpulseResponse {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Synthesize a stereo impulse response for `spec`.
///
/// Each channel: uniform noise, extra decaying noise inside the
/// early-reflection window, optional one-pole diffusion smoothing, then an
/// exponential decay envelope with progress-linear damping. Channels get
/// slightly different width scalars to decorrelate the stereo image.
pub fn render_impulse(spec: &ImpulseSpec, rng: &mut StdRng) -> ImpulseResponse {
    let preset = spec.reverb_type.preset();
    let decay = spec.decay_sec.max(0.05);
    let seconds = (preset.duration_mul * decay).min(MAX_IMPULSE_SECONDS);
    let len = ((seconds * spec.sample_rate) as usize).max(1);
    let early_window = 3.0 * preset.early_delay;
    let diffusion_weight = if preset.diffusion > 0.5 {
        preset.diffusion * 0.5
    } else {
        0.0
    };

    let mut channels: [Vec<f32>; 2] = [Vec::new(), Vec::new()];
    for (buf, width) in channels.iter_mut().zip(IMPULSE_CHANNEL_WIDTH) {
        let mut samples = vec![0.0f32; len];
        let mut prev = 0.0f32;
        for (i, out) in samples.iter_mut().enumerate() {
            let t = i as f32 / spec.sample_rate;
            let progress = i as f32 / len as f32;
            let mut s: f32 = rng.gen_range(-1.0..=1.0);
            if t < early_window {
                s += rng.gen_range(-1.0f32..=1.0) * (-t / preset.early_delay).exp() * 0.5;
            }
            if diffusion_weight > 0.0 {
                s = s * (1.0 - diffusion_weight) + prev * diffusion_weight;
            }
            prev = s;
            let envelope = (-t / (decay * 0.5)).exp() * (1.0 - progress * preset.damping);
            *out = s * envelope * width;
        }
        *buf = samples;
    }

    let [left, right] = channels;
    ImpulseResponse {
        id: spec.id,
        sample_rate: spec.sample_rate,
        left,
        right,
    }
}

const CACHE_CAP: usize = 8;

/// Small cache of rendered impulses so toggling between recent settings
/// reuses buffers instead of re-rendering.
#[derive(Default)]
pub struct ImpulseCache {
    map: FnvHashMap<ImpulseKey, ImpulseResponse>,
}

impl ImpulseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ImpulseKey) -> Option<&ImpulseResponse> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: ImpulseKey, response: ImpulseResponse) {
        // Entries are a few seconds of stereo audio each; wholesale
        // eviction at the cap keeps this trivially bounded.
        if self.map.len() >= CACHE_CAP && !self.map.contains_key(&key) {
            self.map.clear();
        }
        self.map.insert(key, response);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
