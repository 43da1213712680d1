//! Core motion/timing engine and audio-sync logic for lateral.
//!
//! Everything here is platform-free and delta-driven; the web frontend
//! supplies timestamps and applies the resulting audio commands.

pub mod audio;
pub mod clock;
pub mod constants;
pub mod error;
pub mod motion;
pub mod reverb;
pub mod settings;
pub mod trail;
pub mod waveform;

#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use audio::*;
pub use clock::*;
pub use constants::*;
pub use error::*;
pub use motion::*;
pub use reverb::*;
pub use settings::*;
pub use trail::*;
pub use waveform::*;

#[cfg(not(target_arch = "wasm32"))]
pub use worker::*;
