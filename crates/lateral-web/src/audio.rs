//! WebAudio graph: a continuous tone through stereo panner and gain, a
//! rate-controllable music source, and a convolver reverb with wet/dry mix.
//!
//! The graph is a dumb consumer: every parameter change arrives as an
//! [`AudioCommand`] from the core director and is scheduled as a short
//! time-stamped ramp, never a synchronous wait.

use anyhow::anyhow;
use lateral_core::{AudioCommand, ImpulseResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

// Ramp time constants (seconds) for scheduled parameter moves.
const PARAM_TAU: f64 = 0.02;
const RATE_TAU: f64 = 0.05;

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, ()> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(())
        }
    }
}

fn create_panner(audio_ctx: &web::AudioContext, label: &str) -> Result<web::StereoPannerNode, ()> {
    match web::StereoPannerNode::new(audio_ctx) {
        Ok(p) => {
            p.pan().set_value(0.0);
            Ok(p)
        }
        Err(e) => {
            log::error!("{} StereoPannerNode error: {:?}", label, e);
            Err(())
        }
    }
}

pub struct AudioGraph {
    ctx: web::AudioContext,
    tone_osc: web::OscillatorNode,
    tone_pan: web::StereoPannerNode,
    tone_gain: web::GainNode,
    music_pan: web::StereoPannerNode,
    music_gain: web::GainNode,
    music_src: Option<web::AudioBufferSourceNode>,
    music_buffer: Option<web::AudioBuffer>,
    convolver: web::ConvolverNode,
    reverb_wet: web::GainNode,
    reverb_dry: web::GainNode,
}

impl AudioGraph {
    /// Build the full node graph. The tone oscillator starts immediately at
    /// zero gain; audibility is entirely gain-driven from then on.
    pub fn build() -> Result<Self, ()> {
        let ctx = web::AudioContext::new().map_err(|e| {
            log::error!("AudioContext error: {:?}", e);
        })?;

        // Sum bus, then parallel dry/wet paths to the destination.
        let master = create_gain(&ctx, 1.0, "master")?;
        let reverb_dry = create_gain(&ctx, 1.0, "reverb dry")?;
        let reverb_wet = create_gain(&ctx, 0.0, "reverb wet")?;
        let convolver = web::ConvolverNode::new(&ctx).map_err(|e| {
            log::error!("ConvolverNode error: {:?}", e);
        })?;
        convolver.set_normalize(true);
        let _ = master.connect_with_audio_node(&reverb_dry);
        let _ = reverb_dry.connect_with_audio_node(&ctx.destination());
        let _ = master.connect_with_audio_node(&convolver);
        let _ = convolver.connect_with_audio_node(&reverb_wet);
        let _ = reverb_wet.connect_with_audio_node(&ctx.destination());

        // Tone chain: oscillator -> gain -> panner -> master.
        let tone_osc = web::OscillatorNode::new(&ctx).map_err(|e| {
            log::error!("OscillatorNode error: {:?}", e);
        })?;
        tone_osc.set_type(web::OscillatorType::Sine);
        let tone_gain = create_gain(&ctx, 0.0, "tone")?;
        let tone_pan = create_panner(&ctx, "tone")?;
        let _ = tone_osc.connect_with_audio_node(&tone_gain);
        let _ = tone_gain.connect_with_audio_node(&tone_pan);
        let _ = tone_pan.connect_with_audio_node(&master);
        let _ = tone_osc.start();

        // Music chain: (source created per start) -> gain -> panner -> master.
        let music_gain = create_gain(&ctx, 0.0, "music")?;
        let music_pan = create_panner(&ctx, "music")?;
        let _ = music_gain.connect_with_audio_node(&music_pan);
        let _ = music_pan.connect_with_audio_node(&master);

        Ok(Self {
            ctx,
            tone_osc,
            tone_pan,
            tone_gain,
            music_pan,
            music_gain,
            music_src: None,
            music_buffer: None,
            convolver,
            reverb_wet,
            reverb_dry,
        })
    }

    pub fn context(&self) -> web::AudioContext {
        self.ctx.clone()
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate()
    }

    /// Resume the context; browsers gate audio on a user gesture.
    pub fn resume(&self) {
        let _ = self.ctx.resume();
    }

    pub fn on_music_buffer_ready(&mut self, buffer: web::AudioBuffer) {
        self.music_buffer = Some(buffer);
    }

    /// Apply one tick's worth of director commands as scheduled ramps.
    pub fn apply(&mut self, commands: &[AudioCommand]) {
        let now = self.ctx.current_time();
        for cmd in commands {
            match *cmd {
                AudioCommand::ToneFrequency(hz) => {
                    let _ = self.tone_osc.frequency().set_target_at_time(hz, now, PARAM_TAU);
                }
                AudioCommand::TonePan(pan) => {
                    let _ = self.tone_pan.pan().set_target_at_time(pan, now, PARAM_TAU);
                }
                AudioCommand::ToneGain(gain) => {
                    let _ = self.tone_gain.gain().set_target_at_time(gain, now, PARAM_TAU);
                }
                AudioCommand::MusicPan(pan) => {
                    let _ = self.music_pan.pan().set_target_at_time(pan, now, PARAM_TAU);
                }
                AudioCommand::MusicGain(gain) => {
                    let _ = self.music_gain.gain().set_target_at_time(gain, now, PARAM_TAU);
                }
                AudioCommand::MusicRate(rate) => {
                    if let Some(src) = &self.music_src {
                        let _ = src.playback_rate().set_target_at_time(rate, now, RATE_TAU);
                    }
                }
                AudioCommand::ReverbMix { wet, dry } => {
                    let _ = self.reverb_wet.gain().set_target_at_time(wet, now, RATE_TAU);
                    let _ = self.reverb_dry.gain().set_target_at_time(dry, now, RATE_TAU);
                }
                AudioCommand::StartMusic { offset_sec } => self.start_music(offset_sec),
                AudioCommand::StopMusic => self.stop_music(),
            }
        }
    }

    // Source nodes are one-shot; each start creates a fresh one at the
    // director's tracked read offset.
    fn start_music(&mut self, offset_sec: f64) {
        self.stop_music();
        let Some(buffer) = &self.music_buffer else {
            return;
        };
        match web::AudioBufferSourceNode::new(&self.ctx) {
            Ok(src) => {
                src.set_buffer(Some(buffer));
                src.set_loop(true);
                let _ = src.connect_with_audio_node(&self.music_gain);
                if let Err(e) = src.start_with_when_and_grain_offset(0.0, offset_sec) {
                    log::error!("music start error: {:?}", e);
                    return;
                }
                self.music_src = Some(src);
            }
            Err(e) => log::error!("AudioBufferSourceNode error: {:?}", e),
        }
    }

    fn stop_music(&mut self) {
        if let Some(src) = self.music_src.take() {
            let _ = src.stop();
            src.disconnect().ok();
        }
    }

    /// Upload a rendered impulse into the convolver. Always applied:
    /// supersession is last-write-wins by arrival order.
    pub fn set_impulse(&self, impulse: &ImpulseResponse) {
        let len = impulse.len() as u32;
        if len == 0 {
            return;
        }
        match self.ctx.create_buffer(2, len, impulse.sample_rate) {
            Ok(buffer) => {
                let mut left = impulse.left.clone();
                let mut right = impulse.right.clone();
                let _ = buffer.copy_to_channel(&mut left, 0);
                let _ = buffer.copy_to_channel(&mut right, 1);
                self.convolver.set_buffer(Some(&buffer));
            }
            Err(e) => log::error!("impulse buffer error: {:?}", e),
        }
    }
}

/// Fetch and decode a music asset into an AudioBuffer.
pub async fn load_music_buffer(
    ctx: &web::AudioContext,
    url: &str,
) -> anyhow::Result<web::AudioBuffer> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {url}: {e:?}"))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|e| anyhow!("fetch response: {e:?}"))?;
    let array_buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow!("array buffer: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow!("array buffer: {e:?}"))?;
    let decoded = JsFuture::from(
        ctx.decode_audio_data(&array_buffer.dyn_into().map_err(|e| anyhow!("{e:?}"))?)
            .map_err(|e| anyhow!("decode: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow!("decode: {e:?}"))?;
    decoded.dyn_into().map_err(|e| anyhow!("decoded: {e:?}"))
}
