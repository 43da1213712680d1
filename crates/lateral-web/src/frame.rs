//! The two tickers. The requestAnimationFrame loop drives rendering and
//! audio while visible; the interval ticker keeps virtual time and panning
//! moving when the tab is hidden and frames stop. Both advance the one
//! engine through a shared timestamp baseline, so overlapping firings never
//! double-count time.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lateral_core::{
    AudioDirector, ImpulseCache, ImpulseKey, MotionEngine, Settings, TickPath, TrailHistory,
    INTERVAL_TICK_MS,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::AudioGraph;
use crate::dom;
use crate::render::BallRenderer;
use crate::worker::ReverbRenderer;

pub struct FrameContext {
    pub engine: Rc<RefCell<MotionEngine>>,
    pub settings: Rc<RefCell<Settings>>,
    pub director: Rc<RefCell<AudioDirector>>,
    pub graph: Rc<RefCell<AudioGraph>>,
    pub reverb: ReverbRenderer,
    pub cache: ImpulseCache,
    pub inflight: Option<(u64, ImpulseKey)>,
    pub trail: TrailHistory,
    pub renderer: BallRenderer,
}

impl FrameContext {
    /// Display-refresh tick: advance, sync audio, draw.
    pub fn frame(&mut self) {
        let (position, speed, delta) = self.advance(TickPath::Frame);
        self.sync_audio(delta, position, speed);
        self.trail.push(position as f32);
        let wave_force = self.settings.borrow().wave_force;
        self.renderer.draw(position, &self.trail, wave_force);
    }

    /// Interval tick: advance and sync audio only. No drawing; this path
    /// exists so panning stays correct while the frame ticker is stalled.
    pub fn interval_tick(&mut self) {
        let (position, speed, delta) = self.advance(TickPath::Interval);
        self.sync_audio(delta, position, speed);
    }

    fn advance(&mut self, path: TickPath) -> (f64, f64, Duration) {
        let cfg = self.settings.borrow().waveform();
        let mut engine = self.engine.borrow_mut();
        let delta = engine.advance(dom::now_ms(), path, &cfg);
        (engine.position(), engine.speed(), delta)
    }

    fn sync_audio(&mut self, delta: Duration, position: f64, speed: f64) {
        let settings = self.settings.borrow();
        let commands = self
            .director
            .borrow_mut()
            .tick(delta, position, speed, &settings);
        let mut graph = self.graph.borrow_mut();
        graph.apply(&commands);

        // Apply whatever impulse arrived most recently; cache it when it
        // answers the in-flight request.
        if let Some(resp) = self.reverb.take_latest() {
            match self.inflight {
                Some((id, key)) if id == resp.id => {
                    self.inflight = None;
                    self.cache.insert(key, resp.clone());
                }
                _ => log::debug!("[reverb] superseded response #{} applied", resp.id),
            }
            graph.set_impulse(&resp);
        }

        if let Some(spec) = self
            .director
            .borrow_mut()
            .impulse_request(&settings, graph.sample_rate())
        {
            if let Some(hit) = self.cache.get(&spec.key()) {
                graph.set_impulse(hit);
            } else {
                self.inflight = Some((spec.id, spec.key()));
                self.reverb.submit(&spec);
            }
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

pub fn start_interval(frame_ctx: Rc<RefCell<FrameContext>>) {
    let closure = Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().interval_tick();
    }) as Box<dyn FnMut()>);
    if let Some(w) = web::window() {
        let _ = w.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            INTERVAL_TICK_MS,
        );
    }
    closure.forget();
}
