//! Reverb impulse rendering off the interactive thread.
//!
//! Requests go to a Web Worker as `{id, sampleRate, type, decay}`; responses
//! come back with the two channel buffers transferred, not copied. If the
//! worker cannot be constructed the renderer degrades to synchronous
//! in-thread synthesis: briefly blocking, functionally identical.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Float32Array, Object, Reflect};
use lateral_core::{render_impulse, ImpulseResponse, ImpulseSpec, ReverbType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn type_name(reverb_type: ReverbType) -> &'static str {
    match reverb_type {
        ReverbType::Room => "room",
        ReverbType::Hall => "hall",
        ReverbType::Plate => "plate",
        ReverbType::Cathedral => "cathedral",
    }
}

pub struct ReverbRenderer {
    worker: Option<web::Worker>,
    // Last-write-wins mailbox: a newer response simply overwrites an
    // unconsumed older one.
    inbox: Rc<RefCell<Option<ImpulseResponse>>>,
    rng: RefCell<StdRng>,
}

impl ReverbRenderer {
    pub fn new(script_url: &str) -> Self {
        let inbox: Rc<RefCell<Option<ImpulseResponse>>> = Rc::new(RefCell::new(None));
        let worker = match web::Worker::new(script_url) {
            Ok(w) => {
                let inbox_rx = inbox.clone();
                let onmessage = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
                    match parse_response(&ev.data()) {
                        Some(resp) => *inbox_rx.borrow_mut() = Some(resp),
                        None => log::warn!("[reverb] malformed worker response"),
                    }
                }) as Box<dyn FnMut(web::MessageEvent)>);
                w.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
                onmessage.forget();
                Some(w)
            }
            Err(e) => {
                log::warn!("[reverb] worker unavailable ({e:?}); rendering impulses inline");
                None
            }
        };
        Self {
            worker,
            inbox,
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    /// Queue a render. Never blocks on the worker path.
    pub fn submit(&self, spec: &ImpulseSpec) {
        match &self.worker {
            Some(w) => {
                let msg = Object::new();
                let _ = Reflect::set(&msg, &"id".into(), &JsValue::from_f64(spec.id as f64));
                let _ = Reflect::set(
                    &msg,
                    &"sampleRate".into(),
                    &JsValue::from_f64(spec.sample_rate as f64),
                );
                let _ = Reflect::set(
                    &msg,
                    &"type".into(),
                    &JsValue::from_str(type_name(spec.reverb_type)),
                );
                let _ = Reflect::set(
                    &msg,
                    &"decay".into(),
                    &JsValue::from_f64(spec.decay_sec as f64),
                );
                if let Err(e) = w.post_message(&msg) {
                    log::error!("[reverb] post_message failed: {e:?}");
                    self.render_inline(spec);
                }
            }
            None => self.render_inline(spec),
        }
    }

    fn render_inline(&self, spec: &ImpulseSpec) {
        let resp = render_impulse(spec, &mut self.rng.borrow_mut());
        *self.inbox.borrow_mut() = Some(resp);
    }

    /// The newest unconsumed response, if any.
    pub fn take_latest(&self) -> Option<ImpulseResponse> {
        self.inbox.borrow_mut().take()
    }
}

fn parse_response(data: &JsValue) -> Option<ImpulseResponse> {
    let id = Reflect::get(data, &"id".into()).ok()?.as_f64()? as u64;
    let sample_rate = Reflect::get(data, &"sampleRate".into()).ok()?.as_f64()? as f32;
    let left = Reflect::get(data, &"left".into())
        .ok()?
        .dyn_into::<Float32Array>()
        .ok()?
        .to_vec();
    let right = Reflect::get(data, &"right".into())
        .ok()?
        .dyn_into::<Float32Array>()
        .ok()?
        .to_vec();
    Some(ImpulseResponse {
        id,
        sample_rate,
        left,
        right,
    })
}
