//! User input wiring: play/pause button, keyboard controls, visibility.
//! The engine never sees a DOM type; handlers translate events into engine
//! and settings calls, then persist.

use std::cell::RefCell;
use std::rc::Rc;

use lateral_core::{Motion, MotionEngine, Settings, SettingsStore};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::AudioGraph;
use crate::dom;
use crate::storage::LocalStore;

pub fn toggle_play(
    engine: &Rc<RefCell<MotionEngine>>,
    settings: &Rc<RefCell<Settings>>,
    graph: &Rc<RefCell<AudioGraph>>,
) {
    let cfg = settings.borrow().waveform();
    let mut eng = engine.borrow_mut();
    if eng.is_playing() {
        eng.pause(&cfg);
    } else {
        // Browsers gate audio output on a user gesture; this is one.
        graph.borrow().resume();
        eng.play();
    }
}

pub fn wire_play_toggle(
    document: &web::Document,
    engine: Rc<RefCell<MotionEngine>>,
    settings: Rc<RefCell<Settings>>,
    graph: Rc<RefCell<AudioGraph>>,
) {
    dom::add_click_listener(document, "play-toggle", move || {
        toggle_play(&engine, &settings, &graph);
    });
}

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    engine: &Rc<RefCell<MotionEngine>>,
    settings: &Rc<RefCell<Settings>>,
    store: &Rc<LocalStore>,
    graph: &Rc<RefCell<AudioGraph>>,
) {
    let key = ev.key();
    let mut changed = true;
    {
        let mut s = settings.borrow_mut();
        match key.as_str() {
            "ArrowRight" | "+" | "=" => {
                s.cycles_per_minute = (s.cycles_per_minute + 5.0).min(120.0);
            }
            "ArrowLeft" | "-" | "_" => {
                s.cycles_per_minute = (s.cycles_per_minute - 5.0).max(5.0);
            }
            "ArrowUp" => {
                s.tone_volume = (s.tone_volume + 0.05).min(1.0);
                ev.prevent_default();
            }
            "ArrowDown" => {
                s.tone_volume = (s.tone_volume - 0.05).max(0.0);
                ev.prevent_default();
            }
            "m" | "M" => {
                s.motion = match s.motion {
                    Motion::Sine => Motion::Triangle,
                    Motion::Triangle => Motion::Sine,
                };
            }
            "v" | "V" => {
                s.reverb_enabled = !s.reverb_enabled;
            }
            _ => changed = false,
        }
    }
    if changed {
        persist(store, settings);
        return;
    }
    if key == " " {
        toggle_play(engine, settings, graph);
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(
    engine: Rc<RefCell<MotionEngine>>,
    settings: Rc<RefCell<Settings>>,
    store: Rc<LocalStore>,
    graph: Rc<RefCell<AudioGraph>>,
) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &engine, &settings, &store, &graph);
        }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// The interval ticker keeps motion and panning alive while hidden; this
/// listener only logs the transition for debugging.
pub fn wire_visibility(document: &web::Document) {
    let doc = document.clone();
    let closure = Closure::wrap(Box::new(move || {
        log::debug!("[frame] visibility changed: hidden={}", doc.hidden());
    }) as Box<dyn FnMut()>);
    let _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn persist(store: &Rc<LocalStore>, settings: &Rc<RefCell<Settings>>) {
    if let Err(e) = store.save(&settings.borrow()) {
        log::warn!("[storage] save failed: {e}");
    }
}
