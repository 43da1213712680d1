#![cfg(target_arch = "wasm32")]
//! Browser adapter: wires the motion engine to requestAnimationFrame, a
//! background-safe interval ticker, the WebAudio graph and localStorage.

use std::cell::RefCell;
use std::rc::Rc;

use lateral_core::{AudioDirector, MotionEngine, Settings, SettingsStore, TrailHistory};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod dom;
mod events;
mod frame;
mod render;
mod storage;
mod worker;

const REVERB_WORKER_URL: &str = "reverb-worker.js";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("lateral-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {e:?}");
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::wire_canvas_resize(&canvas);

    // Persisted settings, or defaults on first visit / corrupt storage.
    let store = Rc::new(storage::LocalStore::new());
    let settings = Rc::new(RefCell::new(match store.load() {
        Ok(Some(s)) => s,
        Ok(None) => Settings::default(),
        Err(e) => {
            log::warn!("[storage] load failed ({e}), using defaults");
            Settings::default()
        }
    }));

    let engine = Rc::new(RefCell::new(MotionEngine::new()));
    let director = Rc::new(RefCell::new(AudioDirector::new()));

    let graph = audio::AudioGraph::build().map_err(|_| anyhow::anyhow!("audio graph init"))?;
    let graph = Rc::new(RefCell::new(graph));
    let reverb = worker::ReverbRenderer::new(REVERB_WORKER_URL);

    // Music is optional; the page names a track via a data attribute.
    if let Some(url) = canvas.get_attribute("data-music-src") {
        let graph_music = graph.clone();
        let director_music = director.clone();
        spawn_local(async move {
            let ctx = graph_music.borrow().context();
            match audio::load_music_buffer(&ctx, &url).await {
                Ok(buffer) => {
                    director_music.borrow_mut().music_ready(buffer.duration());
                    graph_music.borrow_mut().on_music_buffer_ready(buffer);
                }
                Err(e) => log::warn!("[audio] music load failed: {e:?}"),
            }
        });
    }

    events::wire_play_toggle(&document, engine.clone(), settings.clone(), graph.clone());
    events::wire_global_keydown(engine.clone(), settings.clone(), store.clone(), graph.clone());
    events::wire_visibility(&document);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        engine,
        settings,
        director,
        graph,
        reverb,
        cache: lateral_core::ImpulseCache::new(),
        inflight: None,
        trail: TrailHistory::default(),
        renderer: render::BallRenderer::new(&canvas)
            .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?,
    }));
    frame::start_loop(frame_ctx.clone());
    frame::start_interval(frame_ctx);

    Ok(())
}
