//! Canvas-2D ball and trail drawing. A pure consumer of the engine's
//! position and trail history; nothing here feeds back into motion state.

use lateral_core::TrailHistory;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const BALL_COLOR: &str = "#7fd1ff";

pub struct BallRenderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl BallRenderer {
    pub fn new(canvas: &web::HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    pub fn draw(&self, position: f64, trail: &TrailHistory, wave_force: f64) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.ctx.clear_rect(0.0, 0.0, w, h);

        let y = h * 0.5;
        let radius = (h * 0.05).min(w * 0.03).max(4.0);
        self.ctx.set_fill_style_str(BALL_COLOR);

        // Trail, oldest first, fading up to the current position.
        let n = trail.len();
        if n > 1 {
            let strength = 0.1 + 0.3 * wave_force;
            for (i, p) in trail.iter().enumerate() {
                let age = (i + 1) as f64 / n as f64;
                self.ctx.set_global_alpha(age * age * strength);
                self.circle(ball_x(p as f64, w), y, radius * (0.5 + 0.4 * age));
            }
        }

        self.ctx.set_global_alpha(1.0);
        self.circle(ball_x(position, w), y, radius);
    }

    fn circle(&self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(x, y, radius, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }
}

// Position -1..1 maps to a centered band spanning 90% of the width.
#[inline]
fn ball_x(position: f64, width: f64) -> f64 {
    (0.5 + 0.45 * position) * width
}
