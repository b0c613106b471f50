use crate::constants::{HUD_ID, MAX_FRAME_DT_SEC};
use crate::hud;
use crate::input;
use crate::render;
use crane_core::{DrawList, MeshCache, Simulation};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub sim: Rc<RefCell<Simulation>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,
    pub meshes: MeshCache,
    pub draw_list: DrawList,
    pub last_instant: Instant,
    pub last_hud: String,
    pub hud_shown: bool,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).min(Duration::from_secs_f32(MAX_FRAME_DT_SEC));
        self.last_instant = now;

        let mut sim = self.sim.borrow_mut();
        sim.tick(dt);

        if sim.hud_visible() != self.hud_shown {
            self.hud_shown = sim.hud_visible();
            hud::set_visible(&self.document, HUD_ID, self.hud_shown);
        }
        if let Some(text) = hud::hud_text(&sim) {
            if text != self.last_hud {
                hud::set_text(&self.document, HUD_ID, &text);
                self.last_hud = text;
            }
        }

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
        let (w, h) = gpu.size();
        let view_proj = sim.camera(input::aspect_ratio(w, h)).view_proj();
        self.meshes.build(sim.scene(), &mut self.draw_list);
        drop(sim);

        match gpu.render(view_proj, &self.draw_list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}
