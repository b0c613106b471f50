#![cfg(target_arch = "wasm32")]
use crane_core::{DrawList, MeshCache, SimConfig, Simulation};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod hud;
mod input;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("crane-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Fresh layout per page load, like a new yard every visit.
fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, constants::CANVAS_ID)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::wire_canvas_resize(&canvas);

    let config = SimConfig {
        seed: random_seed(),
        ..SimConfig::default()
    };
    let sim = Rc::new(RefCell::new(Simulation::new(config)?));

    events::wire_keyboard(sim.clone());
    events::wire_pointer_handlers(events::PointerWiring {
        canvas: canvas.clone(),
        sim: sim.clone(),
        drag_state: Rc::new(RefCell::new(input::DragState::default())),
    });

    let gpu = frame::init_gpu(&canvas).await;
    let hud_shown = sim.borrow().hud_visible();
    hud::set_visible(&document, constants::HUD_ID, hud_shown);
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        sim,
        canvas,
        document,
        gpu,
        meshes: MeshCache::new(),
        draw_list: DrawList::default(),
        last_instant: Instant::now(),
        last_hud: String::new(),
        hud_shown,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
