use crate::constants::HUD_ID;
use crate::hud;
use crate::input;
use crane_core::{KeyCommand, Simulation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn handle_keydown(ev: &web::KeyboardEvent, sim: &Rc<RefCell<Simulation>>) {
    let key = ev.key();
    let Some(cmd) = KeyCommand::parse(&key) else {
        return;
    };
    if ev.repeat() && !input::accepts_key_repeat(&cmd) {
        ev.prevent_default();
        return;
    }
    let mut sim = sim.borrow_mut();
    sim.on_key_down(&key);
    ev.prevent_default();
    refresh_hud(&sim);
}

fn handle_keyup(ev: &web::KeyboardEvent, sim: &Rc<RefCell<Simulation>>) {
    let mut sim = sim.borrow_mut();
    if sim.on_key_up(&ev.key()).is_some() {
        ev.prevent_default();
        refresh_hud(&sim);
    }
}

fn refresh_hud(sim: &Simulation) {
    if let Some(document) = web::window().and_then(|w| w.document()) {
        hud::refresh(&document, HUD_ID, sim);
    }
}

/// Route window key events into the simulation. Focus loss releases every
/// held control, since the matching keyup never arrives.
pub fn wire_keyboard(sim: Rc<RefCell<Simulation>>) {
    let Some(window) = web::window() else {
        return;
    };

    let sim_down = sim.clone();
    let keydown = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_keydown(&ev, &sim_down);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    keydown.forget();

    let sim_up = sim.clone();
    let keyup = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_keyup(&ev, &sim_up);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());
    keyup.forget();

    let blur = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        let mut sim = sim.borrow_mut();
        sim.release_all_keys();
        refresh_hud(&sim);
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref());
    blur.forget();
}
