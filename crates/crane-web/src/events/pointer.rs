use crate::constants::{WHEEL_LINE_PX, WHEEL_PAGE_PX};
use crate::input;
use crane_core::{CameraId, Simulation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Shared state captured by the pointer closures.
#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub sim: Rc<RefCell<Simulation>>,
    pub drag_state: Rc<RefCell<input::DragState>>,
}

/// Drag orbits and the wheel zooms the inspect camera; other cameras are fixed.
pub fn wire_pointer_handlers(w: PointerWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
}

fn inspecting(sim: &Rc<RefCell<Simulation>>) -> bool {
    sim.borrow().active_camera() == CameraId::Inspect
}

fn wire_pointerdown(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        if inspecting(&w.sim) {
            w.drag_state.borrow_mut().begin(ev.pointer_id(), pos);
            _ = w.canvas.set_pointer_capture(ev.pointer_id());
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let delta = w.drag_state.borrow_mut().advance(ev.pointer_id(), pos);
        if let Some(d) = delta {
            if inspecting(&w.sim) {
                w.sim.borrow_mut().orbit_mut().drag(d.x, d.y);
            }
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w.drag_state.borrow_mut().end(ev.pointer_id());
        _ = w.canvas.release_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    for name in ["pointerup", "pointercancel"] {
        _ = canvas_for_listener.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_wheel(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        if !inspecting(&w.sim) {
            return;
        }
        let delta = input::wheel_delta_px(ev.delta_y(), ev.delta_mode(), WHEEL_LINE_PX, WHEEL_PAGE_PX);
        w.sim.borrow_mut().orbit_mut().scroll(delta);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
