use crane_core::KeyCommand;
use glam::Vec2;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last: Vec2,
}

impl DragState {
    /// Start tracking a drag at `pos`.
    pub fn begin(&mut self, pointer_id: i32, pos: Vec2) {
        self.active = true;
        self.pointer_id = pointer_id;
        self.last = pos;
    }

    /// Movement since the previous sample, or `None` for a foreign pointer
    /// or when no drag is in progress.
    pub fn advance(&mut self, pointer_id: i32, pos: Vec2) -> Option<Vec2> {
        if !self.active || pointer_id != self.pointer_id {
            return None;
        }
        let delta = pos - self.last;
        self.last = pos;
        Some(delta)
    }

    pub fn end(&mut self, pointer_id: i32) {
        if pointer_id == self.pointer_id {
            self.active = false;
        }
    }
}

/// Normalise a wheel delta to pixels. `mode` is `WheelEvent.deltaMode`
/// (0 pixels, 1 lines, 2 pages).
#[inline]
pub fn wheel_delta_px(delta_y: f64, mode: u32, line_px: f32, page_px: f32) -> f32 {
    let d = delta_y as f32;
    match mode {
        1 => d * line_px,
        2 => d * page_px,
        _ => d,
    }
}

/// Auto-repeat keydowns only matter for held controls; toggles and camera
/// switches fire once per physical press.
#[inline]
pub fn accepts_key_repeat(cmd: &KeyCommand) -> bool {
    matches!(cmd, KeyCommand::Control(_))
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width() as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height() as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
