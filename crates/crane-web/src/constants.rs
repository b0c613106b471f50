// DOM ids and frame pacing for the web front-end.

pub const CANVAS_ID: &str = "app-canvas";
pub const HUD_ID: &str = "hud";

// Longest step fed to the simulation; a backgrounded tab resumes with a
// single bounded step instead of teleporting the crane.
pub const MAX_FRAME_DT_SEC: f32 = 0.25;

// WheelEvent.deltaMode scaling to pixels
pub const WHEEL_LINE_PX: f32 = 16.0;
pub const WHEEL_PAGE_PX: f32 = 800.0;
