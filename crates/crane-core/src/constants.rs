use glam::Vec3;
use std::f32::consts::{FRAC_PI_3, PI};

// Crane tuning constants shared by the simulation and both frontends.
// All lengths are scene units; the crane tower is centred on the origin.

// Structure
pub const TOWER_HEIGHT: f32 = 140.0;
pub const TOWER_WIDTH: f32 = BASE_SIZE / 2.0;
pub const BASE_SIZE: f32 = 20.0; // cube edge of the crane foundation
pub const BOOM_LENGTH: f32 = 160.0;
pub const BOOM_THICKNESS: f32 = TOWER_WIDTH;
pub const TROLLEY_DIAMETER: f32 = 6.0;
pub const FLOOR_HEIGHT: f32 = 60.0;
pub const SCENE_MAX_LENGTH: f32 = 250.0;

// Container
pub const CONTAINER_SIDE: f32 = 25.0;
pub const CONTAINER_HEIGHT: f32 = 25.0;
pub const CONTAINER_CENTER_X: f32 = 70.0;
pub const CONTAINER_CENTER_Z: f32 = -10.0;

// Claw
pub const CLAW_BASE_SIZE: f32 = 5.0;
pub const CLAW_CYLINDER_LENGTH: f32 = 10.0;
pub const CLAW_TIP_LENGTH: f32 = 13.0;
pub const CLAW_BOUNDS_RADIUS: f32 = CLAW_TIP_LENGTH / 1.5;
pub const CLAW_BOUNDS_OFFSET_Y: f32 = -CLAW_CYLINDER_LENGTH / 3.0;
pub const CABLE_DIAMETER: f32 = 1.0;

// Degree-of-freedom limits
pub const CABLE_MIN_LENGTH: f32 = 10.0;
pub const CABLE_MAX_LENGTH: f32 = 140.0;
pub const TROLLEY_MIN_OFFSET: f32 = -0.1 * BOOM_LENGTH / 2.0;
pub const TROLLEY_MAX_OFFSET: f32 = 0.9 * BOOM_LENGTH / 2.0;
pub const CLAW_TIP_MIN_ANGLE: f32 = FRAC_PI_3;
pub const CLAW_TIP_MAX_ANGLE: f32 = 5.0 * PI / 6.0;
pub const CLAW_TIP_START_ANGLE: f32 = 2.0 * PI / 3.0;

// Rates per second
pub const BOOM_SPEED: f32 = 5.0;
pub const TROLLEY_SPEED: f32 = 100.0;
pub const CABLE_SPEED: f32 = 100.0;
pub const CLAW_TIP_SPEED: f32 = 5.0;

// Pick-and-place targets (boom/trolley pose above the container)
pub const TARGET_BOOM_ANGLE: f32 = 0.1615;
pub const TARGET_TROLLEY_OFFSET: f32 = 38.5;

// Cargo placement
pub const DEFAULT_CARGO_COUNT: usize = 10;
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: usize = 10_000;
pub const CARGO_REACH_RADIUS: f32 = BOOM_LENGTH * 7.0 / 10.0;
pub const GROUND_Y: f32 = -TOWER_HEIGHT / 2.0 - BASE_SIZE;
pub const CARGO_Y: f32 = GROUND_Y + CONTAINER_HEIGHT / 2.0;

// Cameras
pub const CAMERA_UNIT: f32 = 300.0;
pub const PERSPECTIVE_FOVY_DEGREES: f32 = 70.0;

// Colors (linear RGB)
pub const CRANE_COLOR: [f32; 3] = [0.05, 0.05, 0.05];
pub const FLOOR_COLOR: [f32; 3] = [0.27, 0.27, 0.27];
pub const CONTAINER_WALL_COLOR: [f32; 3] = [0.6, 0.47, 0.86];
pub const CONTAINER_FLOOR_COLOR: [f32; 3] = [0.6, 0.27, 0.29];
pub const CARGO_COLOR: [f32; 3] = [0.62, 0.32, 0.32];
pub const BOUNDS_COLOR: [f32; 3] = [0.53, 0.53, 0.53];
pub const CLEAR_COLOR: [f64; 3] = [0.73, 0.73, 0.73];

#[inline]
pub fn crane_base_center() -> Vec3 {
    Vec3::new(0.0, -TOWER_HEIGHT / 2.0 - BASE_SIZE / 2.0, 0.0)
}

#[inline]
pub fn container_center() -> Vec3 {
    Vec3::new(CONTAINER_CENTER_X, CARGO_Y, CONTAINER_CENTER_Z)
}
