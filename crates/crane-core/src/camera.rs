//! Named viewpoints onto the crane scene.
//!
//! These types avoid platform-specific APIs and are shared by the web and
//! native frontends, which only supply the viewport aspect ratio.

use crate::constants::{CABLE_MAX_LENGTH, CAMERA_UNIT, PERSPECTIVE_FOVY_DEGREES};
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraId {
    Front,
    Side,
    Top,
    Ortho,
    Perspective,
    Mobile,
    #[default]
    Inspect,
}

impl CameraId {
    pub const ALL: [CameraId; 7] = [
        CameraId::Front,
        CameraId::Side,
        CameraId::Top,
        CameraId::Ortho,
        CameraId::Perspective,
        CameraId::Mobile,
        CameraId::Inspect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CameraId::Front => "Front",
            CameraId::Side => "Side",
            CameraId::Top => "Top",
            CameraId::Ortho => "Ortho",
            CameraId::Perspective => "Perspective",
            CameraId::Mobile => "Mobile",
            CameraId::Inspect => "Inspect",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Symmetric box; `half_extent` is the vertical half-height.
    Orthographic {
        half_extent: f32,
        znear: f32,
        zfar: f32,
    },
    Perspective {
        fovy_radians: f32,
        znear: f32,
        zfar: f32,
    },
}

/// Right-handed camera description.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub projection: Projection,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        match self.projection {
            Projection::Orthographic {
                half_extent,
                znear,
                zfar,
            } => {
                let hw = half_extent * aspect;
                Mat4::orthographic_rh(-hw, hw, -half_extent, half_extent, znear, zfar)
            }
            Projection::Perspective {
                fovy_radians,
                znear,
                zfar,
            } => Mat4::perspective_rh(fovy_radians, aspect, znear, zfar),
        }
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Drag-to-orbit and wheel-to-zoom state for the inspect camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitController {
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
}

const ORBIT_RADIANS_PER_PIXEL: f32 = 0.005;
const ORBIT_PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const ZOOM_MIN: f32 = 0.25;
const ZOOM_MAX: f32 = 8.0;

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
        }
    }
}

impl OrbitController {
    pub fn drag(&mut self, dx_px: f32, dy_px: f32) {
        self.yaw -= dx_px * ORBIT_RADIANS_PER_PIXEL;
        self.pitch = (self.pitch + dy_px * ORBIT_RADIANS_PER_PIXEL)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    /// `delta` follows the DOM wheel convention: positive scrolls down and
    /// zooms out.
    pub fn scroll(&mut self, delta: f32) {
        self.zoom = (self.zoom * (-delta * 0.001).exp()).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn eye(&self, distance: f32) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, sp, cy * cp) * distance
    }
}

fn ortho(half_extent: f32, znear: f32, zfar: f32) -> Projection {
    Projection::Orthographic {
        half_extent,
        znear,
        zfar,
    }
}

fn perspective() -> Projection {
    Projection::Perspective {
        fovy_radians: PERSPECTIVE_FOVY_DEGREES.to_radians(),
        znear: 1.0,
        zfar: 10.0 * CAMERA_UNIT,
    }
}

/// Build the camera for `id`. `claw_world` is the claw's world matrix, used
/// by the claw-mounted mobile camera.
pub fn camera_for(id: CameraId, aspect: f32, orbit: &OrbitController, claw_world: Mat4) -> Camera {
    let u = CAMERA_UNIT;
    let fixed = |eye: Vec3, up: Vec3, projection: Projection| Camera {
        eye,
        target: Vec3::ZERO,
        up,
        aspect,
        projection,
    };
    match id {
        CameraId::Front => fixed(Vec3::new(0.0, 0.0, u / 2.0), Vec3::Y, ortho(u, -u, u)),
        CameraId::Side => fixed(Vec3::new(u / 2.0, 0.0, 0.0), Vec3::Y, ortho(u, -u, u)),
        CameraId::Top => fixed(Vec3::new(0.0, u, 0.0), Vec3::NEG_Z, ortho(u, -u, 2.0 * u)),
        CameraId::Ortho => fixed(
            Vec3::new(u / 4.0, u / 10.0, u / 3.0),
            Vec3::Y,
            ortho(u, -u, u),
        ),
        CameraId::Perspective => fixed(Vec3::new(-u, u, u), Vec3::Y, perspective()),
        CameraId::Mobile => {
            let eye = claw_world.transform_point3(Vec3::ZERO);
            let forward = claw_world.transform_vector3(Vec3::X).normalize_or_zero();
            Camera {
                eye,
                target: eye - Vec3::Y * CABLE_MAX_LENGTH,
                up: if forward == Vec3::ZERO { Vec3::X } else { forward },
                aspect,
                projection: perspective(),
            }
        }
        CameraId::Inspect => fixed(
            orbit.eye(u / 2.0),
            Vec3::Y,
            ortho(u / orbit.zoom, -u, 10.0 * u),
        ),
    }
}
