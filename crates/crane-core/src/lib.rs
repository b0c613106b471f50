pub mod build;
pub mod camera;
pub mod cargo;
pub mod collision;
pub mod constants;
pub mod dof;
pub mod draw;
pub mod error;
pub mod hud;
pub mod input;
pub mod mesh;
#[cfg(feature = "gpu")]
pub mod render;
pub mod scene;
pub mod shape;
pub mod sim;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use camera::{Camera, CameraId, OrbitController};
pub use cargo::{Cargo, CargoKind};
pub use collision::{intersects, BoundingSphere};
pub use dof::{Dof, DofState};
pub use draw::{DrawList, MeshCache, Vertex};
pub use error::{CraneError, CraneResult, PlacementError};
pub use hud::HudSnapshot;
pub use input::{ControlKey, HeldKeys, KeyCommand};
pub use scene::{NodeId, SceneGraph, Transform};
pub use shape::Shape;
pub use sim::{ControlMode, GrabPhase, SimConfig, Simulation};
