//! Interactive simulation: input → DOF state → scene graph → collision →
//! pick-and-place state machine.

use crate::build::{build_scene, CraneRig};
use crate::camera::{camera_for, Camera, CameraId, OrbitController};
use crate::cargo::{place_cargo, Cargo, CargoMaterials, PlacementParams};
use crate::collision::{first_hit, intersects, BoundingSphere};
use crate::constants::*;
use crate::dof::{shortest_arc, Dof, DofState};
use crate::error::{CraneError, CraneResult};
use crate::input::{HeldKeys, KeyCommand};
use crate::scene::{MaterialId, NodeId, SceneGraph};
use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::time::Duration;

/// Stages of the automatic delivery sequence, numbered 1 to 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrabPhase {
    /// Shorten the cable to its minimum.
    Retract = 1,
    /// Rotate the boom to the container heading.
    Slew = 2,
    /// Move the trolley to the container offset.
    Traverse = 3,
    /// Pay out cable until the cargo lands in the container.
    Lower = 4,
}

impl GrabPhase {
    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }

    fn next(self) -> Option<Self> {
        match self {
            GrabPhase::Retract => Some(GrabPhase::Slew),
            GrabPhase::Slew => Some(GrabPhase::Traverse),
            GrabPhase::Traverse => Some(GrabPhase::Lower),
            GrabPhase::Lower => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlMode {
    #[default]
    Free,
    Grabbing(GrabPhase),
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Free => write!(f, "Free"),
            ControlMode::Grabbing(phase) => write!(f, "Grabbing ({})", phase.number()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub cargo_count: usize,
    pub seed: u64,
    /// Per-cargo candidate budget for rejection sampling.
    pub max_placement_attempts: usize,
    pub wireframe: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cargo_count: DEFAULT_CARGO_COUNT,
            seed: 42,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            wireframe: true,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> CraneResult<()> {
        if self.max_placement_attempts == 0 {
            return Err(CraneError::invalid_config(
                "max_placement_attempts must be > 0",
            ));
        }
        Ok(())
    }
}

pub struct Simulation {
    scene: SceneGraph,
    rig: CraneRig,
    dof: DofState,
    mode: ControlMode,
    held: HeldKeys,

    idle: Vec<Cargo>,
    grabbed: Option<Cargo>,
    delivered: Vec<Cargo>,
    next_cargo_id: usize,

    claw_bounds: BoundingSphere,
    container_bounds: BoundingSphere,
    base_bounds: BoundingSphere,
    wall_bounds: [BoundingSphere; 4],

    camera: CameraId,
    orbit: OrbitController,
    wireframe: bool,
    bounds_visible: bool,
    hud_visible: bool,
    shaded_materials: Vec<MaterialId>,
    cargo_materials: CargoMaterials,
    bounds_nodes: Vec<NodeId>,
}

impl Simulation {
    /// Build the scene and scatter cargo. Fails when the configuration is
    /// invalid or placement cannot fit every cargo within its budget.
    pub fn new(config: SimConfig) -> CraneResult<Self> {
        config.validate()?;
        let dof = DofState::default();
        let built = build_scene(&dof, config.wireframe);

        let mut sim = Self {
            scene: built.scene,
            rig: built.rig,
            dof,
            mode: ControlMode::Free,
            held: HeldKeys::default(),
            idle: Vec::new(),
            grabbed: None,
            delivered: Vec::new(),
            next_cargo_id: 0,
            claw_bounds: built.claw_bounds,
            container_bounds: built.container_bounds,
            base_bounds: built.base_bounds,
            wall_bounds: built.wall_bounds,
            camera: CameraId::default(),
            orbit: OrbitController::default(),
            wireframe: config.wireframe,
            bounds_visible: false,
            hud_visible: true,
            shaded_materials: built.shaded_materials,
            cargo_materials: built.cargo_materials,
            bounds_nodes: built.bounds_nodes,
        };
        sim.sync_rig();

        let mut obstacles = Vec::with_capacity(1 + sim.wall_bounds.len());
        obstacles.push(sim.base_bounds);
        obstacles.extend_from_slice(&sim.wall_bounds);
        let params = PlacementParams {
            count: config.cargo_count,
            max_attempts: config.max_placement_attempts,
            ..PlacementParams::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let cargo = place_cargo(
            &mut sim.scene,
            sim.rig.cargo_group,
            sim.cargo_materials,
            &obstacles,
            &params,
            &mut rng,
        )?;
        sim.bounds_nodes.extend(cargo.iter().map(|c| c.bounds.node));
        sim.next_cargo_id = cargo.len();
        sim.idle = cargo;

        log::info!(
            "[sim] ready: {} cargo, seed {}, {} scene nodes",
            sim.idle.len(),
            config.seed,
            sim.scene.len()
        );
        Ok(sim)
    }

    /// Advance one frame. The order is fixed: container release, then either
    /// the grab sequence or held-key driving, then the scene sync, then the
    /// claw-vs-cargo check against the freshly synced transforms.
    pub fn tick(&mut self, dt: Duration) {
        self.check_container_release();
        match self.mode {
            ControlMode::Free => self.held.apply(&mut self.dof, dt),
            ControlMode::Grabbing(phase) => self.step_grab(phase, dt),
        }
        self.sync_rig();
        self.check_claw_grab();
    }

    /// Handle a key press. Returns the command it mapped to, if any.
    pub fn on_key_down(&mut self, key: &str) -> Option<KeyCommand> {
        let cmd = KeyCommand::parse(key)?;
        match cmd {
            KeyCommand::Control(k) => self.held.set(k, true),
            KeyCommand::Camera(id) => self.set_camera(id),
            KeyCommand::ToggleWireframe => self.set_wireframe(!self.wireframe),
            KeyCommand::ToggleBounds => self.set_bounds_visible(!self.bounds_visible),
            KeyCommand::ToggleHud => self.hud_visible = !self.hud_visible,
        }
        Some(cmd)
    }

    pub fn on_key_up(&mut self, key: &str) -> Option<KeyCommand> {
        let cmd = KeyCommand::parse(key)?;
        if let KeyCommand::Control(k) = cmd {
            self.held.set(k, false);
        }
        Some(cmd)
    }

    /// Drop every held control, e.g. when the window loses focus and key-up
    /// events would be missed.
    pub fn release_all_keys(&mut self) {
        if self.held.any() {
            log::debug!("[input] releasing held keys");
        }
        self.held = HeldKeys::default();
    }

    pub fn set_camera(&mut self, id: CameraId) {
        if self.camera != id {
            log::info!("[camera] {} -> {}", self.camera.name(), id.name());
            self.camera = id;
        }
    }

    pub fn set_wireframe(&mut self, on: bool) {
        self.wireframe = on;
        self.scene.set_wireframe(&self.shaded_materials, on);
    }

    pub fn set_bounds_visible(&mut self, on: bool) {
        self.bounds_visible = on;
        for node in &self.bounds_nodes {
            self.scene.set_visible(*node, on);
        }
    }

    fn step_grab(&mut self, phase: GrabPhase, dt: Duration) {
        let dt_sec = dt.as_secs_f32();
        let done = match phase {
            GrabPhase::Retract => {
                let step = CABLE_SPEED * dt_sec;
                if self.dof.cable_length - step <= CABLE_MIN_LENGTH {
                    self.dof.set(Dof::CableLength, CABLE_MIN_LENGTH);
                    true
                } else {
                    self.dof.apply_delta(Dof::CableLength, -step);
                    false
                }
            }
            GrabPhase::Slew => {
                let step = BOOM_SPEED * dt_sec;
                let remaining = shortest_arc(self.dof.boom_angle, TARGET_BOOM_ANGLE);
                if remaining.abs() <= step {
                    self.dof.set(Dof::BoomAngle, TARGET_BOOM_ANGLE);
                    true
                } else {
                    self.dof
                        .apply_delta(Dof::BoomAngle, step.copysign(remaining));
                    false
                }
            }
            GrabPhase::Traverse => {
                let step = TROLLEY_SPEED * dt_sec;
                let remaining = TARGET_TROLLEY_OFFSET - self.dof.trolley_offset;
                if remaining.abs() <= step {
                    self.dof.set(Dof::TrolleyOffset, TARGET_TROLLEY_OFFSET);
                    true
                } else {
                    self.dof
                        .apply_delta(Dof::TrolleyOffset, step.copysign(remaining));
                    false
                }
            }
            // Saturates at the cable maximum; only the container release
            // check ends this phase.
            GrabPhase::Lower => {
                self.dof.apply_delta(Dof::CableLength, CABLE_SPEED * dt_sec);
                false
            }
        };
        if done {
            if let Some(next) = phase.next() {
                log::info!("[grab] phase {} -> {}", phase.number(), next.number());
                self.mode = ControlMode::Grabbing(next);
            }
        }
    }

    /// Push the DOF state into the scene graph.
    fn sync_rig(&mut self) {
        let rig = self.rig;
        let len = self.dof.cable_length;
        self.scene.set_local_transform(
            rig.boom_pivot,
            None,
            Some(Quat::from_rotation_y(self.dof.boom_angle)),
            None,
        );
        self.scene.set_local_transform(
            rig.trolley,
            Some(CraneRig::trolley_translation(self.dof.trolley_offset)),
            None,
            None,
        );
        // The cable mesh is built at minimum length and stretched along Y.
        self.scene.set_local_transform(
            rig.cable,
            Some(Vec3::new(0.0, -len / 2.0, 0.0)),
            None,
            Some(Vec3::new(1.0, len / CABLE_MIN_LENGTH, 1.0)),
        );
        self.scene
            .set_local_transform(rig.claw, Some(Vec3::new(0.0, -len, 0.0)), None, None);
        let tip = Quat::from_rotation_x(self.dof.claw_tip_angle);
        for hinge in rig.claw_tips {
            self.scene.set_local_transform(hinge, None, Some(tip), None);
        }
    }

    fn check_claw_grab(&mut self) {
        if self.mode != ControlMode::Free || self.grabbed.is_some() {
            return;
        }
        let hit = first_hit(
            &self.scene,
            &self.claw_bounds,
            self.idle.iter().map(|c| &c.bounds),
        );
        let Some(index) = hit else {
            return;
        };
        let cargo = self.idle.remove(index);
        self.scene.reparent(cargo.node, Some(self.rig.claw));
        self.scene.set_local_transform(
            cargo.node,
            Some(Vec3::new(0.0, CLAW_BOUNDS_OFFSET_Y * 3.0, 0.0)),
            None,
            None,
        );
        log::info!("[grab] cargo {} ({:?}) picked up", cargo.id, cargo.kind);
        self.grabbed = Some(cargo);
        self.mode = ControlMode::Grabbing(GrabPhase::Retract);
    }

    fn check_container_release(&mut self) {
        let Some(cargo) = self.grabbed else {
            return;
        };
        if !intersects(&self.scene, &cargo.bounds, &self.container_bounds) {
            return;
        }
        self.scene
            .reparent_keep_world(cargo.node, Some(self.rig.container));
        log::info!(
            "[release] cargo {} delivered ({} total)",
            cargo.id,
            self.delivered.len() + 1
        );
        self.delivered.push(cargo);
        self.grabbed = None;
        self.mode = ControlMode::Free;
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn rig(&self) -> &CraneRig {
        &self.rig
    }

    pub fn dof(&self) -> &DofState {
        &self.dof
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn held_keys(&self) -> &HeldKeys {
        &self.held
    }

    pub fn idle_cargo(&self) -> &[Cargo] {
        &self.idle
    }

    pub fn grabbed(&self) -> Option<&Cargo> {
        self.grabbed.as_ref()
    }

    pub fn delivered(&self) -> &[Cargo] {
        &self.delivered
    }

    pub fn claw_bounds(&self) -> &BoundingSphere {
        &self.claw_bounds
    }

    pub fn container_bounds(&self) -> &BoundingSphere {
        &self.container_bounds
    }

    pub fn base_bounds(&self) -> &BoundingSphere {
        &self.base_bounds
    }

    pub fn wall_bounds(&self) -> &[BoundingSphere; 4] {
        &self.wall_bounds
    }

    pub fn claw_world(&self) -> Mat4 {
        self.scene.world_matrix(self.rig.claw)
    }

    pub fn active_camera(&self) -> CameraId {
        self.camera
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        camera_for(self.camera, aspect, &self.orbit, self.claw_world())
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitController {
        &mut self.orbit
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn bounds_visible(&self) -> bool {
        self.bounds_visible
    }

    pub fn hud_visible(&self) -> bool {
        self.hud_visible
    }
}

/// Setup hooks for scenario tests. They bypass placement and the input path,
/// so they only exist under `cfg(test)` or the `test-support` feature.
#[cfg(any(test, feature = "test-support"))]
impl Simulation {
    /// Overwrite the crane pose (clamped) and sync the scene to it.
    pub fn set_dof(&mut self, dof: DofState) {
        for axis in Dof::ALL {
            self.dof.set(axis, dof.get(axis));
        }
        self.sync_rig();
    }

    /// Drop an extra idle cargo at `world_pos`, bypassing placement checks.
    /// Returns its id.
    pub fn spawn_cargo_at(
        &mut self,
        kind: crate::cargo::CargoKind,
        shape: crate::shape::Shape,
        world_pos: Vec3,
    ) -> usize {
        use crate::scene::Transform;
        use crate::shape::Shape;

        let local = self
            .scene
            .world_matrix(self.rig.cargo_group)
            .inverse()
            .transform_point3(world_pos);
        let radius = shape.bounding_radius();
        let node = self.scene.add_visual(
            "cargo",
            Some(self.rig.cargo_group),
            Transform::from_translation(local),
            shape,
            self.cargo_materials.body,
        );
        let bounds_node = self.scene.add_visual(
            "cargo-bounds",
            Some(node),
            Transform::IDENTITY,
            Shape::Sphere { radius },
            self.cargo_materials.bounds,
        );
        self.scene.set_visible(bounds_node, self.bounds_visible);
        self.bounds_nodes.push(bounds_node);

        let id = self.next_cargo_id;
        self.next_cargo_id += 1;
        self.idle.push(Cargo {
            id,
            kind,
            shape,
            node,
            bounds: BoundingSphere::new(bounds_node, radius),
        });
        id
    }
}
