//! Construction of the static scene: floor, crane rig and container.

use crate::cargo::CargoMaterials;
use crate::collision::BoundingSphere;
use crate::constants::*;
use crate::dof::DofState;
use crate::scene::{MaterialId, NodeId, SceneGraph, Transform};
use crate::shape::Shape;
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

const BOOM_OFFSET_X: f32 = BOOM_LENGTH / 5.0;
const BOOM_HOLDER_HEIGHT: f32 = 7.5;
const TROLLEY_Y: f32 = -BOOM_THICKNESS / 2.0;
const CLAW_FINGERS: usize = 4;

/// Scene nodes the simulation drives every frame.
#[derive(Clone, Copy, Debug)]
pub struct CraneRig {
    pub boom_pivot: NodeId,
    pub trolley: NodeId,
    pub cable: NodeId,
    pub claw: NodeId,
    pub claw_tips: [NodeId; CLAW_FINGERS],
    pub container: NodeId,
    pub cargo_group: NodeId,
}

impl CraneRig {
    #[inline]
    pub fn trolley_translation(offset: f32) -> Vec3 {
        Vec3::new(offset, TROLLEY_Y, 0.0)
    }
}

pub struct BuiltScene {
    pub scene: SceneGraph,
    pub rig: CraneRig,
    pub claw_bounds: BoundingSphere,
    pub container_bounds: BoundingSphere,
    pub base_bounds: BoundingSphere,
    pub wall_bounds: [BoundingSphere; 4],
    /// Materials flipped by the wireframe toggle.
    pub shaded_materials: Vec<MaterialId>,
    pub cargo_materials: CargoMaterials,
    /// Hidden debug spheres, shown by the bounds toggle.
    pub bounds_nodes: Vec<NodeId>,
}

struct Builder {
    scene: SceneGraph,
    bounds_material: MaterialId,
    bounds_nodes: Vec<NodeId>,
}

impl Builder {
    fn bounds(&mut self, parent: NodeId, offset: Vec3, radius: f32) -> BoundingSphere {
        let node = self.scene.add_visual(
            "bounds",
            Some(parent),
            Transform::from_translation(offset),
            Shape::Sphere { radius },
            self.bounds_material,
        );
        self.scene.set_visible(node, false);
        self.bounds_nodes.push(node);
        BoundingSphere::new(node, radius)
    }
}

/// Cylinder spanning two points in the parent's frame.
fn cylinder_between(start: Vec3, end: Vec3, radius: f32) -> (Transform, Shape) {
    let dir = end - start;
    let transform = Transform::from_translation((start + end) * 0.5)
        .with_rotation(Quat::from_rotation_arc(Vec3::Y, dir.normalize()));
    (
        transform,
        Shape::Cylinder {
            radius,
            height: dir.length(),
        },
    )
}

pub fn build_scene(dof: &DofState, wireframe: bool) -> BuiltScene {
    let mut scene = SceneGraph::new();
    let crane_mat = scene.add_material(CRANE_COLOR, wireframe);
    let floor_mat = scene.add_material(FLOOR_COLOR, wireframe);
    let wall_mat = scene.add_material(CONTAINER_WALL_COLOR, wireframe);
    let container_floor_mat = scene.add_material(CONTAINER_FLOOR_COLOR, wireframe);
    let cargo_mat = scene.add_material(CARGO_COLOR, wireframe);
    let bounds_mat = scene.add_material(BOUNDS_COLOR, true);

    let mut b = Builder {
        scene,
        bounds_material: bounds_mat,
        bounds_nodes: Vec::new(),
    };

    // Floor
    b.scene.add_visual(
        "floor",
        None,
        Transform::from_translation(Vec3::new(0.0, GROUND_Y - FLOOR_HEIGHT / 2.0, 0.0)),
        Shape::Cuboid {
            size: Vec3::new(SCENE_MAX_LENGTH, FLOOR_HEIGHT, SCENE_MAX_LENGTH),
        },
        floor_mat,
    );

    // Crane
    let crane = b.scene.add_node("crane", None, Transform::IDENTITY);
    let base = b.scene.add_visual(
        "base",
        Some(crane),
        Transform::from_translation(crane_base_center()),
        Shape::Cuboid {
            size: Vec3::splat(BASE_SIZE),
        },
        crane_mat,
    );
    let base_bounds = b.bounds(base, Vec3::ZERO, Vec3::splat(BASE_SIZE).length() / 2.0);

    let tower = b.scene.add_visual(
        "tower",
        Some(crane),
        Transform::IDENTITY,
        Shape::Cuboid {
            size: Vec3::new(TOWER_WIDTH, TOWER_HEIGHT, TOWER_WIDTH),
        },
        crane_mat,
    );
    let boom_pivot = b.scene.add_node(
        "boom-pivot",
        Some(tower),
        Transform::IDENTITY.with_rotation(Quat::from_rotation_y(dof.boom_angle)),
    );
    let boom = b.scene.add_visual(
        "boom",
        Some(boom_pivot),
        Transform::from_translation(Vec3::new(
            BOOM_OFFSET_X,
            TOWER_HEIGHT / 2.0 + BOOM_THICKNESS / 2.0,
            0.0,
        )),
        Shape::Cuboid {
            size: Vec3::new(BOOM_LENGTH, BOOM_THICKNESS, BOOM_THICKNESS),
        },
        crane_mat,
    );
    let holder_pos = Vec3::new(-BOOM_OFFSET_X, BOOM_THICKNESS, 0.0);
    b.scene.add_visual(
        "boom-holder",
        Some(boom),
        Transform::from_translation(holder_pos).with_rotation(Quat::from_rotation_y(FRAC_PI_4)),
        Shape::Pyramid {
            radius: BOOM_HOLDER_HEIGHT,
            height: BOOM_THICKNESS,
        },
        crane_mat,
    );
    let counterweight_x = -11.0 / 30.0 * BOOM_LENGTH;
    b.scene.add_visual(
        "counterweight",
        Some(boom),
        Transform::from_translation(Vec3::new(counterweight_x, -2.0 / 3.0 * BOOM_THICKNESS, 0.0)),
        Shape::Cuboid {
            size: Vec3::new(20.0, 20.0, BOOM_THICKNESS * 2.0 / 3.0),
        },
        crane_mat,
    );
    b.scene.add_visual(
        "cabin",
        Some(boom),
        Transform::from_translation(Vec3::new(
            -BOOM_OFFSET_X,
            -BOOM_THICKNESS / 2.0,
            BOOM_THICKNESS / 2.0 + 2.5,
        )),
        Shape::Cuboid {
            size: Vec3::new(10.0, 20.0, 5.0),
        },
        crane_mat,
    );

    // Tie rods from the holder apex to the counterweight and the jib
    let apex = holder_pos + Vec3::Y * (BOOM_HOLDER_HEIGHT / 1.5);
    let rod_ends = [
        Vec3::new(counterweight_x, BOOM_THICKNESS / 2.0, BOOM_THICKNESS / 2.0),
        Vec3::new(counterweight_x, BOOM_THICKNESS / 2.0, -BOOM_THICKNESS / 2.0),
        Vec3::new(BOOM_LENGTH / 4.0, BOOM_THICKNESS / 2.0, 0.0),
    ];
    for end in rod_ends {
        let (t, shape) = cylinder_between(apex, end, 0.25);
        b.scene.add_visual("tie-rod", Some(boom), t, shape, crane_mat);
    }

    let trolley = b.scene.add_visual(
        "trolley",
        Some(boom),
        Transform::from_translation(CraneRig::trolley_translation(dof.trolley_offset)),
        Shape::Sphere {
            radius: TROLLEY_DIAMETER / 2.0,
        },
        crane_mat,
    );
    let cable = b.scene.add_visual(
        "cable",
        Some(trolley),
        Transform::IDENTITY,
        Shape::Cylinder {
            radius: CABLE_DIAMETER / 2.0,
            height: CABLE_MIN_LENGTH,
        },
        crane_mat,
    );

    // Claw: base plate, four fingers, each with a hinged tip
    let claw = b.scene.add_node("claw", Some(trolley), Transform::IDENTITY);
    b.scene.add_visual(
        "claw-base",
        Some(claw),
        Transform::IDENTITY,
        Shape::Cuboid {
            size: Vec3::new(CLAW_BASE_SIZE, 1.0, CLAW_BASE_SIZE),
        },
        crane_mat,
    );
    let finger_aim = Vec3::new(0.0, -1.4 * CLAW_CYLINDER_LENGTH, 0.0);
    let finger_reach = CLAW_BASE_SIZE / FRAC_PI_4.cos();
    let mut claw_tips = [claw; CLAW_FINGERS];
    for (i, tip_slot) in claw_tips.iter_mut().enumerate() {
        let angle = (i as f32 / CLAW_FINGERS as f32) * TAU + FRAC_PI_4;
        let pos = Vec3::new(
            angle.cos() * finger_reach,
            -CLAW_CYLINDER_LENGTH / 4.0,
            angle.sin() * finger_reach,
        );
        let aim = Quat::from_rotation_arc(Vec3::Z, (finger_aim - pos).normalize());
        let finger = b.scene.add_visual(
            "claw-finger",
            Some(claw),
            Transform::from_translation(pos).with_rotation(aim),
            Shape::Cylinder {
                radius: 0.5,
                height: CLAW_CYLINDER_LENGTH,
            },
            crane_mat,
        );
        let hinge = b.scene.add_node(
            "claw-tip",
            Some(finger),
            Transform::from_translation(Vec3::new(0.0, -CLAW_CYLINDER_LENGTH / 2.0, 0.0))
                .with_rotation(Quat::from_rotation_x(dof.claw_tip_angle)),
        );
        b.scene.add_visual(
            "claw-tip-mesh",
            Some(hinge),
            Transform::from_translation(Vec3::new(0.0, CLAW_TIP_LENGTH / 2.0, 0.0)),
            Shape::Pyramid {
                radius: 1.0,
                height: CLAW_TIP_LENGTH,
            },
            crane_mat,
        );
        *tip_slot = hinge;
    }
    let claw_bounds = b.bounds(
        claw,
        Vec3::new(0.0, CLAW_BOUNDS_OFFSET_Y, 0.0),
        CLAW_BOUNDS_RADIUS,
    );

    // Container: four walls and a floor, open at the top
    let container = b.scene.add_node("container", None, Transform::IDENTITY);
    let wall = Shape::Plane {
        width: CONTAINER_SIDE,
        height: CONTAINER_SIDE,
    };
    let walls = [
        (Vec3::new(70.0, CARGO_Y, -22.5), Quat::IDENTITY),
        (Vec3::new(70.0, CARGO_Y, 2.5), Quat::IDENTITY),
        (Vec3::new(82.5, CARGO_Y, -9.5), Quat::from_rotation_y(FRAC_PI_2)),
        (Vec3::new(57.5, CARGO_Y, -9.75), Quat::from_rotation_y(-FRAC_PI_2)),
    ];
    let wall_radius = wall.bounding_radius();
    let mut wall_bounds = Vec::with_capacity(walls.len());
    for (pos, rot) in walls {
        let node = b.scene.add_visual(
            "container-wall",
            Some(container),
            Transform::from_translation(pos).with_rotation(rot),
            wall,
            wall_mat,
        );
        wall_bounds.push(b.bounds(node, Vec3::ZERO, wall_radius));
    }
    b.scene.add_visual(
        "container-floor",
        Some(container),
        Transform::from_translation(Vec3::new(
            CONTAINER_CENTER_X,
            CARGO_Y - CONTAINER_HEIGHT / 2.0,
            CONTAINER_CENTER_Z,
        ))
        .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        wall,
        container_floor_mat,
    );
    let container_bounds = b.bounds(container, container_center(), CONTAINER_SIDE / 2.0);

    let cargo_group = b.scene.add_node("cargo", None, Transform::IDENTITY);

    let wall_bounds: [BoundingSphere; 4] = [
        wall_bounds[0],
        wall_bounds[1],
        wall_bounds[2],
        wall_bounds[3],
    ];

    BuiltScene {
        scene: b.scene,
        rig: CraneRig {
            boom_pivot,
            trolley,
            cable,
            claw,
            claw_tips,
            container,
            cargo_group,
        },
        claw_bounds,
        container_bounds,
        base_bounds,
        wall_bounds,
        shaded_materials: vec![crane_mat, floor_mat, wall_mat, container_floor_mat, cargo_mat],
        cargo_materials: CargoMaterials {
            body: cargo_mat,
            bounds: bounds_mat,
        },
        bounds_nodes: b.bounds_nodes,
    }
}
