//! Random cargo generation and construction-time rejection sampling.

use crate::collision::{spheres_overlap, BoundingSphere};
use crate::constants::{crane_base_center, CARGO_REACH_RADIUS, CARGO_Y};
use crate::error::PlacementError;
use crate::scene::{MaterialId, NodeId, SceneGraph, Transform};
use crate::shape::Shape;
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CargoKind {
    Box,
    Dodecahedron,
    Icosahedron,
    Torus,
    TorusKnot,
}

impl CargoKind {
    pub const ALL: [CargoKind; 5] = [
        CargoKind::Box,
        CargoKind::Dodecahedron,
        CargoKind::Icosahedron,
        CargoKind::Torus,
        CargoKind::TorusKnot,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Draw size parameters for this kind from its fixed ranges.
    pub fn sample_shape<R: Rng + ?Sized>(self, rng: &mut R) -> Shape {
        match self {
            CargoKind::Box => Shape::Cuboid {
                size: Vec3::new(
                    rng.gen_range(5.0..15.0),
                    rng.gen_range(5.0..15.0),
                    rng.gen_range(5.0..15.0),
                ),
            },
            CargoKind::Dodecahedron => Shape::Dodecahedron {
                radius: rng.gen_range(5.0..7.0),
            },
            CargoKind::Icosahedron => Shape::Icosahedron {
                radius: rng.gen_range(5.0..7.0),
            },
            CargoKind::Torus => Shape::Torus {
                radius: rng.gen_range(5.0..8.0),
                tube: rng.gen_range(2.0..4.0),
                arc: rng.gen_range(2.0..TAU),
            },
            CargoKind::TorusKnot => Shape::TorusKnot {
                radius: rng.gen_range(3.0..6.0),
                tube: rng.gen_range(2.0..4.0),
                p: rng.gen_range(2..6),
                q: rng.gen_range(2..5),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cargo {
    pub id: usize,
    pub kind: CargoKind,
    pub shape: Shape,
    pub node: NodeId,
    pub bounds: BoundingSphere,
}

#[derive(Clone, Copy, Debug)]
pub struct PlacementParams {
    pub count: usize,
    pub reach_radius: f32,
    pub height: f32,
    pub max_attempts: usize,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            count: crate::constants::DEFAULT_CARGO_COUNT,
            reach_radius: CARGO_REACH_RADIUS,
            height: CARGO_Y,
            max_attempts: crate::constants::DEFAULT_MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CargoMaterials {
    pub body: MaterialId,
    pub bounds: MaterialId,
}

/// Sample a world-space point uniformly (by area) within the reach disk.
pub fn sample_disk_point<R: Rng + ?Sized>(rng: &mut R, reach_radius: f32, height: f32) -> Vec3 {
    let base = crane_base_center();
    let angle = rng.gen::<f32>() * TAU;
    let r = reach_radius * rng.gen::<f32>().sqrt();
    Vec3::new(base.x + angle.cos() * r, height, base.z + angle.sin() * r)
}

/// Whether a candidate sphere may be placed: inside the reach disk and clear
/// of every placed cargo and obstacle.
pub fn candidate_is_clear(
    scene: &SceneGraph,
    center: Vec3,
    radius: f32,
    reach_radius: f32,
    placed: &[Cargo],
    obstacles: &[BoundingSphere],
) -> bool {
    let base = crane_base_center();
    let horizontal = Vec2::new(center.x - base.x, center.z - base.z);
    if horizontal.length() > reach_radius {
        return false;
    }
    let hits = |s: &BoundingSphere| spheres_overlap(center, radius, s.center(scene), s.radius);
    !placed.iter().any(|c| hits(&c.bounds)) && !obstacles.iter().any(hits)
}

/// Place `params.count` cargo under `parent` by rejection sampling.
///
/// Each cargo gets at most `params.max_attempts` candidates; running out
/// aborts construction instead of looping forever.
pub fn place_cargo<R: Rng + ?Sized>(
    scene: &mut SceneGraph,
    parent: NodeId,
    materials: CargoMaterials,
    obstacles: &[BoundingSphere],
    params: &PlacementParams,
    rng: &mut R,
) -> Result<Vec<Cargo>, PlacementError> {
    let parent_inv = scene.world_matrix(parent).inverse();
    let mut placed: Vec<Cargo> = Vec::with_capacity(params.count);
    let mut total_attempts = 0usize;

    for id in 0..params.count {
        let mut accepted = None;
        for _ in 0..params.max_attempts {
            total_attempts += 1;
            let kind = CargoKind::random(rng);
            let shape = kind.sample_shape(rng);
            let radius = shape.bounding_radius();
            let center = sample_disk_point(rng, params.reach_radius, params.height);
            if candidate_is_clear(scene, center, radius, params.reach_radius, &placed, obstacles)
            {
                accepted = Some((kind, shape, radius, center));
                break;
            }
        }
        let Some((kind, shape, radius, center)) = accepted else {
            log::error!(
                "[placement] gave up on cargo {} after {} attempts",
                id,
                params.max_attempts
            );
            return Err(PlacementError::Exhausted {
                placed: placed.len(),
                requested: params.count,
                attempts: params.max_attempts,
            });
        };

        let local = parent_inv.transform_point3(center);
        let node = scene.add_visual(
            "cargo",
            Some(parent),
            Transform::from_translation(local),
            shape,
            materials.body,
        );
        let bounds_node = scene.add_visual(
            "cargo-bounds",
            Some(node),
            Transform::IDENTITY,
            Shape::Sphere { radius },
            materials.bounds,
        );
        scene.set_visible(bounds_node, false);
        log::debug!(
            "[placement] cargo {} {:?} r={:.2} at ({:.1}, {:.1}, {:.1})",
            id,
            kind,
            radius,
            center.x,
            center.y,
            center.z
        );
        placed.push(Cargo {
            id,
            kind,
            shape,
            node,
            bounds: BoundingSphere::new(bounds_node, radius),
        });
    }

    log::info!(
        "[placement] placed {} cargo in {} attempts",
        placed.len(),
        total_attempts
    );
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampled_shapes_stay_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            for kind in CargoKind::ALL {
                let r = kind.sample_shape(&mut rng).bounding_radius();
                let (lo, hi) = match kind {
                    CargoKind::Box => (5.0 * 3f32.sqrt() / 2.0, 15.0 * 3f32.sqrt() / 2.0),
                    CargoKind::Dodecahedron | CargoKind::Icosahedron => (5.0, 7.0),
                    CargoKind::Torus => (7.0, 12.0),
                    CargoKind::TorusKnot => (7.0, 14.0),
                };
                assert!(r >= lo - 1e-4 && r <= hi + 1e-4, "{kind:?} radius {r}");
            }
        }
    }

    #[test]
    fn disk_samples_stay_within_reach() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = crane_base_center();
        for _ in 0..2000 {
            let p = sample_disk_point(&mut rng, 50.0, -3.0);
            assert_eq!(p.y, -3.0);
            assert!(Vec2::new(p.x - base.x, p.z - base.z).length() <= 50.0 + 1e-4);
        }
    }

    #[test]
    fn candidate_outside_reach_is_rejected() {
        let g = SceneGraph::new();
        let far = Vec3::new(CARGO_REACH_RADIUS + 1.0, CARGO_Y, 0.0);
        assert!(!candidate_is_clear(&g, far, 1.0, CARGO_REACH_RADIUS, &[], &[]));
        let near = Vec3::new(CARGO_REACH_RADIUS - 1.0, CARGO_Y, 0.0);
        assert!(candidate_is_clear(&g, near, 1.0, CARGO_REACH_RADIUS, &[], &[]));
    }
}
