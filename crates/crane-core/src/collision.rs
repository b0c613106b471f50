use crate::scene::{NodeId, SceneGraph};
use glam::Vec3;

/// Collision proxy attached to a scene node. The centre is always read from
/// the node's current world transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub node: NodeId,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(node: NodeId, radius: f32) -> Self {
        Self { node, radius }
    }

    #[inline]
    pub fn center(&self, scene: &SceneGraph) -> Vec3 {
        scene.world_position(self.node)
    }
}

/// Strict overlap test: touching spheres do not intersect.
#[inline]
pub fn spheres_overlap(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> bool {
    let r = radius_a + radius_b;
    center_a.distance_squared(center_b) < r * r
}

#[inline]
pub fn intersects(scene: &SceneGraph, a: &BoundingSphere, b: &BoundingSphere) -> bool {
    spheres_overlap(a.center(scene), a.radius, b.center(scene), b.radius)
}

/// First sphere in `candidates` that intersects `probe`, in iteration order.
pub fn first_hit<'a, I>(scene: &SceneGraph, probe: &BoundingSphere, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a BoundingSphere>,
{
    let probe_center = probe.center(scene);
    candidates.into_iter().position(|c| {
        spheres_overlap(probe_center, probe.radius, c.center(scene), c.radius)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;

    fn sphere_at(g: &mut SceneGraph, p: Vec3, r: f32) -> BoundingSphere {
        let n = g.add_node("s", None, Transform::from_translation(p));
        BoundingSphere::new(n, r)
    }

    #[test]
    fn touching_is_not_intersecting() {
        assert!(!spheres_overlap(Vec3::ZERO, 1.0, Vec3::new(2.0, 0.0, 0.0), 1.0));
        assert!(spheres_overlap(Vec3::ZERO, 1.0, Vec3::new(1.99, 0.0, 0.0), 1.0));
    }

    #[test]
    fn intersects_uses_live_world_position() {
        let mut g = SceneGraph::new();
        let a = sphere_at(&mut g, Vec3::ZERO, 2.0);
        let b = sphere_at(&mut g, Vec3::new(10.0, 0.0, 0.0), 2.0);
        assert!(!intersects(&g, &a, &b));
        g.set_local_transform(b.node, Some(Vec3::new(3.0, 0.0, 0.0)), None, None);
        assert!(intersects(&g, &a, &b));
    }

    #[test]
    fn intersects_is_symmetric() {
        let mut g = SceneGraph::new();
        let pivot = g.add_node(
            "pivot",
            None,
            Transform::from_translation(Vec3::new(5.0, 2.0, 0.0))
                .with_rotation(glam::Quat::from_rotation_y(0.7)),
        );
        let child = g.add_node("child", Some(pivot), Transform::from_translation(Vec3::X * 4.0));
        let spheres = [
            sphere_at(&mut g, Vec3::ZERO, 2.0),
            sphere_at(&mut g, Vec3::new(3.0, 0.0, 0.0), 2.0),
            // touches the origin sphere exactly
            sphere_at(&mut g, Vec3::new(0.0, 5.0, 0.0), 3.0),
            sphere_at(&mut g, Vec3::new(40.0, -3.0, 8.0), 1.0),
            BoundingSphere::new(pivot, 1.5),
            BoundingSphere::new(child, 3.0),
        ];
        let mut hits = 0;
        for a in &spheres {
            for b in &spheres {
                let ab = intersects(&g, a, b);
                assert_eq!(ab, intersects(&g, b, a), "{a:?} vs {b:?}");
                hits += ab as usize;
            }
        }
        assert!(!intersects(&g, &spheres[0], &spheres[2]));
        assert!(!intersects(&g, &spheres[0], &spheres[3]));
        assert!(intersects(&g, &spheres[4], &spheres[5]));
        assert!(hits > spheres.len());
    }

    #[test]
    fn first_hit_respects_iteration_order() {
        let mut g = SceneGraph::new();
        let probe = sphere_at(&mut g, Vec3::ZERO, 5.0);
        let far = sphere_at(&mut g, Vec3::new(50.0, 0.0, 0.0), 1.0);
        let near_b = sphere_at(&mut g, Vec3::new(4.0, 0.0, 0.0), 1.0);
        let nearest = sphere_at(&mut g, Vec3::new(1.0, 0.0, 0.0), 1.0);
        let list = [far, near_b, nearest];
        assert_eq!(first_hit(&g, &probe, list.iter()), Some(1));
        assert_eq!(first_hit(&g, &probe, [far].iter()), None);
    }
}
