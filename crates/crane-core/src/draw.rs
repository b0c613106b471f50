//! World-space vertex lists built from the scene graph each frame.

use crate::mesh::Mesh;
use crate::scene::{NodeId, SceneGraph};
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl SceneUniforms {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// One frame of geometry: solid triangles plus wireframe line segments.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty()
    }
}

// Fixed directional light for flat shading of solid faces.
const LIGHT_DIR: Vec3 = Vec3::new(0.4, 0.8, 0.45);
const AMBIENT: f32 = 0.45;

/// Meshes per node, generated on first use. A node's shape never changes
/// after it is created, so entries stay valid for the life of the scene.
#[derive(Default)]
pub struct MeshCache {
    meshes: FnvHashMap<NodeId, Mesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Rebuild `out` from every visible node, honouring material wireframe flags.
    pub fn build(&mut self, scene: &SceneGraph, out: &mut DrawList) {
        out.clear();
        let light = LIGHT_DIR.normalize();
        for (id, node) in scene.iter() {
            let Some(visual) = node.visual else {
                continue;
            };
            if !scene.is_visible_in_tree(id) {
                continue;
            }
            let mesh = self
                .meshes
                .entry(id)
                .or_insert_with(|| Mesh::from_shape(&visual.shape));
            let material = scene.material(visual.material);
            let world = scene.world_matrix(id);
            let world_pos: Vec<Vec3> = mesh
                .positions
                .iter()
                .map(|p| world.transform_point3(*p))
                .collect();

            if material.wireframe {
                for [a, b] in &mesh.edges {
                    for i in [*a, *b] {
                        out.lines.push(Vertex {
                            pos: world_pos[i as usize].to_array(),
                            color: material.color,
                        });
                    }
                }
            } else {
                for tri in &mesh.triangles {
                    let [a, b, c] = tri.map(|i| world_pos[i as usize]);
                    let normal = (b - a).cross(c - a).normalize_or_zero();
                    // double-sided: planes and open cylinders are seen from both faces
                    let shade = AMBIENT + (1.0 - AMBIENT) * normal.dot(light).abs();
                    let color = material.color.map(|c| c * shade);
                    for p in [a, b, c] {
                        out.triangles.push(Vertex {
                            pos: p.to_array(),
                            color,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;
    use crate::shape::Shape;

    fn scene_with_box(wireframe: bool) -> (SceneGraph, NodeId) {
        let mut g = SceneGraph::new();
        let m = g.add_material([1.0, 0.0, 0.0], wireframe);
        let id = g.add_visual(
            "box",
            None,
            Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)),
            Shape::Cuboid { size: Vec3::ONE },
            m,
        );
        (g, id)
    }

    #[test]
    fn wireframe_materials_emit_lines_only() {
        let (g, _) = scene_with_box(true);
        let mut cache = MeshCache::new();
        let mut list = DrawList::default();
        cache.build(&g, &mut list);
        assert!(list.triangles.is_empty());
        assert_eq!(list.lines.len() % 2, 0);
        assert!(list.lines.iter().all(|v| v.pos[0] >= 9.5 - 1e-5));
    }

    #[test]
    fn solid_materials_emit_triangles_in_world_space() {
        let (g, _) = scene_with_box(false);
        let mut cache = MeshCache::new();
        let mut list = DrawList::default();
        cache.build(&g, &mut list);
        assert!(list.lines.is_empty());
        assert_eq!(list.triangles.len(), 12 * 3);
        assert!(list.triangles.iter().all(|v| (v.pos[0] - 10.0).abs() <= 0.5 + 1e-5));
    }

    #[test]
    fn hidden_nodes_are_skipped_and_meshes_cached() {
        let (mut g, id) = scene_with_box(false);
        let mut cache = MeshCache::new();
        let mut list = DrawList::default();
        g.set_visible(id, false);
        cache.build(&g, &mut list);
        assert!(list.is_empty());
        assert!(cache.is_empty());

        g.set_visible(id, true);
        cache.build(&g, &mut list);
        cache.build(&g, &mut list);
        assert_eq!(cache.len(), 1);
    }
}
