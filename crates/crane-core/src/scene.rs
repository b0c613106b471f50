//! Retained transform hierarchy stored as an arena.
//!
//! Nodes are addressed by [`NodeId`] indices handed out by the graph itself, so
//! parent/child links are plain indices and reparenting is an index update
//! rather than a pointer splice. World transforms are never cached: every query
//! walks the parent chain, which keeps collision checks consistent with the
//! most recent `set_local_transform` call.

use crate::shape::Shape;
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub wireframe: bool,
}

/// Drawable payload of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub shape: Shape,
    pub material: MaterialId,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: &'static str,
    pub local: Transform,
    pub visible: bool,
    pub visual: Option<Visual>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    materials: Vec<Material>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_material(&mut self, color: [f32; 3], wireframe: bool) -> MaterialId {
        self.materials.push(Material { color, wireframe });
        MaterialId((self.materials.len() - 1) as u32)
    }

    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }

    /// Add an empty grouping node.
    pub fn add_node(
        &mut self,
        name: &'static str,
        parent: Option<NodeId>,
        local: Transform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            local,
            visible: true,
            visual: None,
            parent,
            children: SmallVec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        id
    }

    /// Add a node carrying a drawable shape.
    pub fn add_visual(
        &mut self,
        name: &'static str,
        parent: Option<NodeId>,
        local: Transform,
        shape: Shape,
        material: MaterialId,
    ) -> NodeId {
        let id = self.add_node(name, parent, local);
        self.nodes[id.index()].visual = Some(Visual { shape, material });
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Replace the given components of a node's local transform.
    pub fn set_local_transform(
        &mut self,
        id: NodeId,
        translation: Option<Vec3>,
        rotation: Option<Quat>,
        scale: Option<Vec3>,
    ) {
        let local = &mut self.nodes[id.index()].local;
        if let Some(t) = translation {
            local.translation = t;
        }
        if let Some(r) = rotation {
            local.rotation = r;
        }
        if let Some(s) = scale {
            local.scale = s;
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.index()].visible = visible;
    }

    /// A node is drawn only when it and every ancestor are visible.
    pub fn is_visible_in_tree(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = &self.nodes[n.index()];
            if !node.visible {
                return false;
            }
            cur = node.parent;
        }
        true
    }

    pub fn set_wireframe(&mut self, materials: &[MaterialId], wireframe: bool) {
        for m in materials {
            self.materials[m.0 as usize].wireframe = wireframe;
        }
    }

    /// True when `ancestor` lies on the parent chain of `id` (or is `id`).
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.nodes[n.index()].parent;
        }
        false
    }

    /// Move `id` under `new_parent` (or make it a root). The local transform is
    /// kept as-is. Returns `false` and leaves the graph untouched if the move
    /// would create a cycle.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if let Some(p) = new_parent {
            if self.is_ancestor(id, p) {
                log::warn!(
                    "[scene] refusing to parent '{}' under its own descendant '{}'",
                    self.nodes[id.index()].name,
                    self.nodes[p.index()].name
                );
                return false;
            }
        }
        if let Some(old) = self.nodes[id.index()].parent {
            self.nodes[old.index()].children.retain(|c| *c != id);
        }
        self.nodes[id.index()].parent = new_parent;
        if let Some(p) = new_parent {
            self.nodes[p.index()].children.push(id);
        }
        true
    }

    /// Reparent while preserving the node's current world transform.
    pub fn reparent_keep_world(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        let world = self.world_matrix(id);
        if !self.reparent(id, new_parent) {
            return false;
        }
        let parent_world = new_parent
            .map(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);
        let local = parent_world.inverse() * world;
        let (scale, rotation, translation) = local.to_scale_rotation_translation();
        self.nodes[id.index()].local = Transform {
            translation,
            rotation,
            scale,
        };
        true
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut node = &self.nodes[id.index()];
        let mut m = node.local.matrix();
        while let Some(p) = node.parent {
            node = &self.nodes[p.index()];
            m = node.local.matrix() * m;
        }
        m
    }

    #[inline]
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }
}
