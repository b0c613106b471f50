use glam::Vec3;

/// Primitive geometry attached to a scene node. All shapes are centred on the
/// node origin; cylinders and pyramids are aligned with +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cuboid { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
    /// Four-sided cone with its apex at +height/2.
    Pyramid { radius: f32, height: f32 },
    /// Rectangle in the local XY plane.
    Plane { width: f32, height: f32 },
    Dodecahedron { radius: f32 },
    Icosahedron { radius: f32 },
    Torus { radius: f32, tube: f32, arc: f32 },
    TorusKnot { radius: f32, tube: f32, p: u32, q: u32 },
}

impl Shape {
    /// Collision radius around the node origin. Exact enclosure for every
    /// shape except the torus knot.
    ///
    /// The torus knot keeps the crane yard's established `radius + 2 * tube`
    /// rule. Its curve reaches `1.5 * radius + tube`, so large knots poke
    /// slightly past this sphere.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Cuboid { size } => size.length() / 2.0,
            Shape::Sphere { radius } => radius,
            Shape::Cylinder { radius, height } | Shape::Pyramid { radius, height } => {
                (radius * radius + height * height / 4.0).sqrt()
            }
            Shape::Plane { width, height } => (width * width + height * height).sqrt() / 2.0,
            Shape::Dodecahedron { radius } | Shape::Icosahedron { radius } => radius,
            Shape::Torus { radius, tube, .. } => radius + tube,
            Shape::TorusKnot { radius, tube, .. } => radius + 2.0 * tube,
        }
    }
}
