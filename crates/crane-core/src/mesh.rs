//! Procedural triangle meshes for every [`Shape`].

use crate::shape::Shape;
use fnv::FnvHashSet;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

const SPHERE_SEGMENTS: u32 = 16;
const SPHERE_RINGS: u32 = 12;
const CYLINDER_SEGMENTS: u32 = 16;
const TORUS_TUBULAR: u32 = 32;
const TORUS_RADIAL: u32 = 12;
const KNOT_TUBULAR: u32 = 96;
const KNOT_RADIAL: u32 = 8;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    /// Unique undirected triangle edges, for wireframe drawing.
    pub edges: Vec<[u32; 2]>,
}

impl Mesh {
    pub fn from_shape(shape: &Shape) -> Self {
        let mut mesh = match *shape {
            Shape::Cuboid { size } => cuboid(size),
            Shape::Sphere { radius } => sphere(radius),
            Shape::Cylinder { radius, height } => cone(radius, radius, height, CYLINDER_SEGMENTS),
            Shape::Pyramid { radius, height } => cone(0.0, radius, height, 4),
            Shape::Plane { width, height } => plane(width, height),
            Shape::Dodecahedron { radius } => dodecahedron(radius),
            Shape::Icosahedron { radius } => icosahedron(radius),
            Shape::Torus { radius, tube, arc } => torus(radius, tube, arc),
            Shape::TorusKnot { radius, tube, p, q } => torus_knot(radius, tube, p, q),
        };
        mesh.rebuild_edges();
        mesh
    }

    fn rebuild_edges(&mut self) {
        let mut seen = FnvHashSet::default();
        self.edges.clear();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { [a, b] } else { [b, a] };
                if seen.insert(key) {
                    self.edges.push(key);
                }
            }
        }
    }
}

/// Grid of `(cols + 1) * (rows + 1)` vertices from `f(u, v)` with u, v in
/// [0, 1], two triangles per cell.
fn grid(cols: u32, rows: u32, f: impl Fn(f32, f32) -> Vec3) -> Mesh {
    let mut positions = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);
    for j in 0..=rows {
        for i in 0..=cols {
            positions.push(f(i as f32 / cols as f32, j as f32 / rows as f32));
        }
    }
    let stride = cols + 1;
    let mut triangles = Vec::with_capacity((cols * rows * 2) as usize);
    for j in 0..rows {
        for i in 0..cols {
            let a = j * stride + i;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            triangles.push([a, c, b]);
            triangles.push([b, c, d]);
        }
    }
    Mesh {
        positions,
        triangles,
        edges: Vec::new(),
    }
}

fn cuboid(size: Vec3) -> Mesh {
    let h = size * 0.5;
    let positions = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        })
        .collect();
    let quads = [
        [0, 2, 6, 4], // -x
        [1, 5, 7, 3], // +x
        [0, 4, 5, 1], // -y
        [2, 3, 7, 6], // +y
        [0, 1, 3, 2], // -z
        [4, 6, 7, 5], // +z
    ];
    let triangles = quads
        .iter()
        .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
        .collect();
    Mesh {
        positions,
        triangles,
        edges: Vec::new(),
    }
}

fn sphere(radius: f32) -> Mesh {
    grid(SPHERE_SEGMENTS, SPHERE_RINGS, |u, v| {
        let phi = u * TAU;
        let theta = v * PI;
        Vec3::new(
            -phi.cos() * theta.sin(),
            theta.cos(),
            phi.sin() * theta.sin(),
        ) * radius
    })
}

/// Frustum along Y from `-height/2` to `+height/2`, with end caps. A zero
/// top radius gives a cone (four segments make a pyramid).
fn cone(top: f32, bottom: f32, height: f32, segments: u32) -> Mesh {
    let half = height / 2.0;
    let mut mesh = grid(segments, 1, |u, v| {
        let theta = u * TAU;
        let r = top + (bottom - top) * v;
        Vec3::new(r * theta.sin(), half - v * height, r * theta.cos())
    });
    for (y, r, flip) in [(half, top, false), (-half, bottom, true)] {
        if r <= 0.0 {
            continue;
        }
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, y, 0.0));
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            mesh.positions.push(Vec3::new(r * theta.sin(), y, r * theta.cos()));
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = a + 1;
            mesh.triangles
                .push(if flip { [center, b, a] } else { [center, a, b] });
        }
    }
    mesh
}

fn plane(width: f32, height: f32) -> Mesh {
    grid(1, 1, |u, v| {
        Vec3::new((u - 0.5) * width, (0.5 - v) * height, 0.0)
    })
}

fn polyhedron(vertices: &[[f32; 3]], faces: &[[u32; 3]], radius: f32) -> Mesh {
    Mesh {
        positions: vertices
            .iter()
            .map(|v| Vec3::from_array(*v).normalize() * radius)
            .collect(),
        triangles: faces.to_vec(),
        edges: Vec::new(),
    }
}

fn icosahedron(radius: f32) -> Mesh {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let vertices = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    polyhedron(&vertices, &faces, radius)
}

fn dodecahedron(radius: f32) -> Mesh {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    let vertices = [
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [0.0, -r, -t],
        [0.0, -r, t],
        [0.0, r, -t],
        [0.0, r, t],
        [-r, -t, 0.0],
        [-r, t, 0.0],
        [r, -t, 0.0],
        [r, t, 0.0],
        [-t, 0.0, -r],
        [t, 0.0, -r],
        [-t, 0.0, r],
        [t, 0.0, r],
    ];
    let faces = [
        [3, 11, 7],
        [3, 7, 15],
        [3, 15, 13],
        [7, 19, 17],
        [7, 17, 6],
        [7, 6, 15],
        [17, 4, 8],
        [17, 8, 10],
        [17, 10, 6],
        [8, 0, 16],
        [8, 16, 2],
        [8, 2, 10],
        [0, 12, 1],
        [0, 1, 18],
        [0, 18, 16],
        [6, 10, 2],
        [6, 2, 13],
        [6, 13, 15],
        [2, 16, 18],
        [2, 18, 3],
        [2, 3, 13],
        [18, 1, 9],
        [18, 9, 11],
        [18, 11, 3],
        [4, 14, 12],
        [4, 12, 0],
        [4, 0, 8],
        [11, 9, 5],
        [11, 5, 19],
        [11, 19, 7],
        [19, 5, 14],
        [19, 14, 4],
        [19, 4, 17],
        [1, 12, 14],
        [1, 14, 5],
        [1, 5, 9],
    ];
    polyhedron(&vertices, &faces, radius)
}

/// Torus in the XY plane swept through `arc` radians.
fn torus(radius: f32, tube: f32, arc: f32) -> Mesh {
    grid(TORUS_TUBULAR, TORUS_RADIAL, |u, v| {
        let a = u * arc;
        let b = v * TAU;
        let ring = radius + tube * b.cos();
        Vec3::new(ring * a.cos(), ring * a.sin(), tube * b.sin())
    })
}

fn knot_curve(t: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qt = q / p * t;
    let cs = qt.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * t.cos(),
        radius * (2.0 + cs) * 0.5 * t.sin(),
        radius * qt.sin() * 0.5,
    )
}

/// (p, q) torus knot with a circular tube swept along the curve.
fn torus_knot(radius: f32, tube: f32, p: u32, q: u32) -> Mesh {
    let (p, q) = (p.max(1) as f32, q as f32);
    grid(KNOT_TUBULAR, KNOT_RADIAL, |u, v| {
        let t = u * p * TAU;
        let p1 = knot_curve(t, p, q, radius);
        let p2 = knot_curve(t + 0.01, p, q, radius);
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize_or_zero();
        normal = binormal.cross(tangent).normalize_or_zero();
        let angle = v * TAU;
        p1 + normal * (-tube * angle.cos()) + binormal * (tube * angle.sin())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shapes() -> Vec<Shape> {
        vec![
            Shape::Cuboid {
                size: Vec3::new(5.0, 10.0, 15.0),
            },
            Shape::Sphere { radius: 3.0 },
            Shape::Cylinder {
                radius: 0.5,
                height: 10.0,
            },
            Shape::Pyramid {
                radius: 1.0,
                height: 13.0,
            },
            Shape::Plane {
                width: 25.0,
                height: 25.0,
            },
            Shape::Dodecahedron { radius: 6.0 },
            Shape::Icosahedron { radius: 6.0 },
            Shape::Torus {
                radius: 6.0,
                tube: 3.0,
                arc: 4.0,
            },
            Shape::TorusKnot {
                radius: 4.0,
                tube: 2.0,
                p: 3,
                q: 2,
            },
        ]
    }

    #[test]
    fn every_shape_yields_an_index_valid_mesh() {
        for shape in all_shapes() {
            let mesh = Mesh::from_shape(&shape);
            assert!(!mesh.triangles.is_empty(), "{shape:?}");
            assert!(!mesh.edges.is_empty(), "{shape:?}");
            let n = mesh.positions.len() as u32;
            assert!(mesh.triangles.iter().flatten().all(|i| *i < n), "{shape:?}");
            assert!(mesh.edges.iter().flatten().all(|i| *i < n), "{shape:?}");
            assert!(mesh.positions.iter().all(|p| p.is_finite()), "{shape:?}");
        }
    }

    #[test]
    fn closed_shapes_fit_inside_their_bounding_radius() {
        for shape in all_shapes() {
            if matches!(shape, Shape::TorusKnot { .. }) {
                continue;
            }
            let r = shape.bounding_radius();
            let mesh = Mesh::from_shape(&shape);
            let far = mesh.positions.iter().map(|p| p.length()).fold(0.0, f32::max);
            assert!(far <= r + 1e-3, "{shape:?}: vertex at {far} > {r}");
        }
    }

    #[test]
    fn torus_knot_stays_within_its_curve_extent() {
        let (radius, tube) = (6.0, 2.0);
        let knot = Shape::TorusKnot {
            radius,
            tube,
            p: 2,
            q: 3,
        };
        let mesh = Mesh::from_shape(&knot);
        let far = mesh.positions.iter().map(|p| p.length()).fold(0.0, f32::max);
        assert!(far <= 1.5 * radius + tube + 1e-2, "knot vertex at {far}");
        assert!(far > knot.bounding_radius(), "knot reaches past {}", knot.bounding_radius());
    }

    #[test]
    fn platonic_solids_have_expected_face_counts() {
        assert_eq!(Mesh::from_shape(&Shape::Icosahedron { radius: 1.0 }).triangles.len(), 20);
        let d = Mesh::from_shape(&Shape::Dodecahedron { radius: 1.0 });
        assert_eq!(d.triangles.len(), 36);
        assert_eq!(d.positions.len(), 20);
    }
}
