use bytemuck::{Pod, Zeroable};
use haunted_scene::Geometry;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// CPU-side triangle list with counter-clockwise front faces.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Plane { width, height } => plane(width, height),
            Geometry::Box {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
            Geometry::Cone {
                radius,
                height,
                radial_segments,
            } => cone(radius, height, radial_segments),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments, height_segments),
        }
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.vertices.push(Vertex { position, normal });
        (self.vertices.len() - 1) as u32
    }
}

fn plane(width: f32, height: f32) -> MeshData {
    let (w, h) = (width / 2.0, height / 2.0);
    let n = [0.0, 0.0, 1.0];
    MeshData {
        vertices: vec![
            Vertex { position: [-w, -h, 0.0], normal: n },
            Vertex { position: [w, -h, 0.0], normal: n },
            Vertex { position: [w, h, 0.0], normal: n },
            Vertex { position: [-w, h, 0.0], normal: n },
        ],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0],  [[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]]),
        ([0.0, 0.0, -1.0], [[ x, -y, -z], [-x, -y, -z], [-x,  y, -z], [ x,  y, -z]]),
        ([1.0, 0.0, 0.0],  [[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]]),
        ([-1.0, 0.0, 0.0], [[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]]),
        ([0.0, 1.0, 0.0],  [[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]]),
        ([0.0, -1.0, 0.0], [[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]]),
    ];
    let mut mesh = MeshData::default();
    for (normal, corners) in faces {
        let base = mesh.vertices.len() as u32;
        for c in corners {
            mesh.push(c, normal);
        }
        mesh.indices
            .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// Flat-shaded cone: one triangle per side plus a base cap.
fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height / 2.0;
    let apex = glam::Vec3::new(0.0, half, 0.0);
    let rim = |i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        glam::Vec3::new(radius * theta.sin(), -half, radius * theta.cos())
    };

    let mut mesh = MeshData::default();
    for i in 0..segments {
        let (b0, b1) = (rim(i), rim(i + 1));
        let normal = (b1 - b0).cross(apex - b0).normalize().to_array();
        let a = mesh.push(b0.to_array(), normal);
        let b = mesh.push(b1.to_array(), normal);
        let c = mesh.push(apex.to_array(), normal);
        mesh.indices.extend([a, b, c]);
    }

    let down = [0.0, -1.0, 0.0];
    let center = mesh.push([0.0, -half, 0.0], down);
    for i in 0..segments {
        let b0 = mesh.push(rim(i).to_array(), down);
        let b1 = mesh.push(rim(i + 1).to_array(), down);
        mesh.indices.extend([center, b1, b0]);
    }
    mesh
}

/// UV sphere with smooth normals.
fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=hs {
        let phi = iy as f32 / hs as f32 * PI;
        for ix in 0..=ws {
            let theta = ix as f32 / ws as f32 * TAU;
            let n = [
                -theta.cos() * phi.sin(),
                phi.cos(),
                theta.sin() * phi.sin(),
            ];
            mesh.push([n[0] * radius, n[1] * radius, n[2] * radius], n);
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend([a, b, d]);
            }
            if iy != hs - 1 {
                mesh.indices.extend([b, c, d]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangles(mesh: &MeshData) -> usize {
        mesh.indices.len() / 3
    }

    /// Every non-degenerate triangle must wind counter-clockwise when seen
    /// from the side its vertex normals point to.
    fn assert_outward_winding(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let pa = Vec3::from(a.position);
            let face = (Vec3::from(b.position) - pa).cross(Vec3::from(c.position) - pa);
            if face.length() < 1e-6 {
                continue;
            }
            let avg = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
            assert!(face.dot(avg) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn plane_is_two_triangles_facing_z() {
        let m = MeshData::from_geometry(&Geometry::Plane {
            width: 2.0,
            height: 4.0,
        });
        assert_eq!(triangles(&m), 2);
        assert_eq!(m.vertices[2].position, [1.0, 2.0, 0.0]);
        assert_outward_winding(&m);
    }

    #[test]
    fn box_has_six_faces() {
        let m = MeshData::from_geometry(&Geometry::Box {
            width: 4.0,
            height: 2.5,
            depth: 4.0,
        });
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(triangles(&m), 12);
        assert!(m.vertices.iter().all(|v| v.position[1].abs() == 1.25));
        assert_outward_winding(&m);
    }

    #[test]
    fn four_sided_cone_is_a_pyramid() {
        let m = MeshData::from_geometry(&Geometry::Cone {
            radius: 3.5,
            height: 1.0,
            radial_segments: 4,
        });
        assert_eq!(triangles(&m), 8);
        let top = m
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(top, 0.5);
        assert_outward_winding(&m);
    }

    #[test]
    fn sphere_vertices_lie_on_surface() {
        let m = MeshData::from_geometry(&Geometry::Sphere {
            radius: 2.0,
            width_segments: 16,
            height_segments: 16,
        });
        assert_eq!(m.vertices.len(), 17 * 17);
        assert_eq!(triangles(&m), 16 * 16 * 2 - 32);
        for v in &m.vertices {
            let len = Vec3::from(v.position).length();
            assert!((len - 2.0).abs() < 1e-4);
        }
        assert_outward_winding(&m);
    }

    #[test]
    fn indices_stay_in_bounds() {
        for g in [
            Geometry::Plane {
                width: 1.0,
                height: 1.0,
            },
            Geometry::Cone {
                radius: 1.0,
                height: 1.0,
                radial_segments: 2,
            },
            Geometry::Sphere {
                radius: 1.0,
                width_segments: 1,
                height_segments: 1,
            },
        ] {
            let m = MeshData::from_geometry(&g);
            let n = m.vertices.len() as u32;
            assert!(m.indices.iter().all(|i| *i < n));
        }
    }
}
