use haunted_common::{Color, NodeId, Transform};
use serde::{Deserialize, Serialize};

/// Primitive geometry description. The renderer turns these into vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Quad in the local XY plane facing +Z.
    Plane { width: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    /// Apex at `+height / 2`, base cap at `-height / 2`.
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

/// Flat-colored standard material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
}

impl Material {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Uniform light from every direction.
    Ambient,
    /// Parallel rays travelling from the node position toward the origin.
    Directional,
    /// Omnidirectional light whose contribution reaches zero at `distance`.
    Point { distance: f32, decay: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
        }
    }

    /// Point light with the physically based default decay of 2.
    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point {
                distance,
                decay: 2.0,
            },
            color,
            intensity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure container; contributes only its transform to children.
    Group,
    Mesh {
        geometry: Geometry,
        material: Material,
    },
    Light(Light),
}

/// A node in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub parent: Option<NodeId>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::default(),
            parent: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh { geometry, material })
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_defaults_to_inverse_square_decay() {
        let l = Light::point(Color::WHITE, 2.0, 3.0);
        assert_eq!(
            l.kind,
            LightKind::Point {
                distance: 3.0,
                decay: 2.0
            }
        );
    }

    #[test]
    fn light_accessors_only_match_lights() {
        let mut n = Node::light("lamp", Light::ambient(Color::WHITE, 0.5));
        assert_eq!(n.as_light().map(|l| l.intensity), Some(0.5));
        n.as_light_mut().unwrap().intensity = 0.25;
        assert_eq!(n.as_light().unwrap().intensity, 0.25);

        let g = Node::group("house");
        assert!(g.as_light().is_none());
    }

    #[test]
    fn builder_flags() {
        let n = Node::group("g").casting_shadow().receiving_shadow();
        assert!(n.cast_shadow);
        assert!(n.receive_shadow);
    }
}
