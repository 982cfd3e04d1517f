//! Builds the haunted house scene.

use crate::fog::Fog;
use crate::node::{Geometry, Light, Material, Node};
use crate::scene::Scene;
use glam::Vec3;
use haunted_common::{Color, NodeId, Transform};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Number of graves scattered around the house.
pub const GRAVE_COUNT: usize = 50;
/// Inner (inclusive) and outer (exclusive) radius of the graveyard ring.
pub const GRAVE_RADIUS_MIN: f32 = 3.0;
pub const GRAVE_RADIUS_MAX: f32 = 9.0;
/// Graves are tilted by at most this many radians either way.
pub const GRAVE_YAW_JITTER: f32 = 0.2;
pub const GRAVE_HEIGHT: f32 = 0.3;

pub const NIGHT_COLOR: Color = Color::from_hex(0x262837);
pub const MOON_COLOR: Color = Color::from_hex(0xb9d5ff);

/// Polar placement of one grave on the ring around the house.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravePlacement {
    /// Radians in `[0, 2π)`.
    pub angle: f32,
    /// Distance from the origin in `[3, 9)`.
    pub radius: f32,
    /// Yaw jitter in `[-0.2, 0.2)`.
    pub yaw: f32,
}

impl GravePlacement {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            angle: rng.gen_range(0.0..TAU),
            radius: rng.gen_range(GRAVE_RADIUS_MIN..GRAVE_RADIUS_MAX),
            yaw: rng.gen_range(-GRAVE_YAW_JITTER..GRAVE_YAW_JITTER),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius,
            GRAVE_HEIGHT,
            self.angle.sin() * self.radius,
        )
    }
}

/// Ids of every node the panel and the render loop refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHandles {
    pub floor: NodeId,
    pub house: NodeId,
    pub walls: NodeId,
    pub roof: NodeId,
    pub door: NodeId,
    pub bushes: Vec<NodeId>,
    pub graveyard: NodeId,
    pub graves: Vec<NodeId>,
    pub ambient: NodeId,
    pub moon: NodeId,
    pub door_light: NodeId,
    pub ghosts: [NodeId; 3],
}

/// Step-by-step construction of the scene. [`build_scene`] runs every step in
/// order; the steps are public so tests and tools can build partial scenes.
pub struct HouseBuilder {
    scene: Scene,
}

impl Default for HouseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale and position of each bush beside the door.
const BUSHES: [(f32, [f32; 3]); 1] = [(0.5, [0.8, 0.2, 2.2])];

impl HouseBuilder {
    /// Start from an empty scene wrapped in night fog.
    pub fn new() -> Self {
        let mut scene = Scene::new();
        scene.fog = Fog::new(NIGHT_COLOR, 1.0, 15.0);
        scene.background = NIGHT_COLOR;
        Self { scene }
    }

    pub fn floor(&mut self) -> NodeId {
        self.scene.add(
            Node::mesh(
                "floor",
                Geometry::Plane {
                    width: 20.0,
                    height: 20.0,
                },
                Material::new(Color::from_hex(0xa9c388)),
            )
            .with_transform(Transform::default().with_pitch(-FRAC_PI_2))
            .receiving_shadow(),
        )
    }

    /// House group with walls, roof, door and bushes.
    /// Returns `(house, walls, roof, door, bushes)`.
    pub fn house(&mut self) -> (NodeId, NodeId, NodeId, NodeId, Vec<NodeId>) {
        let house = self.scene.add(Node::group("house"));

        let walls = self.scene.add_child(
            house,
            Node::mesh(
                "walls",
                Geometry::Box {
                    width: 4.0,
                    height: 2.5,
                    depth: 4.0,
                },
                Material::new(Color::from_hex(0xac8e82)),
            )
            .with_transform(Transform::from_translation(Vec3::new(0.0, 1.25, 0.0)))
            .casting_shadow(),
        );

        let roof = self.scene.add_child(
            house,
            Node::mesh(
                "roof",
                Geometry::Cone {
                    radius: 3.5,
                    height: 1.0,
                    radial_segments: 4,
                },
                Material::new(Color::from_hex(0xb35f45)),
            )
            .with_transform(Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)).with_yaw(FRAC_PI_4)),
        );

        let door = self.scene.add_child(
            house,
            Node::mesh(
                "door",
                Geometry::Plane {
                    width: 2.2,
                    height: 2.2,
                },
                Material::new(Color::from_hex(0xaa7b7b)),
            )
            .with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 2.01))),
        );

        let bush_geometry = Geometry::Sphere {
            radius: 1.0,
            width_segments: 16,
            height_segments: 16,
        };
        let bush_material = Material::new(Color::from_hex(0x89c854));
        let bushes = BUSHES
            .iter()
            .enumerate()
            .map(|(i, (scale, [x, y, z]))| {
                self.scene.add_child(
                    house,
                    Node::mesh(format!("bush{}", i + 1), bush_geometry, bush_material)
                        .with_transform(
                            Transform::from_translation(Vec3::new(*x, *y, *z))
                                .with_uniform_scale(*scale),
                        )
                        .casting_shadow(),
                )
            })
            .collect();

        (house, walls, roof, door, bushes)
    }

    /// Graveyard group plus [`GRAVE_COUNT`] randomly placed graves.
    pub fn graves<R: Rng>(&mut self, rng: &mut R) -> (NodeId, Vec<NodeId>) {
        let graveyard = self.scene.add(Node::group("graves"));
        let geometry = Geometry::Box {
            width: 0.6,
            height: 0.8,
            depth: 0.2,
        };
        let material = Material::new(Color::from_hex(0xb2b6b1));

        let graves = (0..GRAVE_COUNT)
            .map(|i| {
                let placement = GravePlacement::sample(rng);
                self.scene.add_child(
                    graveyard,
                    Node::mesh(format!("grave{i:02}"), geometry, material)
                        .with_transform(
                            Transform::from_translation(placement.position()).with_yaw(placement.yaw),
                        )
                        .casting_shadow(),
                )
            })
            .collect();
        (graveyard, graves)
    }

    /// Ambient, moon and door lights. The door light hangs off the house group.
    /// Returns `(ambient, moon, door_light)`.
    pub fn lights(&mut self, house: NodeId) -> (NodeId, NodeId, NodeId) {
        let ambient = self
            .scene
            .add(Node::light("ambient", Light::ambient(MOON_COLOR, 0.12)));
        let moon = self.scene.add(
            Node::light("moon", Light::directional(MOON_COLOR, 0.12))
                .with_transform(Transform::from_translation(Vec3::new(4.0, 5.0, -2.0)))
                .casting_shadow(),
        );
        let door_light = self.scene.add_child(
            house,
            Node::light("doorLight", Light::point(Color::from_hex(0xff7d46), 1.0, 7.0))
                .with_transform(Transform::from_translation(Vec3::new(0.0, 2.2, 2.7)))
                .casting_shadow(),
        );
        (ambient, moon, door_light)
    }

    /// The three orbiting ghost lights, parked at the origin until animated.
    pub fn ghosts(&mut self) -> [NodeId; 3] {
        [
            ("ghost1", 0xff00ff),
            ("ghost2", 0x00ffff),
            ("ghost3", 0xffff00),
        ]
        .map(|(name, hex)| {
            self.scene
                .add(Node::light(name, Light::point(Color::from_hex(hex), 2.0, 3.0)))
        })
    }

    pub fn finish(self) -> Scene {
        self.scene
    }
}

/// Build the complete haunted house scene.
pub fn build_scene<R: Rng>(rng: &mut R) -> (Scene, SceneHandles) {
    let mut b = HouseBuilder::new();
    let floor = b.floor();
    let (house, walls, roof, door, bushes) = b.house();
    let (graveyard, graves) = b.graves(rng);
    let (ambient, moon, door_light) = b.lights(house);
    let ghosts = b.ghosts();
    let scene = b.finish();

    tracing::info!(nodes = scene.node_count(), graves = graves.len(), "scene built");

    let handles = SceneHandles {
        floor,
        house,
        walls,
        roof,
        door,
        bushes,
        graveyard,
        graves,
        ambient,
        moon,
        door_light,
        ghosts,
    };
    (scene, handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build(seed: u64) -> (Scene, SceneHandles) {
        build_scene(&mut StdRng::seed_from_u64(seed))
    }

    /// Recover the placement from a grave's transform.
    fn placement_of(t: &Transform) -> GravePlacement {
        let p = t.position;
        let (yaw, _, _) = t.rotation.to_euler(glam::EulerRot::YXZ);
        GravePlacement {
            angle: p.z.atan2(p.x).rem_euclid(TAU),
            radius: Vec3::new(p.x, 0.0, p.z).length(),
            yaw,
        }
    }

    #[test]
    fn exactly_fifty_graves() {
        let (scene, h) = build(1);
        assert_eq!(h.graves.len(), GRAVE_COUNT);
        assert_eq!(scene.children(h.graveyard).count(), GRAVE_COUNT);
    }

    #[test]
    fn grave_placements_lie_on_the_ring() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let p = GravePlacement::sample(&mut rng);
            assert!((0.0..TAU).contains(&p.angle), "angle {}", p.angle);
            assert!((3.0..9.0).contains(&p.radius), "radius {}", p.radius);
            assert!((-0.2..0.2).contains(&p.yaw), "yaw {}", p.yaw);
        }
    }

    #[test]
    fn built_graves_match_placement_bounds() {
        let (scene, h) = build(3);
        for id in &h.graves {
            let node = scene.get(*id).unwrap();
            assert_eq!(node.transform.position.y, GRAVE_HEIGHT);
            assert!(node.cast_shadow);
            let p = placement_of(&node.transform);
            assert!(p.radius >= 3.0 - 1e-4 && p.radius < 9.0 + 1e-4);
            assert!(p.angle >= 0.0 && p.angle <= TAU);
            assert!(p.yaw.abs() <= 0.2 + 1e-5);
        }
    }

    #[test]
    fn non_grave_geometry_is_identical_across_builds() {
        let (a, ha) = build(1);
        let (b, hb) = build(2);
        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(ha, hb);
        assert_eq!(a.fog, b.fog);
        for ((ida, na), (idb, nb)) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(ida, idb);
            if ha.graves.contains(ida) {
                assert_eq!(na.kind, nb.kind);
                continue;
            }
            assert_eq!(na, nb);
        }
    }

    #[test]
    fn same_seed_reproduces_graves() {
        let (a, _) = build(11);
        let (b, _) = build(11);
        assert_eq!(a, b);
    }

    #[test]
    fn initial_lights() {
        let (scene, h) = build(0);
        let ambient = scene.light(h.ambient).unwrap();
        assert_eq!(ambient.intensity, 0.12);
        assert_eq!(ambient.color.to_hex(), 0xb9d5ff);

        let moon = scene.get(h.moon).unwrap();
        assert_eq!(moon.transform.position, Vec3::new(4.0, 5.0, -2.0));
        assert!(moon.cast_shadow);

        let door = scene.light(h.door_light).unwrap();
        assert_eq!(door.intensity, 1.0);
        assert_eq!(scene.get(h.door_light).unwrap().parent, Some(h.house));

        let colors: Vec<u32> = h
            .ghosts
            .iter()
            .map(|id| scene.light(*id).unwrap().color.to_hex())
            .collect();
        assert_eq!(colors, vec![0xff00ff, 0x00ffff, 0xffff00]);
        for id in h.ghosts {
            assert_eq!(scene.light(id).unwrap().intensity, 2.0);
        }
    }

    #[test]
    fn house_parts_are_children_of_house() {
        let (scene, h) = build(0);
        for id in [h.walls, h.roof, h.door] {
            assert_eq!(scene.get(id).unwrap().parent, Some(h.house));
        }
        assert_eq!(h.bushes.len(), 1);
        let bush = scene.get(h.bushes[0]).unwrap();
        assert_eq!(bush.parent, Some(h.house));
        assert_eq!(bush.transform.position, Vec3::new(0.8, 0.2, 2.2));
        assert_eq!(bush.transform.scale, Vec3::splat(0.5));
        let walls = scene.get(h.walls).unwrap();
        assert_eq!(walls.transform.position.y, 1.25);
        assert!(matches!(walls.kind, NodeKind::Mesh { geometry: Geometry::Box { .. }, .. }));
    }

    #[test]
    fn floor_lies_flat_and_fog_is_set() {
        let (scene, h) = build(0);
        let floor = scene.world_matrix(h.floor).unwrap();
        let normal = floor.transform_vector3(Vec3::Z);
        assert_relative_eq!(normal.y, 1.0, epsilon = 1e-6);
        assert_eq!(scene.fog.near, 1.0);
        assert_eq!(scene.fog.far, 15.0);
        assert_eq!(scene.fog.color.to_hex(), 0x262837);
    }
}
