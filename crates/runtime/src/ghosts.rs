use glam::Vec3;
use haunted_scene::SceneContext;

/// Positions of the three ghost lights `t` seconds after the loop started.
///
/// Each ghost circles the house at its own radius and angular speed while
/// bobbing vertically. Ghosts 2 and 3 travel clockwise. Angles are taken in
/// `f64` and only the final coordinates are narrowed.
pub fn ghost_positions(t: f64) -> [Vec3; 3] {
    let a1 = t * 0.5;
    let a2 = -t * 0.32;
    let a3 = -t * 0.18;
    [
        orbit(a1, 4.0, t * 3.0),
        orbit(a2, 5.0, t * 4.0),
        orbit(a3, 7.0, t * 2.5),
    ]
}

fn orbit(angle: f64, radius: f64, bob: f64) -> Vec3 {
    Vec3::new(
        (angle.cos() * radius) as f32,
        bob.sin() as f32,
        (angle.sin() * radius) as f32,
    )
}

/// Move the ghost nodes to their positions at time `t`.
pub fn animate_ghosts(ctx: &mut SceneContext, t: f64) {
    for (id, pos) in ctx.handles.ghosts.into_iter().zip(ghost_positions(t)) {
        if let Some(node) = ctx.scene.get_mut(id) {
            node.transform.position = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn expected(t: f64) -> [[f32; 3]; 3] {
        [
            [(t * 0.5).cos() * 4.0, (t * 3.0).sin(), (t * 0.5).sin() * 4.0],
            [(-t * 0.32).cos() * 5.0, (t * 4.0).sin(), (-t * 0.32).sin() * 5.0],
            [(-t * 0.18).cos() * 7.0, (t * 2.5).sin(), (-t * 0.18).sin() * 7.0],
        ]
        .map(|g| g.map(|v| v as f32))
    }

    #[test]
    fn positions_follow_closed_form() {
        for step in 0..400 {
            let t = f64::from(step) * 0.137;
            let got = ghost_positions(t);
            for (g, e) in got.iter().zip(expected(t)) {
                assert_relative_eq!(g.x, e[0], epsilon = 1e-5);
                assert_relative_eq!(g.y, e[1], epsilon = 1e-5);
                assert_relative_eq!(g.z, e[2], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn start_positions() {
        let [g1, g2, g3] = ghost_positions(0.0);
        assert_eq!(g1, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(g2, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(g3, Vec3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn orbit_radii_are_constant() {
        for t in [0.3, 2.0, 17.5, 120.0] {
            let [g1, g2, g3] = ghost_positions(t);
            assert_relative_eq!(Vec3::new(g1.x, 0.0, g1.z).length(), 4.0, epsilon = 1e-4);
            assert_relative_eq!(Vec3::new(g2.x, 0.0, g2.z).length(), 5.0, epsilon = 1e-4);
            assert_relative_eq!(Vec3::new(g3.x, 0.0, g3.z).length(), 7.0, epsilon = 1e-4);
            for g in [g1, g2, g3] {
                assert!(g.y.abs() <= 1.0);
            }
        }
    }

    #[test]
    fn ghosts_keep_moving_late_in_a_session() {
        let t = 200_000.0;
        let now = ghost_positions(t);
        let next = ghost_positions(t + 1.0 / 120.0);
        for (a, b) in now.iter().zip(next) {
            assert!(a.distance(b) > 1e-3, "ghost stalled: {a} -> {b}");
        }
        for (g, e) in now.iter().zip(expected(t)) {
            assert_relative_eq!(g.x, e[0], epsilon = 1e-5);
            assert_relative_eq!(g.z, e[2], epsilon = 1e-5);
        }
    }
}
