use haunted_common::Color;

/// Linear distance fog.
///
/// Fragments nearer than `near` keep their color, fragments beyond `far` take
/// the fog color. `near > far` is allowed and inverts the ramp.
///
/// The ramp is a straight line over the Euclidean distance from the camera to
/// the fragment, not a smoothstep over view-space depth, so objects at the
/// edge of the view fog the same as objects straight ahead at that distance.
/// The wgpu shader evaluates the same law per fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Fog {
    pub fn new(color: Color, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Blend factor toward the fog color for a fragment `distance` away from
    /// the camera.
    pub fn factor(&self, distance: f32) -> f32 {
        let span = self.far - self.near;
        if span == 0.0 {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_ramp_between_near_and_far() {
        let fog = Fog::new(Color::BLACK, 2.0, 10.0);
        assert_eq!(fog.factor(0.0), 0.0);
        assert_eq!(fog.factor(1.99), 0.0);
        assert_eq!(fog.factor(2.0), 0.0);
        assert_relative_eq!(fog.factor(6.0), 0.5);
        assert_eq!(fog.factor(10.0), 1.0);
        assert_eq!(fog.factor(50.0), 1.0);
    }

    #[test]
    fn near_beyond_far_inverts() {
        let fog = Fog::new(Color::BLACK, 5.0, 4.0);
        assert_eq!(fog.factor(3.0), 1.0);
        assert_eq!(fog.factor(6.0), 0.0);
    }

    #[test]
    fn equal_near_far_is_a_step() {
        let fog = Fog::new(Color::BLACK, 5.0, 5.0);
        assert_eq!(fog.factor(4.9), 0.0);
        assert_eq!(fog.factor(5.0), 1.0);
    }

    #[test]
    fn ramp_has_constant_slope() {
        let fog = Fog::new(Color::BLACK, 0.0, 10.0);
        for d in [1.0, 2.5, 5.0, 7.5, 9.0] {
            assert_relative_eq!(fog.factor(d), d / 10.0);
        }
        // A smoothstep ramp would give 0.15625 here.
        assert_relative_eq!(fog.factor(2.5), 0.25);
    }
}
