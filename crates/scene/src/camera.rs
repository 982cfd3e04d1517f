use glam::{Mat4, Vec3};

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(4.0, 2.0, 5.0),
            target: Vec3::ZERO,
            fov: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl PerspectiveCamera {
    /// Follow a new surface size. A zero-sized side (a minimized window)
    /// keeps the previous aspect.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Damped orbit controls around `camera.target`.
///
/// Input accumulates into pending deltas; [`OrbitControls::update`] applies a
/// `damping_factor` share of them each frame and decays the rest, so motion
/// settles gradually after input stops.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

/// Smallest polar angle kept away from the poles.
const POLE_EPS: f32 = 1e-6;

impl OrbitControls {
    pub fn damped() -> Self {
        Self {
            enable_damping: true,
            ..Self::default()
        }
    }

    /// Queue a rotation, in radians, around the vertical axis.
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle * self.rotate_speed;
    }

    /// Queue a rotation, in radians, toward the top pole.
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle * self.rotate_speed;
    }

    /// Queue a dolly. Positive `steps` move toward the target.
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= 0.95_f32.powf(steps * self.zoom_speed);
    }

    /// Queue a pan in view space, in world units.
    pub fn pan(&mut self, camera: &PerspectiveCamera, dx: f32, dy: f32) {
        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.pan_offset += (-right * dx + up * dy) * self.pan_speed;
    }

    /// Apply pending motion to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - camera.target;
        let mut radius = offset.length();
        if radius == 0.0 {
            return false;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * share;
        phi += self.delta_phi * share;
        phi = phi.clamp(POLE_EPS, std::f32::consts::PI - POLE_EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        camera.target += self.pan_offset * share;

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        let old_position = camera.position;
        camera.position = camera.target + new_offset;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(old_position) > 1e-8
    }
}
