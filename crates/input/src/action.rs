use glam::Vec2;
use haunted_scene::{OrbitControls, PerspectiveCamera};
use std::f32::consts::TAU;

/// A camera action produced from pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit by a pointer drag, in physical pixels.
    Orbit(Vec2),
    /// Pan by a pointer drag, in physical pixels.
    Pan(Vec2),
    /// Zoom by wheel steps. Positive zooms in.
    Zoom(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Turns button and motion events into drag actions.
///
/// Primary drag orbits, secondary or middle drag pans.
#[derive(Debug, Default)]
pub struct PointerTracker {
    held: Option<PointerButton>,
    last: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: PointerButton) {
        if self.held.is_none() {
            self.held = Some(button);
        }
    }

    pub fn release(&mut self, button: PointerButton) {
        if self.held == Some(button) {
            self.held = None;
        }
    }

    /// Pointer moved to `pos`. Returns a drag action while a button is held.
    pub fn moved(&mut self, pos: Vec2) -> Option<Action> {
        let prev = self.last.replace(pos)?;
        let delta = pos - prev;
        if delta == Vec2::ZERO {
            return None;
        }
        match self.held? {
            PointerButton::Primary => Some(Action::Orbit(delta)),
            PointerButton::Secondary | PointerButton::Middle => Some(Action::Pan(delta)),
        }
    }

    /// Pointer left the surface; the next move starts a fresh drag segment.
    pub fn left(&mut self) {
        self.last = None;
        self.held = None;
    }

    pub fn wheel(&self, steps: f32) -> Option<Action> {
        (steps != 0.0).then_some(Action::Zoom(steps))
    }
}

/// Queue an action on the orbit controls. `viewport_height` scales pixel
/// drags so a full-height drag orbits one full turn.
pub fn apply_action(
    controls: &mut OrbitControls,
    camera: &PerspectiveCamera,
    action: Action,
    viewport_height: u32,
) {
    let h = viewport_height.max(1) as f32;
    match action {
        Action::Orbit(d) => {
            controls.rotate_left(TAU * d.x / h);
            controls.rotate_up(TAU * d.y / h);
        }
        Action::Pan(d) => {
            let distance = camera.position.distance(camera.target);
            let half_fov = (camera.fov.to_radians() / 2.0).tan();
            let world_per_pixel = 2.0 * distance * half_fov / h;
            controls.pan(camera, d.x * world_per_pixel, d.y * world_per_pixel);
        }
        Action::Zoom(steps) => controls.dolly(steps),
    }
    tracing::trace!(?action, "camera action");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_without_button_is_ignored() {
        let mut p = PointerTracker::new();
        assert_eq!(p.moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(p.moved(Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn primary_drag_orbits() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::new(0.0, 0.0));
        p.press(PointerButton::Primary);
        assert_eq!(
            p.moved(Vec2::new(5.0, -2.0)),
            Some(Action::Orbit(Vec2::new(5.0, -2.0)))
        );
        p.release(PointerButton::Primary);
        assert!(p.held.is_none());
    }

    #[test]
    fn secondary_drag_pans() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.press(PointerButton::Secondary);
        assert_eq!(p.moved(Vec2::X), Some(Action::Pan(Vec2::X)));
    }

    #[test]
    fn first_button_wins_until_released() {
        let mut p = PointerTracker::new();
        p.press(PointerButton::Primary);
        p.press(PointerButton::Secondary);
        p.release(PointerButton::Secondary);
        assert!(p.held.is_some());
    }

    #[test]
    fn wheel_zero_is_no_action() {
        let p = PointerTracker::new();
        assert_eq!(p.wheel(0.0), None);
        assert_eq!(p.wheel(1.0), Some(Action::Zoom(1.0)));
    }

    #[test]
    fn orbit_action_moves_camera_after_update() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        let start = camera.position;
        apply_action(&mut controls, &camera, Action::Orbit(Vec2::new(100.0, 0.0)), 720);
        controls.update(&mut camera);
        assert!(camera.position.distance(start) > 0.1);
        approx::assert_relative_eq!(camera.position.length(), start.length(), epsilon = 1e-4);
    }

    #[test]
    fn zoom_in_moves_closer() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        let start = camera.position.length();
        apply_action(&mut controls, &camera, Action::Zoom(2.0), 720);
        controls.update(&mut camera);
        assert!(camera.position.length() < start);
    }

    #[test]
    fn pan_shifts_target() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        apply_action(&mut controls, &camera, Action::Pan(Vec2::new(50.0, 0.0)), 720);
        controls.update(&mut camera);
        assert!(camera.target.length() > 0.0);
    }
}
