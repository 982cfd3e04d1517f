use crate::builder::{SceneHandles, build_scene};
use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::scene::Scene;
use rand::Rng;

/// Drawing surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Everything the panel and the render loop operate on, built once at startup
/// and passed by reference.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub scene: Scene,
    pub handles: SceneHandles,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
}

impl SceneContext {
    /// Build the haunted house and a damped orbit camera sized to `viewport`.
    pub fn build<R: Rng>(rng: &mut R, viewport: Viewport) -> Self {
        let (scene, handles) = build_scene(rng);
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(viewport.width, viewport.height);
        Self {
            scene,
            handles,
            camera,
            controls: OrbitControls::damped(),
            viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn camera_matches_viewport() {
        let ctx = SceneContext::build(
            &mut StdRng::seed_from_u64(0),
            Viewport {
                width: 1000,
                height: 500,
            },
        );
        assert_eq!(ctx.camera.aspect, 2.0);
        assert!(ctx.controls.enable_damping);
        assert_eq!(ctx.camera.fov, 75.0);
    }
}
