use haunted_scene::{NodeKind, PerspectiveCamera, Scene};
use std::fmt::Write;

/// Errors surfaced by a draw target. None of them are retried; the caller
/// treats any of them as the end of the session.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("drawing surface lost")]
    SurfaceLost,
    #[error("drawing surface out of memory")]
    OutOfMemory,
    #[error("draw failed: {0}")]
    Backend(String),
}

/// What a successful draw call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A frame was produced.
    Drawn,
    /// The target could not produce a frame this time but can continue,
    /// e.g. a surface that had to be reconfigured.
    Skipped,
}

/// Something the render loop can draw the scene into.
pub trait DrawTarget {
    /// Draw one frame of `scene` as seen by `camera`.
    fn draw(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<DrawOutcome, RenderError>;

    /// Resize the output to `width` × `height` physical pixels.
    fn set_size(&mut self, width: u32, height: u32);

    /// Current output size.
    fn size(&self) -> (u32, u32);
}

/// Headless text renderer.
///
/// Produces a human-readable dump of each drawn frame. Useful for CLI output,
/// logging, and driving the render loop in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    width: u32,
    height: u32,
    frames: u64,
    last_frame: String,
}

impl DebugTextRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of the most recent frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Render a frame to text without counting it as drawn.
    pub fn describe(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let mut out = String::new();
        let fog = &scene.fog;
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}) ===",
            self.frames, self.width, self.height
        );
        let _ = writeln!(out, "Nodes: {}", scene.node_count());
        let _ = writeln!(
            out,
            "Fog: color={} near={:.2} far={:.2}",
            fog.color, fog.near, fog.far
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) aspect={:.3}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.aspect
        );

        for (id, node) in scene.nodes() {
            let NodeKind::Light(light) = &node.kind else {
                continue;
            };
            let Some(m) = scene.world_matrix(*id) else {
                continue;
            };
            let p = m.w_axis;
            let _ = writeln!(
                out,
                "  [{id}] {:<10} {} intensity={:.2} pos=({:.3}, {:.3}, {:.3})",
                node.name, light.color, light.intensity, p.x, p.y, p.z
            );
        }
        out
    }
}

impl DrawTarget for DebugTextRenderer {
    fn draw(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<DrawOutcome, RenderError> {
        self.last_frame = self.describe(scene, camera);
        self.frames += 1;
        tracing::trace!(frame = self.frames, "text frame drawn");
        Ok(DrawOutcome::Drawn)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
