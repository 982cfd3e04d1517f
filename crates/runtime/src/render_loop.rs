use crate::clock::Clock;
use crate::ghosts::{animate_ghosts, ghost_positions};
use crate::timer::FrameTimer;
use glam::Vec3;
use haunted_render::{DrawOutcome, DrawTarget, RenderError};
use haunted_scene::{SceneContext, Viewport};
use std::time::Duration;

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Frames drawn so far, including this one.
    pub frame: u64,
    /// Clock reading used for this frame, in seconds.
    pub elapsed: f64,
    pub ghosts: [Vec3; 3],
    pub camera_moved: bool,
    /// False when the loop was stopped or the target skipped the frame.
    pub drawn: bool,
}

/// Per-frame driver: animates the ghosts, damps the camera and draws.
///
/// The loop starts running and stays running until [`RenderLoop::stop`] is
/// called or a draw fails. The host decides when to call
/// [`RenderLoop::iterate`]; the desktop app does so on every redraw and then
/// requests the next one.
#[derive(Debug)]
pub struct RenderLoop<C: Clock> {
    clock: C,
    running: bool,
    frames: u64,
    last_elapsed: f64,
    timer: FrameTimer,
}

impl<C: Clock> RenderLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            running: true,
            frames: 0,
            last_elapsed: 0.0,
            timer: FrameTimer::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::info!(frames = self.frames, "render loop stopped");
        }
        self.running = false;
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Run one iteration. A draw failure stops the loop and is returned.
    ///
    /// A frame the target skips still animates the scene, but is not counted
    /// and does not feed the frame timer.
    pub fn iterate<T: DrawTarget + ?Sized>(
        &mut self,
        ctx: &mut SceneContext,
        target: &mut T,
    ) -> Result<FrameInfo, RenderError> {
        if !self.running {
            return Ok(FrameInfo {
                frame: self.frames,
                elapsed: self.last_elapsed,
                ghosts: ghost_positions(self.last_elapsed),
                camera_moved: false,
                drawn: false,
            });
        }

        let t = self.clock.elapsed();
        animate_ghosts(ctx, t);
        let camera_moved = ctx.controls.update(&mut ctx.camera);

        match target.draw(&ctx.scene, &ctx.camera) {
            Ok(DrawOutcome::Drawn) => {}
            Ok(DrawOutcome::Skipped) => {
                tracing::trace!(frame = self.frames, t, "frame skipped");
                return Ok(FrameInfo {
                    frame: self.frames,
                    elapsed: t,
                    ghosts: ghost_positions(t),
                    camera_moved,
                    drawn: false,
                });
            }
            Err(e) => {
                tracing::error!("draw failed: {e}");
                self.running = false;
                return Err(e);
            }
        }

        self.timer
            .record(Duration::from_secs_f64((t - self.last_elapsed).max(0.0)));
        self.last_elapsed = t;
        self.frames += 1;
        tracing::trace!(frame = self.frames, t, "frame drawn");

        Ok(FrameInfo {
            frame: self.frames,
            elapsed: t,
            ghosts: ghost_positions(t),
            camera_moved,
            drawn: true,
        })
    }
}

/// React to a new surface size: camera aspect, target size and viewport follow
/// `width` × `height`. Scene content is untouched.
pub fn resize<T: DrawTarget + ?Sized>(ctx: &mut SceneContext, target: &mut T, width: u32, height: u32) {
    ctx.camera.set_aspect(width, height);
    ctx.viewport = Viewport { width, height };
    target.set_size(width, height);
    tracing::info!(width, height, "resized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use approx::assert_relative_eq;
    use haunted_panel::{ParamId, ParamValue, ParameterPanel};
    use haunted_render::DebugTextRenderer;
    use haunted_scene::{PerspectiveCamera, Scene};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ctx() -> SceneContext {
        SceneContext::build(&mut StdRng::seed_from_u64(3), Viewport::default())
    }

    struct FailingTarget;

    impl DrawTarget for FailingTarget {
        fn draw(&mut self, _: &Scene, _: &PerspectiveCamera) -> Result<DrawOutcome, RenderError> {
            Err(RenderError::SurfaceLost)
        }
        fn set_size(&mut self, _: u32, _: u32) {}
        fn size(&self) -> (u32, u32) {
            (0, 0)
        }
    }

    /// Skips every other frame, like a surface that keeps going out of date.
    #[derive(Default)]
    struct FlakyTarget {
        calls: u32,
    }

    impl DrawTarget for FlakyTarget {
        fn draw(&mut self, _: &Scene, _: &PerspectiveCamera) -> Result<DrawOutcome, RenderError> {
            self.calls += 1;
            Ok(if self.calls % 2 == 0 {
                DrawOutcome::Skipped
            } else {
                DrawOutcome::Drawn
            })
        }
        fn set_size(&mut self, _: u32, _: u32) {}
        fn size(&self) -> (u32, u32) {
            (1, 1)
        }
    }

    #[test]
    fn single_iteration_moves_ghosts_and_draws() {
        let mut c = ctx();
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = DebugTextRenderer::new(1280, 720);

        clock.set(2.0);
        let info = render_loop.iterate(&mut c, &mut target).unwrap();

        assert!(info.drawn);
        assert_eq!(info.frame, 1);
        assert_eq!(info.elapsed, 2.0);
        assert_eq!(target.frames(), 1);

        let expected = ghost_positions(2.0);
        for (id, pos) in c.handles.ghosts.iter().zip(expected) {
            let p = c.scene.get(*id).unwrap().transform.position;
            assert_relative_eq!(p.x, pos.x);
            assert_relative_eq!(p.y, pos.y);
            assert_relative_eq!(p.z, pos.z);
        }
        assert_relative_eq!(expected[0].x, 1.0_f32.cos() * 4.0, epsilon = 1e-6);
        assert_relative_eq!(expected[0].y, 6.0_f32.sin(), epsilon = 1e-6);
    }

    #[test]
    fn only_ghosts_move_between_frames() {
        let mut c = ctx();
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = DebugTextRenderer::new(1, 1);
        let before = c.scene.clone();

        clock.set(5.0);
        render_loop.iterate(&mut c, &mut target).unwrap();

        for (id, node) in c.scene.nodes() {
            if c.handles.ghosts.contains(id) {
                continue;
            }
            assert_eq!(Some(node), before.get(*id));
        }
    }

    #[test]
    fn stopped_loop_does_nothing() {
        let mut c = ctx();
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = DebugTextRenderer::new(1, 1);

        clock.set(1.0);
        render_loop.iterate(&mut c, &mut target).unwrap();
        render_loop.stop();
        assert!(!render_loop.is_running());

        let snapshot = c.scene.clone();
        clock.set(9.0);
        let info = render_loop.iterate(&mut c, &mut target).unwrap();
        assert!(!info.drawn);
        assert_eq!(info.frame, 1);
        assert_eq!(render_loop.frame_count(), 1);
        assert_eq!(target.frames(), 1);
        assert_eq!(c.scene, snapshot);
    }

    #[test]
    fn frames_advance_one_per_iteration() {
        let mut c = ctx();
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = DebugTextRenderer::new(1, 1);
        for i in 1..=10 {
            clock.advance(1.0 / 60.0);
            let info = render_loop.iterate(&mut c, &mut target).unwrap();
            assert_eq!(info.frame, i);
        }
        assert_eq!(render_loop.timer().count(), 10);
        assert!((render_loop.timer().fps() - 60.0).abs() < 0.5);
    }

    #[test]
    fn draw_failure_stops_the_loop() {
        let mut c = ctx();
        let mut render_loop = RenderLoop::new(ManualClock::new());
        let err = render_loop.iterate(&mut c, &mut FailingTarget).unwrap_err();
        assert!(matches!(err, RenderError::SurfaceLost));
        assert!(!render_loop.is_running());
        assert_eq!(render_loop.frame_count(), 0);
    }

    #[test]
    fn skipped_frames_are_not_counted() {
        let mut c = ctx();
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = FlakyTarget::default();

        clock.set(1.0);
        let drawn = render_loop.iterate(&mut c, &mut target).unwrap();
        assert!(drawn.drawn);
        assert_eq!(drawn.frame, 1);

        clock.set(1.5);
        let skipped = render_loop.iterate(&mut c, &mut target).unwrap();
        assert!(!skipped.drawn);
        assert_eq!(skipped.frame, 1);
        assert_eq!(skipped.elapsed, 1.5);
        assert_eq!(render_loop.frame_count(), 1);
        assert_eq!(render_loop.timer().count(), 1);
        assert!(render_loop.is_running());

        let ghost = c.scene.get(c.handles.ghosts[0]).unwrap().transform.position;
        assert_eq!(ghost, ghost_positions(1.5)[0]);

        clock.set(2.0);
        let next = render_loop.iterate(&mut c, &mut target).unwrap();
        assert!(next.drawn);
        assert_eq!(next.frame, 2);
        assert_eq!(render_loop.timer().count(), 2);
        assert_relative_eq!(render_loop.timer().max().as_secs_f64(), 1.0);
    }

    #[test]
    fn damped_camera_keeps_moving_after_input() {
        let mut c = ctx();
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = DebugTextRenderer::new(1, 1);

        c.controls.rotate_left(0.5);
        let first = render_loop.iterate(&mut c, &mut target).unwrap();
        let second = render_loop.iterate(&mut c, &mut target).unwrap();
        assert!(first.camera_moved);
        assert!(second.camera_moved);
    }

    #[test]
    fn resize_updates_aspect_and_target_only() {
        let mut c = ctx();
        let mut target = DebugTextRenderer::new(1280, 720);
        let before = c.scene.clone();

        resize(&mut c, &mut target, 1000, 400);

        assert_eq!(c.camera.aspect, 2.5);
        assert_eq!(target.size(), (1000, 400));
        assert_eq!(
            c.viewport,
            Viewport {
                width: 1000,
                height: 400
            }
        );
        assert_eq!(c.scene, before);
    }

    #[test]
    fn minimized_window_keeps_projection_finite() {
        let mut c = ctx();
        let mut target = DebugTextRenderer::new(1280, 720);
        resize(&mut c, &mut target, 1280, 720);
        let aspect = c.camera.aspect;

        resize(&mut c, &mut target, 0, 720);
        assert_eq!(c.camera.aspect, aspect);
        resize(&mut c, &mut target, 1280, 0);
        assert_eq!(c.camera.aspect, aspect);
        assert!(c.camera.projection_matrix().is_finite());
        assert_eq!(c.viewport, Viewport { width: 1280, height: 0 });
    }

    #[test]
    fn panel_changes_show_up_in_next_frame() {
        let mut c = ctx();
        let mut panel = ParameterPanel::from_context(&c);
        let clock = ManualClock::new();
        let mut render_loop = RenderLoop::new(&clock);
        let mut target = DebugTextRenderer::new(1, 1);

        panel
            .change(&mut c, ParamId::FogNear, ParamValue::Scalar(2.0))
            .unwrap();
        panel
            .change(&mut c, ParamId::FogFar, ParamValue::Scalar(10.0))
            .unwrap();
        render_loop.iterate(&mut c, &mut target).unwrap();
        assert!(target.last_frame().contains("near=2.00 far=10.00"));
    }
}
