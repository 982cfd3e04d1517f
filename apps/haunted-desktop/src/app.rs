use crate::ui::{self, Overlay};
use anyhow::{Context, Result};
use glam::Vec2;
use haunted_input::{PointerButton, PointerTracker, apply_action};
use haunted_panel::ParameterPanel;
use haunted_render_wgpu::GpuSurface;
use haunted_runtime::{RenderLoop, SystemClock, resize};
use haunted_scene::SceneContext;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

/// Wheel pixels per zoom step on touchpads.
const PIXELS_PER_WHEEL_STEP: f32 = 100.0;

pub struct GpuApp {
    scene: SceneContext,
    panel: ParameterPanel,
    render_loop: RenderLoop<SystemClock>,
    pointer: PointerTracker,
    window: Option<Arc<Window>>,
    gpu: Option<GpuSurface>,
    overlay: Option<Overlay>,
    failure: Option<anyhow::Error>,
}

impl GpuApp {
    pub fn new(scene: SceneContext, panel: ParameterPanel) -> Self {
        Self {
            scene,
            panel,
            render_loop: RenderLoop::new(SystemClock::new()),
            pointer: PointerTracker::new(),
            window: None,
            gpu: None,
            overlay: None,
            failure: None,
        }
    }

    /// The error that ended the session, if any.
    pub fn into_failure(self) -> Option<anyhow::Error> {
        self.failure
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.render_loop.stop();
        self.failure = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Haunted House")
            .with_inner_size(PhysicalSize::new(
                self.scene.viewport.width,
                self.scene.viewport.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;

        let size = window.inner_size();
        let mut gpu = pollster::block_on(GpuSurface::new(
            &instance,
            surface,
            size.width,
            size.height,
            &self.scene.scene,
        ))
        .context("initializing GPU")?;
        resize(&mut self.scene, &mut gpu, size.width, size.height);

        self.overlay = Some(Overlay::new(&window, &gpu));
        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(overlay)) =
            (self.window.clone(), self.gpu.as_mut(), self.overlay.as_mut())
        else {
            return;
        };
        if !self.render_loop.is_running() {
            return;
        }

        let drawn = match self.render_loop.iterate(&mut self.scene, gpu) {
            Ok(info) => info.drawn,
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("drawing frame"));
                return;
            }
        };

        if let Some(frame) = gpu.take_frame().filter(|_| drawn) {
            let panel = &mut self.panel;
            let scene = &mut self.scene;
            let timer = self.render_loop.timer();
            overlay.paint(&window, gpu, &frame.view, |ctx| {
                ui::draw_panel(ctx, panel, scene, timer);
            });
            frame.present();
        }
        window.request_redraw();
    }

    fn pointer_button(&mut self, button: MouseButton, state: ElementState, consumed: bool) {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            _ => return,
        };
        match state {
            ElementState::Pressed if !consumed => self.pointer.press(button),
            ElementState::Pressed => {}
            // Releases always count so a drag that ends over the panel stops.
            ElementState::Released => self.pointer.release(button),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&mut self.overlay, &self.window) {
            (Some(overlay), Some(window)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                self.render_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    resize(&mut self.scene, gpu, new_size.width, new_size.height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer_button(button, state, consumed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let action = self
                    .pointer
                    .moved(Vec2::new(position.x as f32, position.y as f32));
                if let Some(action) = action.filter(|_| !consumed) {
                    apply_action(
                        &mut self.scene.controls,
                        &self.scene.camera,
                        action,
                        self.scene.viewport.height,
                    );
                }
            }
            WindowEvent::CursorLeft { .. } => self.pointer.left(),
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_WHEEL_STEP,
                };
                if let Some(action) = self.pointer.wheel(steps) {
                    apply_action(
                        &mut self.scene.controls,
                        &self.scene.camera,
                        action,
                        self.scene.viewport.height,
                    );
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
