use egui::Context as EguiContext;
use haunted_common::Color;
use haunted_panel::{Control, ControlSpec, Folder, ParamValue, ParameterPanel};
use haunted_render::DrawTarget;
use haunted_render_wgpu::GpuSurface;
use haunted_runtime::FrameTimer;
use haunted_scene::SceneContext;
use winit::event::WindowEvent;
use winit::window::Window;

const FOLDERS: [Folder; 2] = [Folder::Lighting, Folder::Fog];

/// egui state and its wgpu painter, drawn on top of the scene.
pub struct Overlay {
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuSurface) -> Self {
        let ctx = EguiContext::default();
        let winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(gpu.device(), gpu.format(), None, 1, false);
        Self {
            ctx,
            winit,
            renderer,
        }
    }

    /// Feed a window event to egui. Returns true when egui used it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit.on_window_event(window, event).consumed
    }

    /// Run `build` and paint the result over `view`.
    pub fn paint(
        &mut self,
        window: &Window,
        gpu: &GpuSurface,
        view: &wgpu::TextureView,
        build: impl FnMut(&EguiContext),
    ) {
        let raw_input = self.winit.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, build);
        self.winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let (device, queue) = (gpu.device(), gpu.queue());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// The "Controls" window: one collapsing section per folder and a frame-rate
/// readout. Every edit goes through [`ParameterPanel::change`].
pub fn draw_panel(
    ctx: &EguiContext,
    panel: &mut ParameterPanel,
    scene: &mut SceneContext,
    timer: &FrameTimer,
) {
    egui::Window::new("Controls")
        .default_width(panel.width)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .show(ctx, |ui| {
            for (i, folder) in FOLDERS.into_iter().enumerate() {
                let controls: Vec<Control> = panel.folder(folder).copied().collect();
                let response = egui::CollapsingHeader::new(folder.title())
                    .default_open(panel.open_folders[i])
                    .show(ui, |ui| {
                        for control in controls {
                            let Some(value) = control_widget(ui, control) else {
                                continue;
                            };
                            if let Err(e) = panel.change(scene, control.id, value) {
                                tracing::warn!("panel change rejected: {e}");
                            }
                        }
                    });
                panel.open_folders[i] = response.openness > 0.5;
            }
            ui.separator();
            ui.label(frame_stats(timer));
        });
}

/// Frame rate with average and worst recent frame time.
fn frame_stats(timer: &FrameTimer) -> String {
    format!(
        "{:.0} fps ({:.2} ms avg, {:.2} ms max)",
        timer.fps(),
        timer.average().as_secs_f64() * 1000.0,
        timer.max().as_secs_f64() * 1000.0
    )
}

/// Draw one control. Returns the new value when the user changed it.
fn control_widget(ui: &mut egui::Ui, control: Control) -> Option<ParamValue> {
    match (control.spec(), control.value) {
        (ControlSpec::Range { min, max, step }, ParamValue::Scalar(mut v)) => {
            let slider = egui::Slider::new(&mut v, min..=max)
                .step_by(step as f64)
                .text(control.label());
            ui.add(slider).changed().then_some(ParamValue::Scalar(v))
        }
        (ControlSpec::Color, ParamValue::Color(color)) => {
            let mut rgb = color.to_rgb8();
            let changed = ui
                .horizontal(|ui| {
                    let changed = ui.color_edit_button_srgb(&mut rgb).changed();
                    ui.label(control.label());
                    changed
                })
                .inner;
            changed.then(|| ParamValue::Color(Color::from_rgb8(rgb)))
        }
        _ => None,
    }
}
