use crate::commands;
use crate::param::{ControlSpec, Folder, PanelError, ParamId, ParamValue};
use haunted_scene::SceneContext;

/// Default panel width in logical pixels.
pub const PANEL_WIDTH: f32 = 310.0;

/// A control as displayed: its parameter and the value it currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub id: ParamId,
    pub value: ParamValue,
}

impl Control {
    pub fn label(&self) -> &'static str {
        self.id.label()
    }

    pub fn spec(&self) -> ControlSpec {
        self.id.spec()
    }
}

/// The debug panel's state.
///
/// Holds the displayed value of each control. Writes go through
/// [`ParameterPanel::change`], which dispatches to the parameter's command and
/// then re-reads the field so the display cannot drift from the scene.
#[derive(Debug, Clone)]
pub struct ParameterPanel {
    controls: Vec<Control>,
    pub width: f32,
    pub open_folders: [bool; 2],
}

impl ParameterPanel {
    /// Mirror the current scene values.
    pub fn from_context(ctx: &SceneContext) -> Self {
        let controls = ParamId::ALL
            .into_iter()
            .map(|id| Control {
                id,
                value: read(ctx, id),
            })
            .collect();
        Self {
            controls,
            width: PANEL_WIDTH,
            open_folders: [true, true],
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Controls belonging to one folder, in display order.
    pub fn folder(&self, folder: Folder) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(move |c| c.id.folder() == folder)
    }

    pub fn value(&self, id: ParamId) -> ParamValue {
        self.controls
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.value)
            .unwrap_or(ParamValue::Scalar(0.0))
    }

    /// Handle a control change. Scalars are clamped into the control's range.
    pub fn change(
        &mut self,
        ctx: &mut SceneContext,
        id: ParamId,
        value: ParamValue,
    ) -> Result<(), PanelError> {
        let value = match (id.spec(), value) {
            (spec @ ControlSpec::Range { .. }, ParamValue::Scalar(v)) => ParamValue::Scalar(spec.clamp(v)),
            (ControlSpec::Color, ParamValue::Color(c)) => ParamValue::Color(c),
            (ControlSpec::Range { .. }, ParamValue::Color(_)) => {
                return Err(PanelError::KindMismatch {
                    id,
                    expected: "scalar",
                });
            }
            (ControlSpec::Color, ParamValue::Scalar(_)) => {
                return Err(PanelError::KindMismatch {
                    id,
                    expected: "color",
                });
            }
        };
        apply(ctx, id, value)?;
        tracing::debug!(%id, %value, "parameter changed");
        self.refresh(ctx, id);
        Ok(())
    }

    fn refresh(&mut self, ctx: &SceneContext, id: ParamId) {
        if let Some(control) = self.controls.iter_mut().find(|c| c.id == id) {
            control.value = read(ctx, id);
        }
    }
}

/// Dispatch a value to the parameter's command.
pub fn apply(ctx: &mut SceneContext, id: ParamId, value: ParamValue) -> Result<(), PanelError> {
    match (id, value) {
        (ParamId::AmbientIntensity, ParamValue::Scalar(v)) => commands::set_ambient_intensity(ctx, v),
        (ParamId::MoonIntensity, ParamValue::Scalar(v)) => commands::set_moon_intensity(ctx, v),
        (ParamId::DoorIntensity, ParamValue::Scalar(v)) => commands::set_door_intensity(ctx, v),
        (ParamId::FogColor, ParamValue::Color(c)) => commands::set_fog_color(ctx, c),
        (ParamId::FogNear, ParamValue::Scalar(v)) => commands::set_fog_near(ctx, v),
        (ParamId::FogFar, ParamValue::Scalar(v)) => commands::set_fog_far(ctx, v),
        (id, _) => {
            let expected = match id.spec() {
                ControlSpec::Color => "color",
                ControlSpec::Range { .. } => "scalar",
            };
            return Err(PanelError::KindMismatch { id, expected });
        }
    }
    Ok(())
}

/// Read the live field a parameter controls.
pub fn read(ctx: &SceneContext, id: ParamId) -> ParamValue {
    let intensity = |node| {
        ParamValue::Scalar(ctx.scene.light(node).map(|l| l.intensity).unwrap_or_default())
    };
    match id {
        ParamId::AmbientIntensity => intensity(ctx.handles.ambient),
        ParamId::MoonIntensity => intensity(ctx.handles.moon),
        ParamId::DoorIntensity => intensity(ctx.handles.door_light),
        ParamId::FogColor => ParamValue::Color(ctx.scene.fog.color),
        ParamId::FogNear => ParamValue::Scalar(ctx.scene.fog.near),
        ParamId::FogFar => ParamValue::Scalar(ctx.scene.fog.far),
    }
}
