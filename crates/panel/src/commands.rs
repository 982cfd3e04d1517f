//! One update function per control. Each writes exactly one scene field.

use haunted_common::Color;
use haunted_scene::SceneContext;

pub fn set_ambient_intensity(ctx: &mut SceneContext, value: f32) {
    if let Some(light) = ctx.scene.light_mut(ctx.handles.ambient) {
        light.intensity = value;
    }
}

pub fn set_moon_intensity(ctx: &mut SceneContext, value: f32) {
    if let Some(light) = ctx.scene.light_mut(ctx.handles.moon) {
        light.intensity = value;
    }
}

pub fn set_door_intensity(ctx: &mut SceneContext, value: f32) {
    if let Some(light) = ctx.scene.light_mut(ctx.handles.door_light) {
        light.intensity = value;
    }
}

pub fn set_fog_color(ctx: &mut SceneContext, value: Color) {
    ctx.scene.fog.color = value;
}

pub fn set_fog_near(ctx: &mut SceneContext, value: f32) {
    ctx.scene.fog.near = value;
}

pub fn set_fog_far(ctx: &mut SceneContext, value: f32) {
    ctx.scene.fog.far = value;
}
