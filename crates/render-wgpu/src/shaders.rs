/// WGSL shader for lit, fogged, instanced meshes.
///
/// Layout of `Globals` must match [`crate::Globals`].
pub const SCENE_SHADER: &str = r#"
const MAX_POINT_LIGHTS: u32 = 8u;

struct PointLight {
    // xyz position, w cutoff distance (0 = infinite)
    position_range: vec4<f32>,
    // rgb color * intensity, w decay exponent
    color_decay: vec4<f32>,
};

struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    fog_color: vec4<f32>,
    // x near, y far
    fog_range: vec4<f32>,
    ambient: vec4<f32>,
    // xyz unit vector toward the light
    moon_dir: vec4<f32>,
    moon_color: vec4<f32>,
    // x point light count
    counts: vec4<u32>,
    points: array<PointLight, MAX_POINT_LIGHTS>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    return out;
}

fn fog_factor(distance: f32) -> f32 {
    let near = globals.fog_range.x;
    let far = globals.fog_range.y;
    if (far == near) {
        return select(0.0, 1.0, distance >= far);
    }
    return clamp((distance - near) / (far - near), 0.0, 1.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    var light = globals.ambient.rgb;
    light += globals.moon_color.rgb * max(dot(n, globals.moon_dir.xyz), 0.0);

    let count = min(globals.counts.x, MAX_POINT_LIGHTS);
    for (var i = 0u; i < count; i++) {
        let p = globals.points[i];
        let to_light = p.position_range.xyz - in.world_pos;
        let d = length(to_light);
        let l = to_light / max(d, 1e-4);
        var atten = 1.0 / max(pow(d, p.color_decay.w), 0.01);
        let range = p.position_range.w;
        if (range > 0.0) {
            let falloff = clamp(1.0 - pow(d / range, 4.0), 0.0, 1.0);
            atten *= falloff * falloff;
        }
        light += p.color_decay.rgb * max(dot(n, l), 0.0) * atten;
    }

    let lit = in.color.rgb * light;
    let fog = fog_factor(distance(in.world_pos, globals.camera_pos.xyz));
    return vec4<f32>(mix(lit, globals.fog_color.rgb, fog), 1.0);
}
"#;
