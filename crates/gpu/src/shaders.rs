//! WGSL programs. Uniform layouts must match [`crate::uniforms`].

/// Dot-grid reveal. The fragment stage is mirrored on the CPU by
/// `scene::reveal::shading`; keep the two in step.
pub const REVEAL_SHADER: &str = r#"
struct RevealUniforms {
    resolution: vec2<f32>,
    time: f32,
    total_size: f32,
    dot_size: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
    opacities: array<vec4<f32>, 3>,
    colors: array<vec4<f32>, 6>,
};

@group(0) @binding(0)
var<uniform> u: RevealUniforms;

const PHI: f32 = 1.61803398874989484820459;
const FREQUENCY: f32 = 5.0;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) frag: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VsOut {
    var frag = (position + vec2<f32>(1.0)) * 0.5 * u.resolution;
    frag.y = u.resolution.y - frag.y;
    return VsOut(vec4<f32>(position, 0.0, 1.0), frag);
}

fn random(xy: vec2<f32>) -> f32 {
    return fract(tan(distance(xy * PHI, xy) * 0.5) * xy.x);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let st = fs_in.frag;
    var opacity = step(0.0, st.x) * step(0.0, st.y);

    let cell = trunc(st / u.total_size);
    let show_offset = random(cell);
    let rand = random(cell * floor(u.time / FREQUENCY + show_offset + FREQUENCY) + 1.0);

    let oi = u32(clamp(floor(rand * 10.0), 0.0, 9.0));
    opacity *= u.opacities[oi / 4u][oi % 4u];

    let edge = u.dot_size / u.total_size;
    opacity *= 1.0 - step(edge, fract(st.x / u.total_size));
    opacity *= 1.0 - step(edge, fract(st.y / u.total_size));

    let ci = u32(clamp(floor(show_offset * 6.0), 0.0, 5.0));
    let color = u.colors[ci].xyz;
    return vec4<f32>(color * opacity, opacity);
}
"#;

const GLOBALS: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    base_color: vec4<f32>,
    emissive: vec4<f32>,
    ambient: vec4<f32>,
    left_color: vec4<f32>,
    left_dir: vec4<f32>,
    top_color: vec4<f32>,
    top_dir: vec4<f32>,
    point_color: vec4<f32>,
    point_pos: vec4<f32>,
    atmosphere: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

const GLOBE_BODY: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) world: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position, 1.0), position, normal);
}

// Blinn-Phong with a dim fixed specular color.
fn light(n: vec3<f32>, v: vec3<f32>, l: vec3<f32>, color: vec4<f32>) -> vec3<f32> {
    let diffuse = max(dot(n, l), 0.0);
    let h = normalize(l + v);
    let specular = pow(max(dot(n, h), 0.0), max(globals.base_color.w, 1e-3)) * 0.0667;
    return color.rgb * color.w * (diffuse * globals.base_color.rgb + vec3<f32>(specular));
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let v = normalize(globals.camera_pos.xyz - fs_in.world);

    var rgb = globals.ambient.rgb * globals.ambient.w * globals.base_color.rgb;
    rgb += light(n, v, normalize(globals.left_dir.xyz), globals.left_color);
    rgb += light(n, v, normalize(globals.top_dir.xyz), globals.top_color);
    rgb += light(n, v, normalize(globals.point_pos.xyz - fs_in.world), globals.point_color);
    rgb += globals.emissive.rgb * globals.emissive.w;
    return vec4<f32>(min(rgb, vec3<f32>(1.0)), 1.0);
}
"#;

const ATMOSPHERE_BODY: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) world: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    let world = normal * globals.atmosphere.w;
    return VsOut(globals.view_proj * vec4<f32>(world, 1.0), world, normal);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let v = normalize(globals.camera_pos.xyz - fs_in.world);
    let rim = 1.0 - abs(dot(normalize(fs_in.normal), v));
    let a = pow(rim, 3.0) * 0.8;
    return vec4<f32>(globals.atmosphere.rgb, a);
}
"#;

const MARKER_BODY: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position, 1.0), color);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    return fs_in.color;
}
"#;

pub fn globe_shader() -> String {
    format!("{GLOBALS}{GLOBE_BODY}")
}

/// Back-face shell drawn over the globe when `atmosphere.w > 0`.
pub fn atmosphere_shader() -> String {
    format!("{GLOBALS}{ATMOSPHERE_BODY}")
}

pub fn marker_shader() -> String {
    format!("{GLOBALS}{MARKER_BODY}")
}
