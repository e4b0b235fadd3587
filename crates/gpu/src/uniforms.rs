//! `#[repr(C)]` layouts of the uniform blocks declared in [`crate::shaders`].

use foundation::color::Rgb;
use foundation::math::Vec3;
use scene::globe::{GlobeState, Mat4};
use scene::reveal::{COLOR_SLOTS, OPACITY_SLOTS, RevealUniforms};

/// Uniform buffers index arrays with a 16-byte stride, so opacities are packed
/// four to a `vec4` and colors carry an unused `w`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RevealGpuUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub total_size: f32,
    pub dot_size: f32,
    pub _pad: [f32; 3],
    pub opacities: [[f32; 4]; 3],
    pub colors: [[f32; 4]; COLOR_SLOTS],
}

impl From<&RevealUniforms> for RevealGpuUniforms {
    fn from(u: &RevealUniforms) -> Self {
        let mut opacities = [[0.0f32; 4]; 3];
        for (i, value) in u.opacities.iter().enumerate().take(OPACITY_SLOTS) {
            opacities[i / 4][i % 4] = *value;
        }
        let colors = u.colors.map(|[r, g, b]| [r, g, b, 1.0]);
        Self {
            resolution: u.resolution,
            time: u.time,
            total_size: u.total_size,
            dot_size: u.dot_size,
            _pad: [0.0; 3],
            opacities,
            colors,
        }
    }
}

fn rgb_w(color: Rgb, w: f64) -> [f32; 4] {
    let [r, g, b] = color.normalized();
    [r, g, b, w as f32]
}

fn xyz_w(v: Vec3, w: f32) -> [f32; 4] {
    let [x, y, z] = v.to_f32_array();
    [x, y, z, w]
}

/// Per-frame globals shared by the globe, atmosphere and marker programs.
///
/// Colors carry an intensity (or material scalar) in `w`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeGlobals {
    pub view_proj: Mat4,
    pub camera_pos: [f32; 4],
    /// `w`: shininess.
    pub base_color: [f32; 4],
    /// `w`: emissive intensity.
    pub emissive: [f32; 4],
    pub ambient: [f32; 4],
    pub left_color: [f32; 4],
    pub left_dir: [f32; 4],
    pub top_color: [f32; 4],
    pub top_dir: [f32; 4],
    pub point_color: [f32; 4],
    pub point_pos: [f32; 4],
    /// `w`: shell radius, zero when the atmosphere is hidden.
    pub atmosphere: [f32; 4],
}

impl From<&GlobeState> for GlobeGlobals {
    fn from(state: &GlobeState) -> Self {
        let lights = &state.lights;
        let material = &state.material;
        let atmosphere = state.atmosphere.map_or([0.0; 4], |a| {
            rgb_w(a.color, foundation::math::GLOBE_RADIUS * (1.0 + a.altitude))
        });
        Self {
            view_proj: state.view_proj(),
            camera_pos: xyz_w(state.camera.position, 1.0),
            base_color: rgb_w(material.base, material.shininess),
            emissive: rgb_w(material.emissive, material.emissive_intensity),
            ambient: rgb_w(lights.ambient.color, lights.ambient.intensity),
            left_color: rgb_w(lights.directional_left.color, lights.directional_left.intensity),
            left_dir: xyz_w(lights.directional_left.direction(), 0.0),
            top_color: rgb_w(lights.directional_top.color, lights.directional_top.intensity),
            top_dir: xyz_w(lights.directional_top.direction(), 0.0),
            point_color: rgb_w(lights.point.color, lights.point.intensity),
            point_pos: xyz_w(lights.point.position, 1.0),
            atmosphere,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobeGlobals, RevealGpuUniforms};
    use pretty_assertions::assert_eq;
    use scene::SurfaceSize;
    use scene::globe::{GlobeConfig, GlobeState};
    use scene::reveal::{RevealConfig, RevealUniforms};

    #[test]
    fn layouts_match_the_wgsl_blocks() {
        assert_eq!(std::mem::size_of::<RevealGpuUniforms>(), 176);
        assert_eq!(std::mem::size_of::<GlobeGlobals>(), 240);
    }

    #[test]
    fn reveal_opacities_pack_four_per_vec4() {
        let cfg = RevealConfig {
            opacities: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0],
            ..RevealConfig::default()
        };
        let params = cfg.validate().unwrap();
        let mut u = RevealUniforms::new(&params, SurfaceSize::from_measured(64.0, 32.0));
        u.advance();
        let packed = RevealGpuUniforms::from(&u);

        assert_eq!(packed.opacities[0], [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(packed.opacities[2], [0.9, 1.0, 0.0, 0.0]);
        assert_eq!(packed.colors[5], [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(packed.resolution, [64.0, 32.0]);
        assert_eq!(packed.time, 0.016);
        assert_eq!(packed.total_size, 4.0);
        assert_eq!(packed.dot_size, 2.0);
    }

    #[test]
    fn globe_globals_follow_the_scene() {
        let state = GlobeState::new(
            GlobeConfig::default(),
            Vec::new(),
            SurfaceSize::from_measured(100.0, 100.0),
        )
        .unwrap();
        let g = GlobeGlobals::from(&state);
        assert_eq!(g.camera_pos, [0.0, 0.0, 300.0, 1.0]);
        assert!((g.base_color[3] - 0.9).abs() < 1e-6);
        assert!((g.ambient[3] - 0.6).abs() < 1e-6);
        assert!((g.atmosphere[3] - 110.0).abs() < 1e-4);

        let hidden = GlobeState::new(
            GlobeConfig {
                show_atmosphere: false,
                ..GlobeConfig::default()
            },
            Vec::new(),
            SurfaceSize::from_measured(100.0, 100.0),
        )
        .unwrap();
        assert_eq!(GlobeGlobals::from(&hidden).atmosphere, [0.0; 4]);
    }
}
