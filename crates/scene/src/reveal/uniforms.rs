use super::config::{COLOR_SLOTS, OPACITY_SLOTS, RevealParams};
use crate::viewport::SurfaceSize;

/// Time added to the `time` uniform on every frame, whatever the refresh rate.
pub const TIME_STEP: f32 = 0.016;

/// Values bound to the reveal program. Only `time` changes after mount.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealUniforms {
    pub time: f32,
    pub opacities: [f32; OPACITY_SLOTS],
    pub colors: [[f32; 3]; COLOR_SLOTS],
    pub total_size: f32,
    pub dot_size: f32,
    pub resolution: [f32; 2],
}

impl RevealUniforms {
    pub fn new(params: &RevealParams, size: SurfaceSize) -> Self {
        Self {
            time: 0.0,
            opacities: params.opacities,
            colors: params.colors,
            total_size: params.total_size,
            dot_size: params.dot_size,
            resolution: size.as_f32(),
        }
    }

    pub fn advance(&mut self) {
        self.time += TIME_STEP;
    }
}
