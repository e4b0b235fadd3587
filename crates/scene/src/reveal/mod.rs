//! Reveal effect: a full-viewport dot grid whose cells fade in and out.

pub mod config;
pub mod projection;
pub mod shading;
pub mod uniforms;

pub use config::*;
pub use projection::*;
pub use uniforms::*;

use crate::error::ConfigError;
use crate::viewport::SurfaceSize;

/// Everything the reveal effect needs besides the GPU handles.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealState {
    pub config: RevealConfig,
    pub camera: OrthoCamera,
    pub uniforms: RevealUniforms,
}

impl RevealState {
    pub fn new(config: RevealConfig, size: SurfaceSize) -> Result<Self, ConfigError> {
        let params = config.validate()?;
        Ok(Self {
            camera: OrthoCamera::covering(size),
            uniforms: RevealUniforms::new(&params, size),
            config,
        })
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.uniforms.resolution[0] as u32,
            height: self.uniforms.resolution[1] as u32,
        }
    }

    /// Advances the effect by one frame.
    pub fn advance(&mut self) {
        self.uniforms.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::{RevealConfig, RevealState, TIME_STEP};
    use crate::viewport::SurfaceSize;

    #[test]
    fn state_covers_the_container() {
        let size = SurfaceSize::from_measured(320.0, 200.0);
        let mut state = RevealState::new(RevealConfig::default(), size).unwrap();
        assert_eq!(state.size(), size);
        assert_eq!(state.camera.width(), 320.0);

        state.advance();
        assert_eq!(state.uniforms.time, TIME_STEP);
    }

    #[test]
    fn invalid_config_is_rejected_before_mount() {
        let config = RevealConfig {
            opacities: Vec::new(),
            ..RevealConfig::default()
        };
        assert!(RevealState::new(config, SurfaceSize::from_measured(1.0, 1.0)).is_err());
    }
}
