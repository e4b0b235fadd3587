use scene::SurfaceSize;
use scene::globe::GlobeState;

use crate::uniforms::GlobeGlobals;

/// Everything a globe surface needs to draw one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeFrame {
    pub globals: GlobeGlobals,
    pub size: SurfaceSize,
    pub draw_atmosphere: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn collect_globe(state: &GlobeState) -> GlobeFrame {
        GlobeFrame {
            globals: GlobeGlobals::from(state),
            size: state.size,
            draw_atmosphere: state.atmosphere.is_some(),
        }
    }
}
