use runtime::{Frame, RenderSession};
use scene::SurfaceSize;
use scene::error::GlobeError;
use scene::globe::{Arc, GlobeState};
use scene::reveal::RevealState;
use tracing::debug;

use crate::error::GpuError;
use crate::mesh::marker_mesh;
use crate::renderer::Renderer;
use crate::surface::{GlobeSurface, RevealSurface};

/// Live reveal effect: the scene state plus the surface it draws into.
pub struct RevealSession<S: RevealSurface> {
    state: RevealState,
    surface: Option<S>,
}

impl<S: RevealSurface> RevealSession<S> {
    pub fn new(state: RevealState, surface: S) -> Self {
        Self {
            state,
            surface: Some(surface),
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// `None` once disposed.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }
}

impl<S: RevealSurface> RenderSession for RevealSession<S> {
    type Error = GpuError;

    // Time moves by a fixed step per frame regardless of the frame's dt.
    fn render_frame(&mut self, _frame: Frame) -> Result<(), GpuError> {
        let surface = self.surface.as_mut().ok_or(GpuError::Released)?;
        self.state.advance();
        surface.draw(&self.state.uniforms)
    }

    fn dispose(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            debug!(time = self.state.uniforms.time, "reveal surface released");
        }
    }
}

/// Live globe: scene state, controls and the surface.
pub struct GlobeSession<S: GlobeSurface> {
    state: GlobeState,
    surface: Option<S>,
}

impl<S: GlobeSurface> GlobeSession<S> {
    pub fn new(state: GlobeState, mut surface: S) -> Self {
        surface.set_markers(&marker_mesh(&state.points));
        Self {
            state,
            surface: Some(surface),
        }
    }

    pub fn state(&self) -> &GlobeState {
        &self.state
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Rebuilds every point from `arcs` and re-uploads the markers.
    pub fn set_arcs(&mut self, arcs: Vec<Arc>) -> Result<(), GlobeError> {
        self.state.set_arcs(arcs)?;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_markers(&marker_mesh(&self.state.points));
        }
        debug!(points = self.state.points.len(), "globe markers rebuilt");
        Ok(())
    }

    pub fn resize(&mut self, window: SurfaceSize, container: SurfaceSize) {
        let size = self.state.resize(window, container);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(size);
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.state.controls.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, client_height: f64) {
        self.state.controls.pointer_move(x, y, client_height);
    }

    pub fn pointer_up(&mut self) {
        self.state.controls.pointer_up();
    }
}

impl<S: GlobeSurface> RenderSession for GlobeSession<S> {
    type Error = GpuError;

    fn render_frame(&mut self, _frame: Frame) -> Result<(), GpuError> {
        let surface = self.surface.as_mut().ok_or(GpuError::Released)?;
        self.state.advance();
        surface.draw(&Renderer::collect_globe(&self.state))
    }

    fn dispose(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            debug!("globe surface released");
        }
    }
}
