//! Surfaces that record what they were asked to do, for lifecycle checks.

use std::cell::RefCell;
use std::rc::Rc;

use scene::SurfaceSize;
use scene::reveal::RevealUniforms;

use crate::error::GpuError;
use crate::mesh::MarkerVertex;
use crate::renderer::GlobeFrame;
use crate::surface::{GlobeSurface, RevealSurface};

/// Shared tally across every surface acquired against it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SurfaceLog {
    pub acquired: u32,
    pub released: u32,
    pub draws: u32,
    /// `time` uniform of each reveal draw.
    pub times: Vec<f32>,
    /// Vertex count of each marker upload.
    pub marker_vertices: Vec<usize>,
    pub sizes: Vec<SurfaceSize>,
}

impl SurfaceLog {
    pub fn all_released(&self) -> bool {
        self.acquired == self.released
    }
}

#[derive(Debug)]
struct Handle {
    log: Rc<RefCell<SurfaceLog>>,
    live: bool,
}

impl Handle {
    fn acquire(log: &Rc<RefCell<SurfaceLog>>) -> Self {
        log.borrow_mut().acquired += 1;
        Self {
            log: log.clone(),
            live: true,
        }
    }

    fn check(&self) -> Result<(), GpuError> {
        if self.live { Ok(()) } else { Err(GpuError::Released) }
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.live, false) {
            self.log.borrow_mut().released += 1;
        }
    }
}

#[derive(Debug)]
pub struct RecordingRevealSurface(Handle);

impl RecordingRevealSurface {
    pub fn acquire(log: &Rc<RefCell<SurfaceLog>>) -> Self {
        Self(Handle::acquire(log))
    }
}

impl RevealSurface for RecordingRevealSurface {
    fn draw(&mut self, uniforms: &RevealUniforms) -> Result<(), GpuError> {
        self.0.check()?;
        let mut log = self.0.log.borrow_mut();
        log.draws += 1;
        log.times.push(uniforms.time);
        Ok(())
    }

    fn release(&mut self) {
        self.0.release();
    }
}

#[derive(Debug)]
pub struct RecordingGlobeSurface(Handle);

impl RecordingGlobeSurface {
    pub fn acquire(log: &Rc<RefCell<SurfaceLog>>) -> Self {
        Self(Handle::acquire(log))
    }
}

impl GlobeSurface for RecordingGlobeSurface {
    fn set_markers(&mut self, markers: &[MarkerVertex]) {
        self.0.log.borrow_mut().marker_vertices.push(markers.len());
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.0.log.borrow_mut().sizes.push(size);
    }

    fn draw(&mut self, _frame: &GlobeFrame) -> Result<(), GpuError> {
        self.0.check()?;
        self.0.log.borrow_mut().draws += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.0.release();
    }
}
