use scene::SurfaceSize;
use scene::reveal::RevealUniforms;

use crate::error::GpuError;
use crate::mesh::MarkerVertex;
use crate::renderer::GlobeFrame;

/// A drawing surface holding the reveal program, quad and context.
///
/// `release` drops every GPU handle; later draws fail with
/// [`GpuError::Released`]. Releasing twice is a no-op.
pub trait RevealSurface {
    fn draw(&mut self, uniforms: &RevealUniforms) -> Result<(), GpuError>;
    fn release(&mut self);
}

/// A drawing surface holding the globe, atmosphere and marker programs.
pub trait GlobeSurface {
    fn set_markers(&mut self, markers: &[MarkerVertex]);
    fn resize(&mut self, size: SurfaceSize);
    fn draw(&mut self, frame: &GlobeFrame) -> Result<(), GpuError>;
    fn release(&mut self);
}
