pub mod cpu;
pub mod error;
pub mod mesh;
pub mod recording;
pub mod renderer;
pub mod session;
pub mod shaders;
pub mod surface;
pub mod uniforms;

pub use error::*;
pub use session::*;
pub use surface::*;
