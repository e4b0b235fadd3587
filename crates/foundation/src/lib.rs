pub mod color;
pub mod math;
pub mod random;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use color::*;
pub use random::*;
pub use time::*;
