pub mod error;
pub mod globe;
pub mod reveal;
pub mod viewport;

pub use error::*;
pub use viewport::*;
