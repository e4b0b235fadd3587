pub mod frame;
pub mod scheduler;
pub mod session;

pub use frame::*;
pub use scheduler::*;
pub use session::*;
