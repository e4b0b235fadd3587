#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("surface error: {0}")]
    Surface(String),
    #[error("adapter error: {0}")]
    Adapter(String),
    #[error("device error: {0}")]
    Device(String),
    #[error("surface acquire failed: {0}")]
    Acquire(String),
    #[error("surface already released")]
    Released,
}
