use foundation::time::Time;

/// Nominal display refresh step (seconds).
pub const NOMINAL_DT_S: f64 = 1.0 / 60.0;

/// Deterministic frame metadata handed to every frame callback.
///
/// Frames are numbered per loop, not per page: a loop that starts late still
/// sees index 0 on its first callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index within the loop.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Loop time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first(dt_s: f64) -> Self {
        Self::new(0, dt_s)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}
