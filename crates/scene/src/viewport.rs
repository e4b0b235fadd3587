use tracing::warn;

/// Drawing-surface size in physical pixels. Never zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Builds a size from measured CSS/client dimensions.
    ///
    /// Zero, negative or non-finite measurements would give a degenerate
    /// projection, so each axis is clamped to at least one pixel.
    pub fn from_measured(width: f64, height: f64) -> Self {
        let clamp = |v: f64| {
            if v.is_finite() && v >= 1.0 {
                v.round().min(u32::MAX as f64) as u32
            } else {
                1
            }
        };
        let size = Self {
            width: clamp(width),
            height: clamp(height),
        };
        if size.width as f64 != width.round() || size.height as f64 != height.round() {
            warn!(width, height, "surface measured degenerate, clamped to {size:?}");
        }
        size
    }

    pub fn aspect(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn as_f32(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::SurfaceSize;

    #[test]
    fn keeps_regular_sizes() {
        let s = SurfaceSize::from_measured(640.0, 480.0);
        assert_eq!(s, SurfaceSize { width: 640, height: 480 });
        assert!((s.aspect() - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn clamps_zero_and_garbage_to_one_pixel() {
        assert_eq!(
            SurfaceSize::from_measured(0.0, 0.0),
            SurfaceSize { width: 1, height: 1 }
        );
        assert_eq!(
            SurfaceSize::from_measured(f64::NAN, -20.0),
            SurfaceSize { width: 1, height: 1 }
        );
        assert_eq!(
            SurfaceSize::from_measured(300.0, 0.2),
            SurfaceSize { width: 300, height: 1 }
        );
    }
}
