use crate::viewport::SurfaceSize;

/// Orthographic camera whose frustum exactly covers the container, centred on
/// the origin and looking down -Z from z = 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoCamera {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub near: f64,
    pub far: f64,
    pub z: f64,
}

impl OrthoCamera {
    pub fn covering(size: SurfaceSize) -> Self {
        let w = f64::from(size.width);
        let h = f64::from(size.height);
        Self {
            left: w / -2.0,
            right: w / 2.0,
            top: h / 2.0,
            bottom: h / -2.0,
            near: -1000.0,
            far: 1000.0,
            z: 1.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Column-major projection matrix mapping the frustum to clip space with a
    /// `[0, 1]` depth range.
    ///
    /// Not uploaded: the reveal quad is already in clip space, and this
    /// matrix maps the container rectangle onto exactly that square.
    pub fn projection(&self) -> [[f32; 4]; 4] {
        let sx = 2.0 / self.width();
        let sy = 2.0 / self.height();
        let sz = 1.0 / (self.far - self.near);
        let tx = -(self.right + self.left) / self.width();
        let ty = -(self.top + self.bottom) / self.height();
        let tz = -self.near * sz;
        [
            [sx as f32, 0.0, 0.0, 0.0],
            [0.0, sy as f32, 0.0, 0.0],
            [0.0, 0.0, -sz as f32, 0.0],
            [tx as f32, ty as f32, tz as f32, 1.0],
        ]
    }
}
