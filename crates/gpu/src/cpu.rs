//! Software rasterizer for the reveal program, used for headless frames.

use scene::SurfaceSize;
use scene::reveal::shading::{pixel_frag_coord, shade};
use scene::reveal::{GRADIENT_COLOR, RevealUniforms, gradient_alpha};

use crate::error::GpuError;
use crate::surface::RevealSurface;

/// Premultiplied "over": `src + dst * (1 - src.a)`.
fn blend_over(src: [f32; 4], dst: [f32; 3]) -> [f32; 3] {
    let a = src[3];
    [
        src[0] + dst[0] * (1.0 - a),
        src[1] + dst[1] * (1.0 - a),
        src[2] + dst[2] * (1.0 - a),
    ]
}

/// Draws into an RGB buffer cleared to `background` before every frame.
#[derive(Debug, Clone)]
pub struct CpuRevealSurface {
    size: SurfaceSize,
    background: [f32; 3],
    gradient: bool,
    pixels: Vec<[f32; 3]>,
    released: bool,
}

impl CpuRevealSurface {
    /// White background, matching the wrapper element.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            background: [1.0, 1.0, 1.0],
            gradient: false,
            pixels: vec![[1.0; 3]; size.width as usize * size.height as usize],
            released: false,
        }
    }

    pub fn with_background(mut self, background: [f32; 3]) -> Self {
        self.background = background;
        self
    }

    /// Composites the dark bottom overlay after the grid.
    pub fn with_gradient(mut self, gradient: bool) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Row-major, top row first.
    pub fn pixels(&self) -> &[[f32; 3]] {
        &self.pixels
    }

    pub fn pixel(&self, col: u32, row: u32) -> [f32; 3] {
        self.pixels[(row * self.size.width + col) as usize]
    }

    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }
}

impl RevealSurface for CpuRevealSurface {
    fn draw(&mut self, uniforms: &RevealUniforms) -> Result<(), GpuError> {
        if self.released {
            return Err(GpuError::Released);
        }
        let overlay = GRADIENT_COLOR.normalized();
        let width = self.size.width;
        let height = self.size.height;

        for row in 0..height {
            let from_bottom = (f64::from(height - row) - 0.5) / f64::from(height);
            let shade_alpha = gradient_alpha(from_bottom) as f32;
            for col in 0..width {
                let src = shade(uniforms, pixel_frag_coord(col, row));
                let mut rgb = blend_over(src, self.background);
                if self.gradient {
                    let tint = overlay.map(|c| c * shade_alpha);
                    rgb = blend_over([tint[0], tint[1], tint[2], shade_alpha], rgb);
                }
                self.pixels[(row * width + col) as usize] = rgb;
            }
        }
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
        self.pixels = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::CpuRevealSurface;
    use crate::surface::RevealSurface;
    use scene::SurfaceSize;
    use scene::reveal::{RevealConfig, RevealUniforms};

    fn uniforms(size: SurfaceSize) -> RevealUniforms {
        uniforms_with_opacity(size, 1.0)
    }

    fn uniforms_with_opacity(size: SurfaceSize, opacity: f32) -> RevealUniforms {
        let cfg = RevealConfig {
            opacities: vec![opacity],
            colors: vec![[255.0, 0.0, 0.0]],
            ..RevealConfig::default()
        };
        RevealUniforms::new(&cfg.validate().unwrap(), size)
    }

    #[test]
    fn dots_are_drawn_over_the_background() {
        let size = SurfaceSize::from_measured(8.0, 8.0);
        let mut surface = CpuRevealSurface::new(size);
        surface.draw(&uniforms(size)).unwrap();

        assert_eq!(surface.pixel(0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(surface.pixel(1, 1), [1.0, 0.0, 0.0]);
        assert_eq!(surface.pixel(2, 0), [1.0, 1.0, 1.0]);
        assert_eq!(surface.pixel(4, 4), [1.0, 0.0, 0.0]);
        assert_eq!(surface.to_rgb8().len(), 8 * 8 * 3);
    }

    #[test]
    fn translucent_dots_blend_once_with_the_background() {
        let size = SurfaceSize::from_measured(4.0, 4.0);
        let mut surface = CpuRevealSurface::new(size);
        surface.draw(&uniforms_with_opacity(size, 0.5)).unwrap();

        assert_eq!(surface.pixel(0, 0), [1.0, 0.5, 0.5]);
        assert_eq!(surface.pixel(2, 0), [1.0, 1.0, 1.0]);

        let mut dark = CpuRevealSurface::new(size).with_background([0.0, 0.0, 0.0]);
        dark.draw(&uniforms_with_opacity(size, 0.5)).unwrap();
        assert_eq!(dark.pixel(0, 0), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn gradient_darkens_the_bottom_rows_only() {
        let size = SurfaceSize::from_measured(4.0, 100.0);
        let mut plain = CpuRevealSurface::new(size);
        let mut shaded = CpuRevealSurface::new(size).with_gradient(true);
        plain.draw(&uniforms(size)).unwrap();
        shaded.draw(&uniforms(size)).unwrap();

        assert_eq!(plain.pixel(3, 2), shaded.pixel(3, 2));
        let bottom = shaded.pixel(3, 99);
        assert!(bottom.iter().all(|&c| c < 0.1), "{bottom:?}");
    }

    #[test]
    fn released_surface_rejects_draws() {
        let size = SurfaceSize::from_measured(2.0, 2.0);
        let mut surface = CpuRevealSurface::new(size);
        surface.release();
        assert!(surface.draw(&uniforms(size)).is_err());
        assert!(surface.pixels().is_empty());
    }
}
