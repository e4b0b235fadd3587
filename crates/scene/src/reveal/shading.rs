//! CPU evaluation of the reveal fragment program.
//!
//! Mirrors `gpu::shaders::REVEAL_SHADER` operation for operation in `f32`, so
//! tests and headless rendering see the same cells the GPU draws.

use super::uniforms::RevealUniforms;
use super::config::{COLOR_SLOTS, OPACITY_SLOTS};

pub const PHI: f32 = 1.618_034;
/// Seconds per reseed step of a cell's opacity.
pub const FREQUENCY: f32 = 5.0;

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// Golden-ratio hash of a cell coordinate, in `[0, 1]`.
pub fn random(xy: [f32; 2]) -> f32 {
    let dx = xy[0] * PHI - xy[0];
    let dy = xy[1] * PHI - xy[1];
    let distance = (dx * dx + dy * dy).sqrt();
    fract((distance * 0.5).tan() * xy[0])
}

fn slot(value: f32, slots: usize) -> usize {
    let index = (value * slots as f32) as i64;
    index.clamp(0, slots as i64 - 1) as usize
}

/// Fragment coordinate of the centre of pixel (`col`, `row`), rows counted
/// from the top edge.
pub fn pixel_frag_coord(col: u32, row: u32) -> [f32; 2] {
    [col as f32 + 0.5, row as f32 + 0.5]
}

/// Opacity and palette color of one fragment, before premultiplication.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fragment {
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Fragment {
    pub fn premultiplied(self) -> [f32; 4] {
        let [r, g, b] = self.color;
        [r * self.opacity, g * self.opacity, b * self.opacity, self.opacity]
    }
}

pub fn shade_fragment(u: &RevealUniforms, frag: [f32; 2]) -> Fragment {
    let [x, y] = frag;
    let mut opacity = step(0.0, x) * step(0.0, y);

    let cell = [(x / u.total_size).trunc(), (y / u.total_size).trunc()];
    let show_offset = random(cell);

    let epoch = (u.time / FREQUENCY + show_offset + FREQUENCY).floor();
    let rand = random([cell[0] * epoch + 1.0, cell[1] * epoch + 1.0]);

    opacity *= u.opacities[slot(rand, OPACITY_SLOTS)];

    let edge = u.dot_size / u.total_size;
    opacity *= 1.0 - step(edge, fract(x / u.total_size));
    opacity *= 1.0 - step(edge, fract(y / u.total_size));

    Fragment {
        color: u.colors[slot(show_offset, COLOR_SLOTS)],
        opacity,
    }
}

/// Premultiplied RGBA of one fragment.
pub fn shade(u: &RevealUniforms, frag: [f32; 2]) -> [f32; 4] {
    shade_fragment(u, frag).premultiplied()
}
