//! Pixel-quantized texture sampling.
//!
//! Texture coordinates are snapped to an `R x R` grid of virtual pixels before
//! a nearest-neighbor fetch, so every fragment shows exactly one of `R * R`
//! source colors whatever the rotation or deformation of the mesh. Only the
//! lookup is quantized; vertex positions are never snapped.

use super::texture::Texture;

pub const DEFAULT_RESOLUTION: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSampler {
    resolution: u32,
}

impl Default for PixelSampler {
    fn default() -> Self { Self::new(DEFAULT_RESOLUTION) }
}

impl PixelSampler {
    pub fn new(resolution: u32) -> Self { Self { resolution: resolution.max(1) } }

    pub fn resolution(&self) -> u32 { self.resolution }

    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution.max(1);
    }

    /// Virtual pixel cell containing `(u, v)`. A coordinate of exactly 1.0
    /// lands in cell `R`, one past the grid; the fetch clamps it to the edge.
    pub fn cell(&self, u: f32, v: f32) -> (u32, u32) {
        let r = self.resolution as f32;
        ((u * r).floor().max(0.0) as u32, (v * r).floor().max(0.0) as u32)
    }

    /// `(floor(u R) / R, floor(v R) / R)`.
    pub fn quantize(&self, u: f32, v: f32) -> (f32, f32) {
        let (cx, cy) = self.cell(u, v);
        let r = self.resolution as f32;
        (cx as f32 / r, cy as f32 / r)
    }

    pub fn sample(&self, texture: &Texture, u: f32, v: f32) -> [u8; 4] {
        let (cx, cy) = self.cell(u, v);
        // floor(cell / R * size) in integers, so a cell edge that falls exactly
        // on a texel edge never rounds into the texel before it.
        let r = self.resolution as u64;
        let x = (cx as u64 * texture.width as u64 / r) as u32;
        let y = (cy as u64 * texture.height as u64 / r) as u32;
        texture.texel(x, y)
    }
}
