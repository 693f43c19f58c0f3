//! CPU scan conversion of the sprite mesh.
//!
//! Pixel centers are tested against each triangle with edge functions; the
//! interpolated UV goes through the [`PixelSampler`] and the result is blended
//! source-over into the [`Frame`] in index order, so later triangles land on
//! top where a deformed mesh folds over itself. A top-left fill rule keeps
//! pixel centers lying exactly on a shared edge from being drawn twice.

use super::mesh::Mesh;
use super::sampler::PixelSampler;
use super::texture::Texture;
use glam::Vec2;

/// RGBA8 render target.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; (width as usize) * (height as usize) * 4] }
    }

    pub fn clear(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = self.offset(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Straight-alpha source-over.
    pub fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        match src[3] {
            0 => {}
            255 => self.put(x, y, src),
            sa => {
                let dst = self.pixel(x, y);
                let sa = sa as f32 / 255.0;
                let da = dst[3] as f32 / 255.0 * (1.0 - sa);
                let oa = sa + da;
                let mut out = [0u8; 4];
                for c in 0..3 {
                    out[c] = ((src[c] as f32 * sa + dst[c] as f32 * da) / oa).round() as u8;
                }
                out[3] = (oa * 255.0).round() as u8;
                self.put(x, y, out);
            }
        }
    }

    pub fn into_raw(self) -> Vec<u8> { self.pixels }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }
}

fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

// For triangles with positive `edge` area (clockwise on a y-down screen) the
// top edge runs right along a horizontal and left edges run upward.
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

fn inside(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

/// Draw `mesh` textured through `sampler`. Returns the number of fragments
/// blended, which counts overlapping pixels once per triangle.
pub fn rasterize_mesh(frame: &mut Frame, mesh: &Mesh, texture: &Texture, sampler: &PixelSampler) -> usize {
    if frame.width == 0 || frame.height == 0 {
        return 0;
    }
    let mut count = 0;

    for [i0, i1, i2] in mesh.triangles() {
        let (Some(v0), Some(mut v1), Some(mut v2)) = (mesh.vertices.get(i0), mesh.vertices.get(i1), mesh.vertices.get(i2))
        else {
            continue;
        };
        let mut area = edge(v0.position(), v1.position(), v2.position());
        if !area.is_finite() || area.abs() < f32::EPSILON {
            continue;
        }
        if area < 0.0 {
            std::mem::swap(&mut v1, &mut v2);
            area = -area;
        }
        let (p0, p1, p2) = (v0.position(), v1.position(), v2.position());
        let tl = [is_top_left(p1, p2), is_top_left(p2, p0), is_top_left(p0, p1)];

        let min = p0.min(p1).min(p2).floor().max(Vec2::ZERO);
        let max = p0.max(p1).max(p2).ceil().min(Vec2::new(frame.width as f32, frame.height as f32));
        if min.x >= max.x || min.y >= max.y {
            continue;
        }

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let c = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let e = [edge(p1, p2, c), edge(p2, p0, c), edge(p0, p1, c)];
                if !(inside(e[0], tl[0]) && inside(e[1], tl[1]) && inside(e[2], tl[2])) {
                    continue;
                }
                let uv = (v0.uv() * e[0] + v1.uv() * e[1] + v2.uv() * e[2]) / area;
                frame.blend(x, y, sampler.sample(texture, uv.x, uv.y));
                count += 1;
            }
        }
    }
    count
}
