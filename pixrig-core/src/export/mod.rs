//! Export utilities: point-sampled downsample of a rendered frame to the
//! virtual resolution, plus sidecar metadata.

use crate::render::Frame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub resolution: u32,
    pub canvas: (u32, u32),
    pub bones: usize,
    pub bound_vertices: usize,
}

/// Shrink `frame` to `size x size` by sampling the source pixel under each
/// destination pixel center. No filtering, so the quantized colors survive.
pub fn downsample_nearest(frame: &Frame, size: u32) -> Frame {
    let mut out = Frame::new(size, size);
    if size == 0 || frame.width == 0 || frame.height == 0 {
        return out;
    }
    let (sw, sh, n) = (frame.width as u64, frame.height as u64, size as u64);
    for y in 0..size {
        // floor((y + 0.5) * H / n) in integers.
        let sy = ((2 * y as u64 + 1) * sh / (2 * n)) as u32;
        for x in 0..size {
            let sx = ((2 * x as u64 + 1) * sw / (2 * n)) as u32;
            out.put(x, y, frame.pixel(sx, sy));
        }
    }
    out
}
