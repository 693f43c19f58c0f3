/// RGBA8 source image, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Texture {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0; (width * height * 4) as usize] }
    }

    /// Wrap decoded pixels. Returns `None` when the buffer size does not match.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == (width as usize) * (height as usize) * 4).then_some(Self { width, height, data })
    }

    pub fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    /// Texel fetch with clamp-to-edge addressing.
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        if self.is_empty() {
            return [0; 4];
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn set_texel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Plain nearest-neighbor lookup at normalized coordinates.
    pub fn sample_nearest(&self, u: f32, v: f32) -> [u8; 4] {
        let x = (u * self.width as f32).floor().max(0.0) as u32;
        let y = (v * self.height as f32).floor().max(0.0) as u32;
        self.texel(x, y)
    }
}
