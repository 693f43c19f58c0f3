use crate::edit::{Tool, DEFAULT_PICK_RADIUS};
use crate::render::overlay::OverlayStyle;
use crate::render::sampler::DEFAULT_RESOLUTION;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: Canvas,
    pub mesh: MeshDensity,
    /// Virtual pixels across the sprite.
    pub resolution: u32,
    pub pick_radius: f32,
    pub tool: Tool,
    pub overlay: OverlayStyle,
    /// Frame clear color behind the sprite.
    pub background_rgba: [u8; 4],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            mesh: MeshDensity::default(),
            resolution: DEFAULT_RESOLUTION,
            pick_radius: DEFAULT_PICK_RADIUS,
            tool: Tool::Select,
            overlay: OverlayStyle::default(),
            background_rgba: [0, 0, 0, 0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self { Self { width: 512, height: 512 } }
}

/// Grid cells across and down the sprite mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshDensity {
    pub cols: u32,
    pub rows: u32,
}

impl Default for MeshDensity {
    fn default() -> Self { Self { cols: 32, rows: 32 } }
}
