pub mod mesh;
pub mod overlay;
pub mod raster;
pub mod sampler;
pub mod texture;

pub use mesh::{generate_grid, Mesh, Vertex};
pub use overlay::{draw_skeleton, OverlayStyle};
pub use raster::{rasterize_mesh, Frame};
pub use sampler::PixelSampler;
pub use texture::Texture;
