use bytemuck::{Pod, Zeroable};
use glam::Vec2;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn position(&self) -> Vec2 { Vec2::from(self.pos) }
    pub fn uv(&self) -> Vec2 { Vec2::from(self.uv) }
}

/// Dense planar sprite mesh in canvas coordinates.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub width: f32,
    pub height: f32,
}

impl Mesh {
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(Vertex::position)
    }

    pub fn set_position(&mut self, index: usize, p: Vec2) {
        if let Some(v) = self.vertices.get_mut(index) {
            v.pos = p.to_array();
        }
    }

    /// Raw vertex buffer for hosts that upload to a GPU.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

// Regular grid spanning [0, width] x [0, height] with UVs over [0, 1].
// cols/rows: cell counts (>= 1)
pub fn generate_grid(width: f32, height: f32, cols: u32, rows: u32) -> Mesh {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let mut vertices = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);
    let mut indices = Vec::with_capacity((cols * rows * 6) as usize);

    for i in 0..=rows {
        let v = i as f32 / rows as f32; // 0..1, top to bottom
        for j in 0..=cols {
            let u = j as f32 / cols as f32; // 0..1
            vertices.push(Vertex { pos: [u * width, v * height], uv: [u, v] });
        }
    }

    let stride = cols + 1;
    for i in 0..rows {
        for j in 0..cols {
            let a = i * stride + j;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    Mesh { vertices, indices, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_and_corners() {
        let mesh = generate_grid(64.0, 32.0, 4, 2);
        assert_eq!(mesh.vertices.len(), 5 * 3);
        assert_eq!(mesh.indices.len(), 4 * 2 * 6);
        assert_eq!(mesh.vertices[0], Vertex { pos: [0.0, 0.0], uv: [0.0, 0.0] });
        assert_eq!(*mesh.vertices.last().unwrap(), Vertex { pos: [64.0, 32.0], uv: [1.0, 1.0] });
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertex_bytes_cover_buffer() {
        let mesh = generate_grid(8.0, 8.0, 1, 1);
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertices.len() * 16);
    }
}
