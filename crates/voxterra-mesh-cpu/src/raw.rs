use voxterra_geom::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawVertex {
    pub position: Vec3,
    pub material: u8,
}

/// Extractor output: vertices plus triangle indices, three per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMesh {
    pub vertices: Vec<RawVertex>,
    pub indices: Vec<u32>,
}

impl RawMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a vertex and returns its index.
    #[inline]
    pub fn push_vertex(&mut self, position: Vec3, material: u8) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(RawVertex { position, material });
        i
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}
