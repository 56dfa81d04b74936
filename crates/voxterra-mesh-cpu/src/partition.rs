use thiserror::Error;
use voxterra_geom::{Aabb, Vec3};

use crate::raw::RawMesh;

/// Voxel units to world units.
pub const DEFAULT_WORLD_SCALE: f32 = 100.0;

/// Errors for raw meshes the partitioner cannot read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// Index buffer length is not a multiple of three.
    #[error("index count {count} is not a multiple of 3")]
    TruncatedTriangle { count: usize },

    /// A triangle references a vertex past the end of the vertex buffer.
    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count}")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Render buffers for one material.
///
/// Vertices are never shared between triangles, so every buffer holds three
/// entries per triangle and `indices` is always `0, 1, 2, 3, ...`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialMeshSection {
    pub material: u8,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
}

impl MaterialMeshSection {
    fn new(material: u8) -> Self {
        Self {
            material,
            ..Self::default()
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    fn push_triangle(&mut self, v: [Vec3; 3]) {
        let edge0 = v[1] - v[0];
        let edge1 = v[2] - v[0];
        let tangent = edge0.normalized();
        let normal = edge0.cross(edge1).normalized();
        let base = self.vertices.len() as u32;
        for p in v {
            self.vertices.push(p);
            self.normals.push(normal);
            self.tangents.push(tangent);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Splits a raw mesh into per-material sections with flat shading.
#[derive(Clone, Copy, Debug)]
pub struct MeshPartitioner {
    pub world_scale: f32,
}

impl Default for MeshPartitioner {
    fn default() -> Self {
        Self {
            world_scale: DEFAULT_WORLD_SCALE,
        }
    }
}

impl MeshPartitioner {
    pub fn new(world_scale: f32) -> Self {
        Self { world_scale }
    }

    /// Buckets every triangle into the section of its third vertex's material.
    ///
    /// Returns `material_count` sections, section `m - 1` holding material
    /// `m`. Each triangle is emitted in reverse order (third, second, first)
    /// with positions scaled by `world_scale`. Triangles tagged air or above
    /// `material_count` are dropped.
    pub fn partition(
        &self,
        mesh: &RawMesh,
        material_count: u8,
    ) -> Result<Vec<MaterialMeshSection>, PartitionError> {
        if mesh.indices.len() % 3 != 0 {
            return Err(PartitionError::TruncatedTriangle {
                count: mesh.indices.len(),
            });
        }
        let mut sections: Vec<MaterialMeshSection> =
            (1..=material_count).map(MaterialMeshSection::new).collect();
        let vertex_count = mesh.vertices.len();
        let mut skipped = 0usize;
        for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
            let fetch = |i: u32| {
                mesh.vertices
                    .get(i as usize)
                    .copied()
                    .ok_or(PartitionError::IndexOutOfRange {
                        triangle: t,
                        index: i,
                        vertex_count,
                    })
            };
            let raw = [fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?];
            let material = raw[2].material;
            if material == 0 || material > material_count {
                skipped += 1;
                continue;
            }
            let s = self.world_scale;
            sections[usize::from(material) - 1].push_triangle([
                raw[2].position * s,
                raw[1].position * s,
                raw[0].position * s,
            ]);
        }
        if skipped > 0 {
            log::warn!(
                "partition skipped {} of {} triangles with untracked materials",
                skipped,
                mesh.triangle_count()
            );
        }
        log::debug!(
            "partition tris={} sections={:?}",
            mesh.triangle_count(),
            sections
                .iter()
                .map(MaterialMeshSection::triangle_count)
                .collect::<Vec<_>>()
        );
        Ok(sections)
    }
}
