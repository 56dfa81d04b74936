use std::time::Instant;

use voxterra_blocks::Voxel;
use voxterra_chunk::VoxelSource;
use voxterra_geom::{Region, Vec3};

use crate::face::Face;
use crate::raw::RawMesh;
use crate::SurfaceExtractor;

/// Blocky extractor: one quad per solid face that touches a non-solid voxel.
///
/// Voxel `(x, y, z)` fills the unit cell `[x, x+1] x [y, y+1] x [z, z+1]`.
/// Each quad gets four vertices of its own and two triangles wound clockwise
/// when seen from the empty side.
#[derive(Clone, Copy, Debug, Default)]
pub struct CubicExtractor;

impl CubicExtractor {
    pub fn new() -> Self {
        Self
    }

    fn emit_face(out: &mut RawMesh, x: i32, y: i32, z: i32, face: Face, material: u8) {
        let mut ids = [0u32; 4];
        for (slot, (dx, dy, dz)) in ids.iter_mut().zip(face.corners()) {
            let p = Vec3::new(
                x as f32 + dx as f32,
                y as f32 + dy as f32,
                z as f32 + dz as f32,
            );
            *slot = out.push_vertex(p, material);
        }
        // corners are counter-clockwise; emit the mirror order
        out.push_triangle(ids[0], ids[2], ids[1]);
        out.push_triangle(ids[0], ids[3], ids[2]);
    }
}

/// Voxel across a face; positions past the `i32` range read as air.
fn neighbour(source: &dyn VoxelSource, x: i32, y: i32, z: i32, d: (i32, i32, i32)) -> Voxel {
    match (x.checked_add(d.0), y.checked_add(d.1), z.checked_add(d.2)) {
        (Some(nx), Some(ny), Some(nz)) => source.voxel(nx, ny, nz),
        _ => Voxel::AIR,
    }
}

impl SurfaceExtractor for CubicExtractor {
    fn extract(&self, source: &dyn VoxelSource, region: &Region) -> RawMesh {
        let t0 = Instant::now();
        let mut out = RawMesh::new();
        for p in region {
            let v = source.voxel(p.x, p.y, p.z);
            if !v.is_solid() {
                continue;
            }
            for face in Face::ALL {
                if !neighbour(source, p.x, p.y, p.z, face.delta()).is_solid() {
                    Self::emit_face(&mut out, p.x, p.y, p.z, face, v.material);
                }
            }
        }
        log::debug!(
            target: "perf",
            "ms={} cubic_extract dims={:?} verts={} tris={}",
            t0.elapsed().as_millis(),
            region.dims(),
            out.vertices.len(),
            out.triangle_count()
        );
        out
    }
}
