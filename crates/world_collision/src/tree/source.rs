//! Where a chunk tree fetches its triangles from

use crate::error::BuildError;
use crate::foundation::math::Vec3;
use crate::geometry::Triangle;
use crate::scene::TriangleRecord;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Anything that can hand out triangle `i` of a chunk
pub trait TriangleSupplier {
    /// Number of triangles
    fn triangle_count(&self) -> usize;

    /// Triangle `index`; the NaN sentinel for degenerate or unknown indices
    fn triangle(&self, index: u32) -> Triangle;
}

/// Triangles read on demand from buffers shared with the scene
#[derive(Debug, Clone)]
pub struct SharedBuffers {
    vertices: Arc<[Vec3]>,
    triangles: Arc<[TriangleRecord]>,
}

impl SharedBuffers {
    /// Wrap shared buffers, checking every vertex index
    pub fn new(
        chunk: u32,
        vertices: Arc<[Vec3]>,
        triangles: Arc<[TriangleRecord]>,
    ) -> Result<Self, BuildError> {
        check_indices(chunk, triangles.iter().map(|t| &t.indices), vertices.len())?;
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// The vertex buffer
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// The triangle records
    pub fn records(&self) -> &[TriangleRecord] {
        &self.triangles
    }
}

impl TriangleSupplier for SharedBuffers {
    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn triangle(&self, index: u32) -> Triangle {
        let Some(record) = self.triangles.get(index as usize) else {
            return Triangle::nan();
        };
        let vertex = |i: u32| self.vertices.get(i as usize).copied();
        match (vertex(record.indices[0]), vertex(record.indices[1]), vertex(record.indices[2])) {
            (Some(a), Some(b), Some(c)) => Triangle::from_vertices(a, b, c),
            _ => Triangle::nan(),
        }
    }
}

/// Triangles unmapped into an owned array at construction
///
/// Vertices can be merged when bit-identical; degenerate triangles are
/// replaced by the NaN sentinel up front so lookups are a plain index.
#[derive(Debug, Clone)]
pub struct LocalTriangles {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
    triangles: Vec<Triangle>,
}

impl LocalTriangles {
    /// Build from raw arrays
    pub fn new(
        chunk: u32,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        deduplicate: bool,
    ) -> Result<Self, BuildError> {
        check_indices(chunk, indices.iter(), vertices.len())?;

        let (vertices, remap) = if deduplicate {
            deduplicate_vertices(vertices)
        } else {
            (vertices.to_vec(), (0..vertices.len() as u32).collect())
        };

        let indices: Vec<[u32; 3]> = indices
            .iter()
            .map(|tri| tri.map(|i| remap[i as usize]))
            .collect();

        let triangles: Vec<Triangle> = indices
            .iter()
            .map(|[a, b, c]| {
                Triangle::from_vertices(
                    vertices[*a as usize],
                    vertices[*b as usize],
                    vertices[*c as usize],
                )
            })
            .collect();

        let degenerate = triangles.iter().filter(|t| t.is_nan()).count();
        debug!(
            "chunk {chunk}: local source with {} vertices, {} triangles ({degenerate} degenerate)",
            vertices.len(),
            triangles.len(),
        );

        Ok(Self {
            vertices,
            indices,
            triangles,
        })
    }

    /// Vertex positions after merging
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Index triples into [`LocalTriangles::vertices`]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }
}

impl TriangleSupplier for LocalTriangles {
    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn triangle(&self, index: u32) -> Triangle {
        self.triangles
            .get(index as usize)
            .copied()
            .unwrap_or_else(Triangle::nan)
    }
}

/// The two concrete triangle sources a chunk tree can sit on
#[derive(Debug, Clone)]
pub enum TriangleSource {
    /// Triangles read through shared scene buffers
    Shared(SharedBuffers),
    /// Triangles owned by the tree
    Local(LocalTriangles),
}

impl TriangleSupplier for TriangleSource {
    #[inline]
    fn triangle_count(&self) -> usize {
        match self {
            Self::Shared(s) => s.triangle_count(),
            Self::Local(l) => l.triangle_count(),
        }
    }

    #[inline]
    fn triangle(&self, index: u32) -> Triangle {
        match self {
            Self::Shared(s) => s.triangle(index),
            Self::Local(l) => l.triangle(index),
        }
    }
}

fn check_indices<'a>(
    chunk: u32,
    triangles: impl Iterator<Item = &'a [u32; 3]>,
    vertex_count: usize,
) -> Result<(), BuildError> {
    for (triangle, indices) in triangles.enumerate() {
        if let Some(&vertex) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(BuildError::VertexIndexOutOfRange {
                chunk,
                triangle,
                vertex,
                count: vertex_count,
            });
        }
    }
    Ok(())
}

/// Merge bit-identical positions; returns the unique vertices and old-to-new map
fn deduplicate_vertices(vertices: &[Vec3]) -> (Vec<Vec3>, Vec<u32>) {
    let mut unique = Vec::with_capacity(vertices.len());
    let mut lookup: HashMap<[u32; 3], u32> = HashMap::with_capacity(vertices.len());
    let remap = vertices
        .iter()
        .map(|v| {
            let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
            *lookup.entry(key).or_insert_with(|| {
                unique.push(*v);
                (unique.len() - 1) as u32
            })
        })
        .collect();
    (unique, remap)
}
