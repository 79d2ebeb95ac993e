//! A minimal in-crate kernel over indexed triangle meshes.
//!
//! [`ConcatKernel`] unions by concatenating triangle soups. That is exact for
//! disjoint or touching parts and is what a preview needs. It cannot carve,
//! so [`CsgKernel::difference`] reports [`KernelError::Unsupported`] and the
//! composer keeps the pre-difference solid.

#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

use crate::error::{KernelError, KernelResult};
use crate::kernel::CsgKernel;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Triangles as vertex indices, counter-clockwise.
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from positions and faces.
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { positions, faces }
    }

    /// Create a mesh from flat coordinate and index buffers.
    ///
    /// Returns an empty mesh if either buffer length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use fragment_compose::TriangleMesh;
    ///
    /// let mesh = TriangleMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::default();
        }

        let positions = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { positions, faces }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }
}

/// A validated, welded [`TriangleMesh`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    mesh: TriangleMesh,
}

impl Solid {
    /// The underlying mesh.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }
}

/// Concatenating union kernel. See the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatKernel;

impl ConcatKernel {
    /// Create the kernel.
    pub fn new() -> Self {
        Self
    }
}

impl CsgKernel for ConcatKernel {
    type Mesh = TriangleMesh;
    type Solid = Solid;

    fn to_solid(&self, mesh: &TriangleMesh) -> KernelResult<Solid> {
        validate(mesh)?;
        let welded = weld_exact(mesh);
        debug!(
            vertices_in = mesh.vertex_count(),
            vertices_out = welded.vertex_count(),
            faces = welded.face_count(),
            "Converted mesh to solid"
        );
        Ok(Solid { mesh: welded })
    }

    fn union(&self, a: &Solid, b: &Solid) -> KernelResult<Solid> {
        let offset = u32::try_from(a.mesh.positions.len()).map_err(|_| {
            KernelError::OperationFailed {
                operation: "union",
                details: "vertex count exceeds u32 index range".to_string(),
            }
        })?;

        let mut mesh = a.mesh.clone();
        mesh.positions.extend_from_slice(&b.mesh.positions);
        mesh.faces.extend(
            b.mesh
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
        Ok(Solid { mesh })
    }

    fn difference(&self, _a: &Solid, _b: &Solid) -> KernelResult<Solid> {
        Err(KernelError::Unsupported {
            operation: "difference",
        })
    }

    fn to_mesh(&self, solid: &Solid) -> KernelResult<TriangleMesh> {
        Ok(solid.mesh.clone())
    }
}

fn validate(mesh: &TriangleMesh) -> KernelResult<()> {
    if mesh.is_empty() {
        return Err(KernelError::InvalidMesh {
            details: "mesh has no faces".to_string(),
        });
    }

    if let Some(i) = mesh
        .positions
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(KernelError::InvalidMesh {
            details: format!("vertex {i} has a non-finite coordinate"),
        });
    }

    let len = mesh.positions.len();
    if let Some((i, face)) = mesh
        .faces
        .iter()
        .enumerate()
        .find(|(_, f)| f.iter().any(|&v| v as usize >= len))
    {
        return Err(KernelError::InvalidMesh {
            details: format!("face {i} {face:?} references a vertex outside 0..{len}"),
        });
    }

    Ok(())
}

/// Merge bit-identical vertices and drop faces that collapse as a result.
fn weld_exact(mesh: &TriangleMesh) -> TriangleMesh {
    let mut index: HashMap<[u64; 3], u32> = HashMap::with_capacity(mesh.positions.len());
    let mut positions = Vec::with_capacity(mesh.positions.len());
    let mut remap = Vec::with_capacity(mesh.positions.len());

    for p in &mesh.positions {
        // +0.0 and -0.0 are the same point.
        let key = [p.x + 0.0, p.y + 0.0, p.z + 0.0].map(f64::to_bits);
        let next = positions.len() as u32;
        let id = *index.entry(key).or_insert_with(|| {
            positions.push(*p);
            next
        });
        remap.push(id);
    }

    let faces = mesh
        .faces
        .iter()
        .map(|f| f.map(|v| remap[v as usize]))
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    TriangleMesh { positions, faces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle(dx: f64) -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Point3::new(dx, 0.0, 0.0),
                Point3::new(dx + 1.0, 0.0, 0.0),
                Point3::new(dx, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_from_raw_rejects_ragged() {
        assert!(TriangleMesh::from_raw(&[0.0, 1.0], &[0, 1, 2]).is_empty());
        assert_eq!(TriangleMesh::from_raw(&[0.0; 9], &[0, 1]).vertex_count(), 0);
    }

    #[test]
    fn test_bounds() {
        let mesh = unit_triangle(2.0);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(lo.x, 2.0);
        assert_relative_eq!(hi.x, 3.0);
        assert_relative_eq!(hi.y, 1.0);
        assert!(TriangleMesh::default().bounds().is_none());
    }

    #[test]
    fn test_to_solid_rejects_empty() {
        let err = ConcatKernel.to_solid(&TriangleMesh::default()).unwrap_err();
        assert!(matches!(err, KernelError::InvalidMesh { .. }));
    }

    #[test]
    fn test_to_solid_rejects_bad_index() {
        let mut mesh = unit_triangle(0.0);
        mesh.faces.push([0, 1, 9]);
        let err = ConcatKernel.to_solid(&mesh).unwrap_err();
        assert!(err.to_string().contains("face 1"));
    }

    #[test]
    fn test_to_solid_rejects_nan() {
        let mut mesh = unit_triangle(0.0);
        mesh.positions[2].z = f64::NAN;
        assert!(ConcatKernel.to_solid(&mesh).is_err());
    }

    #[test]
    fn test_weld_merges_duplicates() {
        let mesh = TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, -0.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        let solid = ConcatKernel.to_solid(&mesh).unwrap();
        assert_eq!(solid.mesh().vertex_count(), 4);
        assert_eq!(solid.mesh().faces, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn test_weld_drops_collapsed_faces() {
        let mut mesh = unit_triangle(0.0);
        mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
        mesh.faces.push([0, 3, 1]);
        let solid = ConcatKernel.to_solid(&mesh).unwrap();
        assert_eq!(solid.mesh().face_count(), 1);
    }

    #[test]
    fn test_union_offsets_indices() {
        let k = ConcatKernel::new();
        let a = k.to_solid(&unit_triangle(0.0)).unwrap();
        let b = k.to_solid(&unit_triangle(5.0)).unwrap();
        let mesh = k.to_mesh(&k.union(&a, &b).unwrap()).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert_relative_eq!(mesh.positions[3].x, 5.0);
    }

    #[test]
    fn test_difference_unsupported() {
        let k = ConcatKernel;
        let a = k.to_solid(&unit_triangle(0.0)).unwrap();
        assert_eq!(
            k.difference(&a, &a).unwrap_err(),
            KernelError::Unsupported {
                operation: "difference"
            }
        );
    }
}
