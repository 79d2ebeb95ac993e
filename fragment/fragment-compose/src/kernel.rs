//! The solid-modeling seam.
//!
//! Composition never touches geometry directly. It lifts meshes into the
//! kernel's solid representation, combines them, and lowers the result back,
//! all through [`CsgKernel`].

use crate::error::KernelResult;

/// A constructive-solid-geometry kernel.
///
/// Every call may fail; the composer treats failures as local to the step
/// that raised them.
pub trait CsgKernel {
    /// Mesh type produced by the geometry engine.
    type Mesh;

    /// The kernel's solid representation.
    type Solid;

    /// Convert an engine mesh into a solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh cannot be represented as a solid.
    fn to_solid(&self, mesh: &Self::Mesh) -> KernelResult<Self::Solid>;

    /// Boolean union `a ∪ b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    fn union(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Boolean difference `a − b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    fn difference(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Convert a solid back into an engine mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be meshed.
    fn to_mesh(&self, solid: &Self::Solid) -> KernelResult<Self::Mesh>;
}

impl<K: CsgKernel + ?Sized> CsgKernel for &K {
    type Mesh = K::Mesh;
    type Solid = K::Solid;

    fn to_solid(&self, mesh: &Self::Mesh) -> KernelResult<Self::Solid> {
        (**self).to_solid(mesh)
    }

    fn union(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid> {
        (**self).union(a, b)
    }

    fn difference(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid> {
        (**self).difference(a, b)
    }

    fn to_mesh(&self, solid: &Self::Solid) -> KernelResult<Self::Mesh> {
        (**self).to_mesh(solid)
    }
}
