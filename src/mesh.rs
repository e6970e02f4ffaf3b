//! Host mesh abstraction
//!
//! Spatial matching needs per-vertex positional metadata from the host
//! mesh: world-space and local-space positions plus the vertex's UV
//! footprint. [`MeshSource`] is the read-only interface a host implements;
//! [`MemoryMesh`] is the in-memory reference implementation.

use crate::{
    error::{Error, Result},
    types::{Vector2D, Vector3D},
};

/// Read-only interface to a host mesh's per-vertex data
pub trait MeshSource {
    /// Identifier of the mesh shape
    fn name(&self) -> &str;

    /// Name of the active UV set the UV coordinates come from
    fn uv_set(&self) -> &str;

    /// Number of vertices
    fn vertex_count(&self) -> usize;

    /// World-space position of a vertex
    fn world_position(&self, vertex: usize) -> Vector3D;

    /// Local-space (object-space) position of a vertex
    fn local_position(&self, vertex: usize) -> Vector3D;

    /// UV coordinates owned by a vertex
    ///
    /// A vertex on a UV seam owns one coordinate per UV island it touches,
    /// so the result can hold more than one entry.
    fn uvs(&self, vertex: usize) -> Vec<Vector2D>;
}

/// In-memory reference implementation of [`MeshSource`]
#[derive(Debug, Clone)]
pub struct MemoryMesh {
    name: String,
    uv_set: String,
    world: Vec<Vector3D>,
    local: Vec<Vector3D>,
    uvs: Vec<Vec<Vector2D>>,
}

impl MemoryMesh {
    /// Create a new empty mesh
    pub fn new<S: Into<String>, U: Into<String>>(name: S, uv_set: U) -> Self {
        Self {
            name: name.into(),
            uv_set: uv_set.into(),
            world: Vec::new(),
            local: Vec::new(),
            uvs: Vec::new(),
        }
    }

    /// Append a vertex with its positional metadata
    ///
    /// Fails with [`Error::InvalidParameter`] if `uvs` is empty; every
    /// vertex owns at least one UV location.
    pub fn push_vertex(
        &mut self,
        world: Vector3D,
        local: Vector3D,
        uvs: Vec<Vector2D>,
    ) -> Result<usize> {
        if uvs.is_empty() {
            return Err(Error::invalid_parameter(format!(
                "vertex {} has no UV coordinates",
                self.world.len()
            )));
        }
        self.world.push(world);
        self.local.push(local);
        self.uvs.push(uvs);
        Ok(self.world.len() - 1)
    }

    /// Append a vertex whose world and local positions coincide and which
    /// owns a single UV location (test/setup helper)
    pub fn push_simple_vertex(&mut self, position: Vector3D, uv: Vector2D) -> usize {
        self.world.push(position);
        self.local.push(position);
        self.uvs.push(vec![uv]);
        self.world.len() - 1
    }
}

impl MeshSource for MemoryMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn uv_set(&self) -> &str {
        &self.uv_set
    }

    fn vertex_count(&self) -> usize {
        self.world.len()
    }

    fn world_position(&self, vertex: usize) -> Vector3D {
        self.world[vertex]
    }

    fn local_position(&self, vertex: usize) -> Vector3D {
        self.local[vertex]
    }

    fn uvs(&self, vertex: usize) -> Vec<Vector2D> {
        self.uvs[vertex].clone()
    }
}
