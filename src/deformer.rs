//! Host deformer abstraction
//!
//! The live scene's skin deformer is reached only through the
//! [`SkinDeformer`] trait, keeping capture and resynthesis host-agnostic.
//! A concrete host integration (a DCC application's node graph) implements
//! the trait over its own API; [`MemoryDeformer`] is the in-memory
//! reference implementation used by tests and pure-Rust embeddings.
//!
//! Weight data crosses the boundary as whole [`WeightMatrix`] values in
//! single bulk calls. Hosts whose native API is per-vertex implement the
//! bulk call with their own loop; the core never queries per vertex.

use crate::{
    attributes::{AttributeValue, BindAttributes},
    error::{Error, Result},
};

/// An influence-major weight matrix exchanged with a deformer in bulk
///
/// Row `i` holds the per-vertex weights of `influences[i]`; every row has
/// the same length (the vertex count).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    influences: Vec<String>,
    rows: Vec<Vec<f32>>,
}

impl WeightMatrix {
    /// Create a new weight matrix
    ///
    /// Fails with [`Error::InvalidParameter`] if the number of rows does
    /// not match the number of influences or the rows are ragged.
    pub fn new(influences: Vec<String>, rows: Vec<Vec<f32>>) -> Result<Self> {
        if influences.len() != rows.len() {
            return Err(Error::invalid_parameter(format!(
                "{} influences but {} weight rows",
                influences.len(),
                rows.len()
            )));
        }
        if let Some(first) = rows.first() {
            if rows.iter().any(|row| row.len() != first.len()) {
                return Err(Error::invalid_parameter("ragged weight rows"));
            }
        }
        Ok(Self { influences, rows })
    }

    /// Influence names, in row order
    pub fn influences(&self) -> &[String] {
        &self.influences
    }

    /// Weight rows, aligned with [`influences`](Self::influences)
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    /// Get the weight row for an influence by name
    pub fn row(&self, influence: &str) -> Option<&[f32]> {
        self.influences
            .iter()
            .position(|name| name == influence)
            .map(|i| self.rows[i].as_slice())
    }

    /// Number of vertices covered by each row
    pub fn vertex_count(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Number of influences
    pub fn influence_count(&self) -> usize {
        self.influences.len()
    }
}

/// Interface to a host skin deformer
///
/// All weight access is bulk; the destination matrix is written atomically
/// by a single [`set_weight_matrix`](Self::set_weight_matrix) call.
pub trait SkinDeformer {
    /// Identifier of the deformer (e.g. the skin cluster node name)
    fn name(&self) -> &str;

    /// Influence names in the deformer's stable order
    fn influences(&self) -> Vec<String>;

    /// Read the full influence-by-vertex weight matrix
    fn weight_matrix(&self) -> Result<WeightMatrix>;

    /// Write the full influence-by-vertex weight matrix
    ///
    /// Every influence named in `matrix` must already be bound to the
    /// deformer; bound influences missing from `matrix` have their weights
    /// zeroed.
    fn set_weight_matrix(&mut self, matrix: &WeightMatrix) -> Result<()>;

    /// Read the secondary per-vertex blend-weight array
    fn blend_weights(&self) -> Result<Vec<f32>>;

    /// Write the secondary per-vertex blend-weight array
    fn set_blend_weights(&mut self, weights: &[f32]) -> Result<()>;

    /// Read a bind attribute, if the deformer carries it
    fn bind_attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Write a bind attribute
    fn set_bind_attribute(&mut self, name: &str, value: AttributeValue) -> Result<()>;

    /// Bind a new influence with zero weight on every vertex
    ///
    /// Fails with [`Error::InvalidParameter`] if the influence is already
    /// bound.
    fn add_influence(&mut self, name: &str) -> Result<()>;
}

/// In-memory reference implementation of [`SkinDeformer`]
///
/// Stores the weight matrix influence-major, like the trait exchanges it.
#[derive(Debug, Clone)]
pub struct MemoryDeformer {
    name: String,
    vertex_count: usize,
    influences: Vec<String>,
    rows: Vec<Vec<f32>>,
    blend: Vec<f32>,
    attributes: BindAttributes,
}

impl MemoryDeformer {
    /// Create a new deformer with no influences and zeroed blend weights
    pub fn new<S: Into<String>>(name: S, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            influences: Vec::new(),
            rows: Vec::new(),
            blend: vec![0.0; vertex_count],
            attributes: BindAttributes::new(),
        }
    }

    /// Bind an influence with an explicit weight row (test/setup helper)
    pub fn bind_influence<S: Into<String>>(&mut self, name: S, weights: Vec<f32>) -> Result<()> {
        let name = name.into();
        if self.influences.contains(&name) {
            return Err(Error::invalid_parameter(format!(
                "influence {name} is already bound"
            )));
        }
        if weights.len() != self.vertex_count {
            return Err(Error::invalid_parameter(format!(
                "weight row for {name} has {} entries, expected {}",
                weights.len(),
                self.vertex_count
            )));
        }
        self.influences.push(name);
        self.rows.push(weights);
        Ok(())
    }

    /// Number of vertices this deformer is bound to
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Weight of `influence` on `vertex` (0.0 when not bound)
    pub fn weight(&self, influence: &str, vertex: usize) -> f32 {
        self.influences
            .iter()
            .position(|name| name == influence)
            .and_then(|i| self.rows[i].get(vertex))
            .copied()
            .unwrap_or(0.0)
    }

    /// Mutable access to the bind attributes (setup helper)
    pub fn attributes_mut(&mut self) -> &mut BindAttributes {
        &mut self.attributes
    }
}

impl SkinDeformer for MemoryDeformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn influences(&self) -> Vec<String> {
        self.influences.clone()
    }

    fn weight_matrix(&self) -> Result<WeightMatrix> {
        WeightMatrix::new(self.influences.clone(), self.rows.clone())
    }

    fn set_weight_matrix(&mut self, matrix: &WeightMatrix) -> Result<()> {
        if matrix.influence_count() > 0 && matrix.vertex_count() != self.vertex_count {
            return Err(Error::invalid_parameter(format!(
                "matrix covers {} vertices, deformer is bound to {}",
                matrix.vertex_count(),
                self.vertex_count
            )));
        }
        for influence in matrix.influences() {
            if !self.influences.contains(influence) {
                return Err(Error::missing_influence(influence.clone()));
            }
        }
        for (local, name) in self.influences.iter().enumerate() {
            match matrix.row(name) {
                Some(row) => self.rows[local].copy_from_slice(row),
                None => self.rows[local].fill(0.0),
            }
        }
        Ok(())
    }

    fn blend_weights(&self) -> Result<Vec<f32>> {
        Ok(self.blend.clone())
    }

    fn set_blend_weights(&mut self, weights: &[f32]) -> Result<()> {
        if weights.len() != self.vertex_count {
            return Err(Error::invalid_parameter(format!(
                "blend weight array has {} entries, expected {}",
                weights.len(),
                self.vertex_count
            )));
        }
        self.blend.copy_from_slice(weights);
        Ok(())
    }

    fn bind_attribute(&self, name: &str) -> Option<AttributeValue> {
        self.attributes.get(name).cloned()
    }

    fn set_bind_attribute(&mut self, name: &str, value: AttributeValue) -> Result<()> {
        self.attributes.set(name, value);
        Ok(())
    }

    fn add_influence(&mut self, name: &str) -> Result<()> {
        self.bind_influence(name, vec![0.0; self.vertex_count])
    }
}
