//! Weight record: the serializable snapshot of one mesh's skin binding

use std::collections::HashMap;

use crate::{
    attributes::BindAttributes,
    deformer::WeightMatrix,
    error::{Error, Result},
    types::{Vector2D, Vector3D, WEIGHT_SUM_EPSILON},
};

/// Per-vertex positional metadata used for spatial matching
///
/// Index-identity transfer never needs samples; the spatial strategies
/// match against them.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSample {
    /// World-space position
    pub world: Vector3D,
    /// Local-space position
    pub local: Vector3D,
    /// UV locations owned by the vertex (more than one on a UV seam)
    pub uvs: Vec<Vector2D>,
    /// Index of the vertex this sample was taken from
    pub vertex: usize,
}

impl VertexSample {
    /// Create a new vertex sample
    pub fn new(world: Vector3D, local: Vector3D, uvs: Vec<Vector2D>, vertex: usize) -> Self {
        Self {
            world,
            local,
            uvs,
            vertex,
        }
    }
}

/// A snapshot of one mesh's skin binding
///
/// Holds the full influence-by-vertex weight matrix, the secondary
/// blend-weight array, and the bind attributes, decoupled from any live
/// deformer. Immutable once captured except through
/// [`reduce`](crate::reduce::reduce), which folds removed influences into
/// retained ones.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRecord {
    shape: String,
    skin_cluster: String,
    influences: Vec<String>,
    weights: HashMap<String, Vec<f32>>,
    blend_weights: Vec<f32>,
    bind_attributes: BindAttributes,
}

impl WeightRecord {
    /// Create a record from a bulk weight matrix
    ///
    /// Fails with [`Error::InvalidRecord`] if influence names repeat or if
    /// a non-empty matrix disagrees with the blend-weight array length.
    pub fn new<S: Into<String>, C: Into<String>>(
        shape: S,
        skin_cluster: C,
        matrix: WeightMatrix,
        blend_weights: Vec<f32>,
        bind_attributes: BindAttributes,
    ) -> Result<Self> {
        if matrix.influence_count() > 0 && matrix.vertex_count() != blend_weights.len() {
            return Err(Error::invalid_record(format!(
                "weight rows cover {} vertices but {} blend weights were given",
                matrix.vertex_count(),
                blend_weights.len()
            )));
        }

        let influences: Vec<String> = matrix.influences().to_vec();
        let mut weights = HashMap::with_capacity(influences.len());
        for (name, row) in influences.iter().zip(matrix.rows()) {
            if weights.insert(name.clone(), row.clone()).is_some() {
                return Err(Error::invalid_record(format!(
                    "duplicate influence {name}"
                )));
            }
        }

        Ok(Self {
            shape: shape.into(),
            skin_cluster: skin_cluster.into(),
            influences,
            weights,
            blend_weights,
            bind_attributes,
        })
    }

    /// Identifier of the mesh the record was captured from
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// Identifier of the deformer the record was captured from
    pub fn skin_cluster(&self) -> &str {
        &self.skin_cluster
    }

    /// Influence names in capture order
    pub fn influences(&self) -> &[String] {
        &self.influences
    }

    /// Number of vertices covered by the record
    pub fn vertex_count(&self) -> usize {
        self.blend_weights.len()
    }

    /// Check whether the record carries any influences
    pub fn is_empty(&self) -> bool {
        self.influences.is_empty()
    }

    /// Per-vertex weights of one influence
    pub fn influence_weights(&self, influence: &str) -> Option<&[f32]> {
        self.weights.get(influence).map(|row| row.as_slice())
    }

    /// Weight of `influence` on `vertex` (0.0 when the influence is absent)
    pub fn weight(&self, influence: &str, vertex: usize) -> f32 {
        self.weights
            .get(influence)
            .and_then(|row| row.get(vertex))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sparse non-zero `(influence, weight)` pairs for one vertex, in
    /// influence order
    pub fn vertex_weights(&self, vertex: usize) -> Vec<(&str, f32)> {
        self.influences
            .iter()
            .filter_map(|name| {
                let w = self.weights[name][vertex];
                (w != 0.0).then_some((name.as_str(), w))
            })
            .collect()
    }

    /// Secondary per-vertex blend-weight array
    pub fn blend_weights(&self) -> &[f32] {
        &self.blend_weights
    }

    /// Bind attributes carried with the record
    pub fn bind_attributes(&self) -> &BindAttributes {
        &self.bind_attributes
    }

    /// Rebuild the bulk weight matrix in influence order
    pub fn to_matrix(&self) -> WeightMatrix {
        let rows = self
            .influences
            .iter()
            .map(|name| self.weights[name].clone())
            .collect();
        WeightMatrix::new(self.influences.clone(), rows)
            .expect("record rows are validated at construction")
    }

    /// Check the per-vertex weight sum invariant
    ///
    /// Every vertex carrying any non-zero weight must sum to 1.0 within
    /// [`WEIGHT_SUM_EPSILON`]; fails with [`Error::InvalidRecord`] naming
    /// the first offending vertex.
    pub fn validate(&self) -> Result<()> {
        for vertex in 0..self.vertex_count() {
            let sum: f32 = self
                .influences
                .iter()
                .map(|name| self.weights[name][vertex])
                .sum();
            if sum != 0.0 && !crate::utils::approximately_equal(sum, 1.0, WEIGHT_SUM_EPSILON) {
                return Err(Error::invalid_record(format!(
                    "vertex {vertex} weights sum to {sum}, expected 1.0"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn row_mut(&mut self, influence: &str) -> Option<&mut Vec<f32>> {
        self.weights.get_mut(influence)
    }

    /// Remove an influence's row, keeping the remaining order intact
    pub(crate) fn take_row(&mut self, influence: &str) -> Option<Vec<f32>> {
        let position = self.influences.iter().position(|name| name == influence)?;
        self.influences.remove(position);
        self.weights.remove(influence)
    }
}
