//! Weight capture: snapshot a live deformer into a [`WeightRecord`]

use crate::{
    attributes::{BIND_ATTRIBUTE_NAMES, BindAttributes},
    deformer::{SkinDeformer, WeightMatrix},
    error::{Error, Result},
    mesh::MeshSource,
    progress::{ProgressHandler, report_batched},
    record::{VertexSample, WeightRecord},
};

/// Capture a deformer's skin binding into a [`WeightRecord`]
///
/// Influences are enumerated in the deformer's stable order; the weight
/// matrix and blend-weight array are pulled in single bulk calls, and the
/// known bind attributes are copied verbatim. The source is never mutated.
///
/// A deformer with zero influences is not an error: it captures as a valid
/// empty record (a mesh can legitimately be unskinned in some LODs) with a
/// logged warning.
pub fn capture_weights(
    deformer: &dyn SkinDeformer,
    mesh: &dyn MeshSource,
) -> Result<WeightRecord> {
    let influences = deformer.influences();

    let matrix = if influences.is_empty() {
        log::warn!(
            "deformer {} has no influences; capturing an empty record for {}",
            deformer.name(),
            mesh.name()
        );
        WeightMatrix::new(Vec::new(), Vec::new())?
    } else {
        let matrix = deformer.weight_matrix()?;
        if matrix.vertex_count() != mesh.vertex_count() {
            return Err(Error::invalid_record(format!(
                "deformer {} covers {} vertices but mesh {} has {}",
                deformer.name(),
                matrix.vertex_count(),
                mesh.name(),
                mesh.vertex_count()
            )));
        }
        matrix
    };

    let blend_weights = deformer.blend_weights()?;
    if blend_weights.len() != mesh.vertex_count() {
        return Err(Error::invalid_record(format!(
            "deformer {} has {} blend weights but mesh {} has {} vertices",
            deformer.name(),
            blend_weights.len(),
            mesh.name(),
            mesh.vertex_count()
        )));
    }

    let mut attributes = BindAttributes::new();
    for name in BIND_ATTRIBUTE_NAMES {
        if let Some(value) = deformer.bind_attribute(name) {
            attributes.set(*name, value);
        }
    }

    WeightRecord::new(mesh.name(), deformer.name(), matrix, blend_weights, attributes)
}

/// Collect per-vertex positional metadata for spatial matching
///
/// Reports progress every [`PROGRESS_BATCH`](crate::progress::PROGRESS_BATCH)
/// vertices; a cancelling handler aborts with [`Error::Cancelled`].
pub fn sample_vertices(
    mesh: &dyn MeshSource,
    progress: &mut dyn ProgressHandler,
) -> Result<Vec<VertexSample>> {
    let total = mesh.vertex_count();
    let mut samples = Vec::with_capacity(total);

    for vertex in 0..total {
        samples.push(VertexSample::new(
            mesh.world_position(vertex),
            mesh.local_position(vertex),
            mesh.uvs(vertex),
            vertex,
        ));
        if !report_batched(progress, vertex + 1, total) {
            return Err(Error::Cancelled);
        }
    }

    Ok(samples)
}
