//! Resynthesis: apply a captured record onto a destination deformer
//!
//! The destination mesh may index its vertices differently from the mesh
//! the record was captured on (re-import order, rebuilt topology, a LOD
//! variant). A matching strategy reconstructs the vertex correspondence,
//! then the full weight matrix and blend-weight array are written in one
//! bulk mutation at the end; nothing is touched until every input has
//! validated, so a failed call never leaves a partially-rebound mesh.

use crate::{
    deformer::{SkinDeformer, WeightMatrix},
    error::{Error, Result},
    kdtree::SpatialIndex,
    mesh::MeshSource,
    progress::{ProgressHandler, report_batched},
    record::{VertexSample, WeightRecord},
};

/// Vertex correspondence strategy used by [`apply_weights`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Destination vertex `i` receives the record's weights at `i`;
    /// requires equal vertex counts
    Identity,
    /// Nearest source vertex by world-space position
    WorldPosition,
    /// Nearest source vertex by local-space position
    LocalPosition,
    /// Nearest source UV location; a seam vertex is matched through
    /// whichever of its own UV points lands closest
    UvPosition,
}

/// Apply a weight record onto a destination deformer
///
/// `samples` carries the source record's positional metadata and is
/// required for every strategy except [`Strategy::Identity`].
///
/// Influences named in the record but not bound to the destination are
/// bound fresh with zero initial weight before the write (the record's
/// weight mass is never silently dropped); destination influences the
/// record does not name receive zero rows. The record's bind attributes
/// are copied onto the destination after the weight write.
///
/// Returns the matrix that was written. Progress is reported while
/// matching; a cancelling handler aborts with [`Error::Cancelled`] before
/// any mutation.
pub fn apply_weights(
    record: &WeightRecord,
    samples: Option<&[VertexSample]>,
    deformer: &mut dyn SkinDeformer,
    mesh: &dyn MeshSource,
    strategy: Strategy,
    progress: &mut dyn ProgressHandler,
) -> Result<WeightMatrix> {
    let mapping = match_vertices(record, samples, mesh, strategy, progress)?;

    // Matching succeeded and all inputs validated; mutation starts here.
    let existing = deformer.influences();
    let mut added = 0usize;
    for name in record.influences() {
        if !existing.contains(name) {
            deformer.add_influence(name)?;
            added += 1;
        }
    }
    if added > 0 {
        log::debug!(
            "bound {} influences missing from {} with zero weight",
            added,
            deformer.name()
        );
    }

    let influences = deformer.influences();
    let rows = influences
        .iter()
        .map(|name| match record.influence_weights(name) {
            Some(source_row) => mapping.iter().map(|&src| source_row[src]).collect(),
            None => vec![0.0; mapping.len()],
        })
        .collect();
    let matrix = WeightMatrix::new(influences, rows)?;

    let source_blend = record.blend_weights();
    let blend: Vec<f32> = mapping.iter().map(|&src| source_blend[src]).collect();

    deformer.set_weight_matrix(&matrix)?;
    deformer.set_blend_weights(&blend)?;
    for (name, value) in record.bind_attributes().iter() {
        deformer.set_bind_attribute(name, value.clone())?;
    }

    log::debug!(
        "applied {} influences onto {} vertices of {}",
        matrix.influence_count(),
        mapping.len(),
        deformer.name()
    );
    Ok(matrix)
}

/// Compute the destination-to-source vertex mapping for a strategy
fn match_vertices(
    record: &WeightRecord,
    samples: Option<&[VertexSample]>,
    mesh: &dyn MeshSource,
    strategy: Strategy,
    progress: &mut dyn ProgressHandler,
) -> Result<Vec<usize>> {
    let total = mesh.vertex_count();

    if strategy == Strategy::Identity {
        if total != record.vertex_count() {
            return Err(Error::vertex_count_mismatch(record.vertex_count(), total));
        }
        let mut mapping = Vec::with_capacity(total);
        for vertex in 0..total {
            mapping.push(vertex);
            if !report_batched(progress, vertex + 1, total) {
                return Err(Error::Cancelled);
            }
        }
        return Ok(mapping);
    }

    let samples = samples.ok_or_else(|| {
        Error::invalid_parameter("spatial matching requires vertex samples")
    })?;
    if samples.is_empty() {
        return Err(Error::invalid_parameter(
            "cannot spatially match against an empty record",
        ));
    }
    for sample in samples {
        if sample.vertex >= record.vertex_count() {
            return Err(Error::invalid_parameter(format!(
                "sample references vertex {} outside the record",
                sample.vertex
            )));
        }
    }

    if strategy == Strategy::UvPosition {
        match_by_uv(samples, mesh, progress)
    } else {
        match_by_position(samples, mesh, strategy == Strategy::WorldPosition, progress)
    }
}

fn match_by_position(
    samples: &[VertexSample],
    mesh: &dyn MeshSource,
    world_space: bool,
    progress: &mut dyn ProgressHandler,
) -> Result<Vec<usize>> {
    let points = samples
        .iter()
        .map(|sample| {
            let position = if world_space { sample.world } else { sample.local };
            (position.to_array(), sample.vertex)
        })
        .collect();
    let index = SpatialIndex::<3>::build(points);

    let total = mesh.vertex_count();
    let mut mapping = Vec::with_capacity(total);
    for vertex in 0..total {
        let position = if world_space {
            mesh.world_position(vertex)
        } else {
            mesh.local_position(vertex)
        };
        let (source, _) = index
            .query(&position.to_array())
            .ok_or_else(|| Error::invalid_parameter("empty spatial index"))?;
        mapping.push(source);
        if !report_batched(progress, vertex + 1, total) {
            return Err(Error::Cancelled);
        }
    }
    Ok(mapping)
}

fn match_by_uv(
    samples: &[VertexSample],
    mesh: &dyn MeshSource,
    progress: &mut dyn ProgressHandler,
) -> Result<Vec<usize>> {
    // A seam vertex contributes one indexed point per UV location it owns.
    let points = samples
        .iter()
        .flat_map(|sample| sample.uvs.iter().map(|uv| (uv.to_array(), sample.vertex)))
        .collect();
    let index = SpatialIndex::<2>::build(points);

    let total = mesh.vertex_count();
    let mut mapping = Vec::with_capacity(total);
    for vertex in 0..total {
        let uvs = mesh.uvs(vertex);
        if uvs.is_empty() {
            return Err(Error::invalid_parameter(format!(
                "destination vertex {vertex} has no UV coordinates"
            )));
        }
        // Try each of the vertex's own UV points and keep the closest
        // candidate overall; on equal distances the earlier point wins.
        let mut best_source = 0;
        let mut best_distance = f32::INFINITY;
        for uv in &uvs {
            let (source, distance) = index
                .query(&uv.to_array())
                .ok_or_else(|| Error::invalid_parameter("empty spatial index"))?;
            if distance < best_distance {
                best_source = source;
                best_distance = distance;
            }
        }
        mapping.push(best_source);
        if !report_batched(progress, vertex + 1, total) {
            return Err(Error::Cancelled);
        }
    }
    Ok(mapping)
}
