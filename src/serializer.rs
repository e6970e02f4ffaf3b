//! Weight file serialization
//!
//! Two JSON encodings cover the two workflows:
//!
//! - The **correspondence** document pairs every vertex's weights with its
//!   positional metadata (world/local position, UV footprint) so a
//!   different mesh can be matched against it spatially. Weights are
//!   stored sparsely as non-zero `[influence, weight]` pairs, the dominant
//!   space saving for meshes where most vertices are bound to 1-4 of many
//!   influences.
//! - The **snapshot** document is the dense whole-deformer form: one full
//!   weight row per influence plus the blend-weight array, with no
//!   positional metadata. This is the shape influence reduction operates
//!   on.
//!
//! Both documents also carry the influence order and blend-weight array so
//! a read reproduces the captured record exactly; values pass through
//! serde_json's shortest-round-trip float encoding unmodified.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    attributes::BindAttributes,
    deformer::WeightMatrix,
    error::{Error, Result},
    record::{VertexSample, WeightRecord},
    types::{Vector2D, Vector3D},
};

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    mesh: String,
    #[serde(rename = "skinCluster")]
    skin_cluster: String,
    #[serde(rename = "numVerts")]
    num_verts: usize,
    #[serde(rename = "uvSet")]
    uv_set: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct VertexEntry {
    world: [f32; 3],
    local: [f32; 3],
    // Flattened pairs; more than 2 entries means the vertex owns more
    // than one UV location (a seam vertex).
    uv: Vec<f32>,
    skinning: Vec<(String, f32)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CorrespondenceDoc {
    header: Header,
    #[serde(default)]
    influences: Vec<String>,
    #[serde(rename = "blendWeights", default)]
    blend_weights: Vec<f32>,
    #[serde(rename = "vtxDict")]
    vtx_dict: BTreeMap<String, VertexEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDoc {
    shape: String,
    #[serde(rename = "skinCluster")]
    skin_cluster: String,
    influences: Vec<String>,
    weights: BTreeMap<String, Vec<f32>>,
    #[serde(rename = "blendWeights")]
    blend_weights: Vec<f32>,
    #[serde(default)]
    attributes: BindAttributes,
}

/// A correspondence document read back from a file
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondenceData {
    /// The reconstructed weight record
    pub record: WeightRecord,
    /// Positional metadata per vertex, in vertex order
    pub samples: Vec<VertexSample>,
    /// Name of the UV set the stored UV coordinates came from
    pub uv_set: String,
}

/// Write a record and its positional metadata as a correspondence document
///
/// `samples` must cover every record vertex exactly once.
pub fn write_correspondence<W: Write>(
    record: &WeightRecord,
    samples: &[VertexSample],
    uv_set: &str,
    writer: W,
) -> Result<()> {
    if samples.len() != record.vertex_count() {
        return Err(Error::invalid_parameter(format!(
            "{} samples given for {} record vertices",
            samples.len(),
            record.vertex_count()
        )));
    }

    let mut vtx_dict = BTreeMap::new();
    for sample in samples {
        if sample.vertex >= record.vertex_count() {
            return Err(Error::invalid_parameter(format!(
                "sample references vertex {} outside the record",
                sample.vertex
            )));
        }
        let entry = VertexEntry {
            world: sample.world.to_array(),
            local: sample.local.to_array(),
            uv: sample.uvs.iter().flat_map(|uv| uv.to_array()).collect(),
            skinning: record
                .vertex_weights(sample.vertex)
                .into_iter()
                .map(|(name, weight)| (name.to_string(), weight))
                .collect(),
        };
        if vtx_dict.insert(sample.vertex.to_string(), entry).is_some() {
            return Err(Error::invalid_parameter(format!(
                "vertex {} sampled twice",
                sample.vertex
            )));
        }
    }

    let doc = CorrespondenceDoc {
        header: Header {
            mesh: record.shape().to_string(),
            skin_cluster: record.skin_cluster().to_string(),
            num_verts: record.vertex_count(),
            uv_set: uv_set.to_string(),
        },
        influences: record.influences().to_vec(),
        blend_weights: record.blend_weights().to_vec(),
        vtx_dict,
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Read a correspondence document
///
/// Malformed input is rejected with [`Error::StructuralFile`]: JSON
/// errors, a vertex table that disagrees with the declared count,
/// unparsable or out-of-range vertex keys, odd-length UV arrays, or
/// skinning entries naming influences outside the declared order.
pub fn read_correspondence<R: Read>(reader: R) -> Result<CorrespondenceData> {
    let doc: CorrespondenceDoc = serde_json::from_reader(reader)?;
    let num_verts = doc.header.num_verts;

    if doc.vtx_dict.len() != num_verts {
        return Err(Error::structural_file(format!(
            "header declares {} vertices but the table holds {}",
            num_verts,
            doc.vtx_dict.len()
        )));
    }

    // Vertex keys are decimal strings; re-key by index so the table can be
    // walked in vertex order regardless of lexicographic map order.
    let mut entries: Vec<Option<VertexEntry>> = (0..num_verts).map(|_| None).collect();
    for (key, entry) in doc.vtx_dict {
        let vertex: usize = key
            .parse()
            .map_err(|_| Error::structural_file(format!("unparsable vertex key {key:?}")))?;
        if vertex >= num_verts {
            return Err(Error::structural_file(format!(
                "vertex key {vertex} is outside the declared count {num_verts}"
            )));
        }
        entries[vertex] = Some(entry);
    }

    let influences = if doc.influences.is_empty() {
        // Older files carry no influence list; fall back to first
        // appearance in vertex order.
        let mut order = Vec::new();
        for entry in entries.iter().flatten() {
            for (name, _) in &entry.skinning {
                if !order.contains(name) {
                    order.push(name.clone());
                }
            }
        }
        order
    } else {
        doc.influences
    };

    let blend_weights = if doc.blend_weights.is_empty() {
        vec![0.0; num_verts]
    } else if doc.blend_weights.len() == num_verts {
        doc.blend_weights
    } else {
        return Err(Error::structural_file(format!(
            "{} blend weights for {} vertices",
            doc.blend_weights.len(),
            num_verts
        )));
    };

    let mut rows: Vec<Vec<f32>> = vec![vec![0.0; num_verts]; influences.len()];
    let mut samples = Vec::with_capacity(num_verts);
    for (vertex, slot) in entries.into_iter().enumerate() {
        let entry = slot.ok_or_else(|| {
            Error::structural_file(format!("vertex {vertex} is missing from the table"))
        })?;

        if entry.uv.is_empty() || entry.uv.len() % 2 != 0 {
            return Err(Error::structural_file(format!(
                "vertex {vertex} has a UV array of length {}",
                entry.uv.len()
            )));
        }
        let uvs = entry
            .uv
            .chunks_exact(2)
            .map(|pair| Vector2D::new(pair[0], pair[1]))
            .collect();

        for (name, weight) in &entry.skinning {
            let row = influences.iter().position(|n| n == name).ok_or_else(|| {
                Error::structural_file(format!(
                    "vertex {vertex} is skinned to undeclared influence {name}"
                ))
            })?;
            rows[row][vertex] = *weight;
        }

        samples.push(VertexSample::new(
            Vector3D::from_array(entry.world),
            Vector3D::from_array(entry.local),
            uvs,
            vertex,
        ));
    }

    let matrix = WeightMatrix::new(influences, rows)?;
    let record = WeightRecord::new(
        doc.header.mesh,
        doc.header.skin_cluster,
        matrix,
        blend_weights,
        BindAttributes::new(),
    )?;

    Ok(CorrespondenceData {
        record,
        samples,
        uv_set: doc.header.uv_set,
    })
}

/// Write a record as a dense snapshot document
pub fn write_snapshot<W: Write>(record: &WeightRecord, writer: W) -> Result<()> {
    let mut weights = BTreeMap::new();
    for name in record.influences() {
        if let Some(row) = record.influence_weights(name) {
            weights.insert(name.clone(), row.to_vec());
        }
    }

    let doc = SnapshotDoc {
        shape: record.shape().to_string(),
        skin_cluster: record.skin_cluster().to_string(),
        influences: record.influences().to_vec(),
        weights,
        blend_weights: record.blend_weights().to_vec(),
        attributes: record.bind_attributes().clone(),
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Read a dense snapshot document
pub fn read_snapshot<R: Read>(reader: R) -> Result<WeightRecord> {
    let doc: SnapshotDoc = serde_json::from_reader(reader)?;

    if doc.influences.len() != doc.weights.len() {
        return Err(Error::structural_file(format!(
            "{} influences declared but {} weight rows stored",
            doc.influences.len(),
            doc.weights.len()
        )));
    }

    let mut rows = Vec::with_capacity(doc.influences.len());
    for name in &doc.influences {
        let row = doc.weights.get(name).ok_or_else(|| {
            Error::structural_file(format!("no weight row for influence {name}"))
        })?;
        if row.len() != doc.blend_weights.len() {
            return Err(Error::structural_file(format!(
                "influence {name} has {} weights for {} vertices",
                row.len(),
                doc.blend_weights.len()
            )));
        }
        rows.push(row.clone());
    }

    let matrix = WeightMatrix::new(doc.influences, rows)?;
    WeightRecord::new(
        doc.shape,
        doc.skin_cluster,
        matrix,
        doc.blend_weights,
        doc.attributes,
    )
}

/// Write a correspondence document to a file path
pub fn write_correspondence_file<P: AsRef<Path>>(
    record: &WeightRecord,
    samples: &[VertexSample],
    uv_set: &str,
    path: P,
) -> Result<()> {
    let file = File::create(path)?;
    write_correspondence(record, samples, uv_set, BufWriter::new(file))
}

/// Read a correspondence document from a file path
pub fn read_correspondence_file<P: AsRef<Path>>(path: P) -> Result<CorrespondenceData> {
    let file = File::open(path)?;
    read_correspondence(BufReader::new(file))
}

/// Write a snapshot document to a file path
pub fn write_snapshot_file<P: AsRef<Path>>(record: &WeightRecord, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_snapshot(record, BufWriter::new(file))
}

/// Read a snapshot document from a file path
pub fn read_snapshot_file<P: AsRef<Path>>(path: P) -> Result<WeightRecord> {
    let file = File::open(path)?;
    read_snapshot(BufReader::new(file))
}
