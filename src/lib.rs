//! # Skin Weights
//!
//! Skin-weight capture, transfer, and resynthesis for skeletal meshes.
//!
//! This crate snapshots how a deformed mesh's vertices are influenced by
//! a skeleton, serializes that snapshot to a portable file, and re-applies
//! it to a mesh whose vertex indexing may have changed — a different
//! import order, rebuilt topology, or a level-of-detail variant with
//! fewer joints.
//!
//! ## Features
//!
//! - **Capture**: bulk snapshot of a deformer's weight matrix, blend
//!   weights, and bind attributes into a [`WeightRecord`]
//! - **Portable files**: sparse per-vertex correspondence documents and
//!   dense whole-deformer snapshots, both JSON
//! - **Spatial matching**: k-d tree nearest-neighbor correspondence over
//!   world space, local space, or UV space, with seam handling
//! - **Influence reduction**: fold removed joints' weight mass into
//!   retained joints without breaking the sum-to-one invariant
//! - **Host-agnostic**: the live deformer and mesh sit behind traits;
//!   in-memory reference implementations are included
//!
//! ## Quick Start
//!
//! ```rust
//! use skin_weights::{
//!     MemoryDeformer, MemoryMesh, Strategy, apply_weights, capture_weights,
//!     progress::NullProgressHandler,
//!     types::{Vector2D, Vector3D},
//! };
//!
//! # fn main() -> skin_weights::Result<()> {
//! // A two-vertex mesh skinned to one joint.
//! let mut mesh = MemoryMesh::new("bodyShape", "map1");
//! mesh.push_simple_vertex(Vector3D::new(0.0, 0.0, 0.0), Vector2D::new(0.0, 0.0));
//! mesh.push_simple_vertex(Vector3D::new(1.0, 0.0, 0.0), Vector2D::new(1.0, 0.0));
//!
//! let mut source = MemoryDeformer::new("skinCluster1", 2);
//! source.bind_influence("spine", vec![1.0, 1.0])?;
//!
//! let record = capture_weights(&source, &mesh)?;
//!
//! // Re-apply onto an identically indexed destination.
//! let mut destination = MemoryDeformer::new("skinCluster2", 2);
//! apply_weights(
//!     &record,
//!     None,
//!     &mut destination,
//!     &mesh,
//!     Strategy::Identity,
//!     &mut NullProgressHandler,
//! )?;
//!
//! assert_eq!(destination.weight("spine", 1), 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Data flows one way for export (deformer → [`WeightRecord`] → file) and
//! the reverse for import (file → [`WeightRecord`] → spatial match →
//! deformer), with [`reduce`](crate::reduce::reduce) operating purely on
//! an in-memory record between those stages. The destination deformer is
//! mutated only by a single bulk write at the end of resynthesis.

#![warn(missing_docs)]

// Re-export common types for convenience
pub use crate::{
    attributes::{AttributeValue, BindAttributes},
    capture::{capture_weights, sample_vertices},
    deformer::{MemoryDeformer, SkinDeformer, WeightMatrix},
    error::{Error, Result},
    kdtree::SpatialIndex,
    mesh::{MemoryMesh, MeshSource},
    record::{VertexSample, WeightRecord},
    reduce::{TransferSpec, reduce},
    resynth::{Strategy, apply_weights},
    serializer::{
        CorrespondenceData, read_correspondence, read_correspondence_file, read_snapshot,
        read_snapshot_file, write_correspondence, write_correspondence_file, write_snapshot,
        write_snapshot_file,
    },
};

// Core modules
pub mod error;
pub mod types;

// Data model modules
pub mod attributes;
pub mod record;

// Host abstraction modules
pub mod deformer;
pub mod mesh;

// Pipeline modules
pub mod capture;
pub mod kdtree;
pub mod reduce;
pub mod resynth;
pub mod serializer;

// Support modules
pub mod progress;
pub mod utils;
