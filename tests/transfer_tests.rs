//! End-to-end tests for the capture → file → resynthesis pipeline

use approx::assert_relative_eq;
use skin_weights::{
    MemoryDeformer, MemoryMesh, SkinDeformer, Strategy, TransferSpec, apply_weights, capture_weights, reduce,
    read_snapshot, sample_vertices, write_snapshot,
    progress::{ClosureProgressHandler, NullProgressHandler},
    types::{Vector2D, Vector3D},
};

fn skinned_source() -> (MemoryDeformer, MemoryMesh) {
    let mut mesh = MemoryMesh::new("bodyShape", "map1");
    for i in 0..3 {
        mesh.push_simple_vertex(
            Vector3D::new(i as f32 * 2.0, 0.0, 0.0),
            Vector2D::new(i as f32 * 0.5, 0.5),
        );
    }

    let mut deformer = MemoryDeformer::new("skinCluster1", 3);
    deformer
        .bind_influence("jointA", vec![0.5, 1.0, 0.0])
        .unwrap();
    deformer
        .bind_influence("jointB", vec![0.5, 0.0, 1.0])
        .unwrap();
    deformer.attributes_mut().set_int("maxInfluences", 4);
    (deformer, mesh)
}

#[test]
fn test_capture_write_read_resynthesize_scenario() {
    let (source_deformer, source_mesh) = skinned_source();
    let record = capture_weights(&source_deformer, &source_mesh).unwrap();

    // Through the file and back.
    let mut file = Vec::new();
    write_snapshot(&record, &mut file).unwrap();
    let restored = read_snapshot(file.as_slice()).unwrap();
    assert_eq!(restored, record);

    // Onto an identically indexed destination with index-identity.
    let mut destination = MemoryDeformer::new("skinCluster2", 3);
    destination.bind_influence("jointA", vec![0.0; 3]).unwrap();
    destination.bind_influence("jointB", vec![0.0; 3]).unwrap();

    apply_weights(
        &restored,
        None,
        &mut destination,
        &source_mesh,
        Strategy::Identity,
        &mut NullProgressHandler,
    )
    .unwrap();

    let applied = destination.weight_matrix().unwrap();
    let original = source_deformer.weight_matrix().unwrap();
    assert_eq!(applied, original);
}

#[test]
fn test_sum_invariant_holds_through_reduction() {
    let mut deformer = MemoryDeformer::new("skinCluster1", 4);
    deformer
        .bind_influence("hand", vec![0.6, 0.2, 1.0, 0.0])
        .unwrap();
    deformer
        .bind_influence("finger1", vec![0.3, 0.5, 0.0, 0.7])
        .unwrap();
    deformer
        .bind_influence("finger2", vec![0.1, 0.3, 0.0, 0.3])
        .unwrap();

    let mut mesh = MemoryMesh::new("handShape", "map1");
    for i in 0..4 {
        mesh.push_simple_vertex(Vector3D::new(i as f32, 0.0, 0.0), Vector2D::new(0.0, 0.0));
    }

    let mut record = capture_weights(&deformer, &mesh).unwrap();
    record.validate().unwrap();

    let before_hand: Vec<f32> = record.influence_weights("hand").unwrap().to_vec();
    let before_f1: Vec<f32> = record.influence_weights("finger1").unwrap().to_vec();
    let before_f2: Vec<f32> = record.influence_weights("finger2").unwrap().to_vec();

    let mut spec = TransferSpec::new();
    spec.fold("hand", ["finger1", "finger2"]);
    reduce(&mut record, &spec).unwrap();

    record.validate().unwrap();
    assert_eq!(record.influences(), ["hand"]);
    let after = record.influence_weights("hand").unwrap();
    for vertex in 0..4 {
        assert_relative_eq!(
            after[vertex],
            before_hand[vertex] + before_f1[vertex] + before_f2[vertex]
        );
    }
}

#[test]
fn test_reduced_record_resynthesizes_onto_lod() {
    let (source_deformer, source_mesh) = skinned_source();
    let mut record = capture_weights(&source_deformer, &source_mesh).unwrap();

    let mut spec = TransferSpec::new();
    spec.fold("jointA", ["jointB"]);
    reduce(&mut record, &spec).unwrap();

    // The LOD deformer only carries the retained joint.
    let mut lod = MemoryDeformer::new("skinClusterLod", 3);
    lod.bind_influence("jointA", vec![0.0; 3]).unwrap();

    apply_weights(
        &record,
        None,
        &mut lod,
        &source_mesh,
        Strategy::Identity,
        &mut NullProgressHandler,
    )
    .unwrap();

    for vertex in 0..3 {
        assert_eq!(lod.weight("jointA", vertex), 1.0);
    }
}

#[test]
fn test_spatial_transfer_onto_denser_mesh() {
    let (source_deformer, source_mesh) = skinned_source();
    let record = capture_weights(&source_deformer, &source_mesh).unwrap();
    let samples = sample_vertices(&source_mesh, &mut NullProgressHandler).unwrap();

    // A destination with twice the vertices along the same span; each
    // destination vertex inherits its nearest source vertex's weights.
    let mut mesh = MemoryMesh::new("bodyShapeDense", "map1");
    for i in 0..6 {
        mesh.push_simple_vertex(
            Vector3D::new(i as f32 * 0.8, 0.0, 0.0),
            Vector2D::new(i as f32 * 0.2, 0.5),
        );
    }
    let mut destination = MemoryDeformer::new("skinCluster2", 6);
    destination.bind_influence("jointA", vec![0.0; 6]).unwrap();
    destination.bind_influence("jointB", vec![0.0; 6]).unwrap();

    apply_weights(
        &record,
        Some(&samples),
        &mut destination,
        &mesh,
        Strategy::WorldPosition,
        &mut NullProgressHandler,
    )
    .unwrap();

    // x = 0.0 is nearest source vertex 0; x = 4.0 is nearest source
    // vertex 2 at x = 4.0.
    assert_eq!(destination.weight("jointA", 0), 0.5);
    assert_eq!(destination.weight("jointB", 5), 1.0);

    // Every destination vertex still sums to one.
    let matrix = destination.weight_matrix().unwrap();
    for vertex in 0..6 {
        let sum: f32 = matrix.rows().iter().map(|row| row[vertex]).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_cancellation_leaves_destination_untouched() {
    let (source_deformer, source_mesh) = skinned_source();
    let record = capture_weights(&source_deformer, &source_mesh).unwrap();

    let mut destination = MemoryDeformer::new("skinCluster2", 3);
    destination.bind_influence("jointA", vec![0.0; 3]).unwrap();
    destination.bind_influence("jointB", vec![0.0; 3]).unwrap();

    let mut cancelling = ClosureProgressHandler::new(|_, _| false);
    let result = apply_weights(
        &record,
        None,
        &mut destination,
        &source_mesh,
        Strategy::Identity,
        &mut cancelling,
    );

    assert!(result.is_err());
    for vertex in 0..3 {
        assert_eq!(destination.weight("jointA", vertex), 0.0);
        assert_eq!(destination.weight("jointB", vertex), 0.0);
    }
}

#[test]
fn test_empty_capture_round_trips() {
    let mut mesh = MemoryMesh::new("propShape", "map1");
    mesh.push_simple_vertex(Vector3D::ZERO, Vector2D::ZERO);
    let deformer = MemoryDeformer::new("skinCluster1", 1);

    let record = capture_weights(&deformer, &mesh).unwrap();
    assert!(record.is_empty());

    let mut file = Vec::new();
    write_snapshot(&record, &mut file).unwrap();
    let restored = read_snapshot(file.as_slice()).unwrap();
    assert_eq!(restored, record);
}
