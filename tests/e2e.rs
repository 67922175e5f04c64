mod common;

use amr_stitcher::types::DomainId;
use amr_stitcher::{HierarchyReconstructor, ReconstructOptions};
use common::synthetic_mesh::{rect_domain, BoxWorld};

#[test]
fn two_level_nesting_reconstructs_fully() {
    let raw = vec![
        rect_domain(0, &[[0.0, 10.0], [0.0, 10.0]], &[10, 10]),
        rect_domain(1, &[[0.0, 5.0], [0.0, 5.0]], &[20, 20]),
    ];
    let mut backend = BoxWorld::from_raw(&raw);

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let report = reconstructor
        .reconstruct("nested", &raw, &mut backend)
        .expect("structurally valid input");
    let document = &report.document;

    assert_eq!(document.dims, 2);
    assert_eq!(document.level_count, 2);
    assert_eq!(document.patch_count, 2);

    let coarse = &document.patches[0];
    let fine = &document.patches[1];
    assert_eq!(coarse.domain, DomainId(0));
    assert_eq!(fine.domain, DomainId(1));
    assert!((coarse.rank - 1.0).abs() < 1e-12);
    assert!((fine.rank - 0.0625).abs() < 1e-12);
    assert_eq!(coarse.level, 0);
    assert_eq!(fine.level, 1);
    assert_eq!(coarse.children, vec![1]);
    assert!(fine.children.is_empty());

    assert_eq!(document.levels[0].ratio, vec![1, 1]);
    assert_eq!(document.levels[1].ratio, vec![2, 2]);
    assert_eq!(document.levels[0].patches, vec![0]);
    assert_eq!(document.levels[1].patches, vec![1]);

    assert_eq!(
        coarse.logical_extent.as_ref().expect("coarse extent"),
        &vec![[0, 9], [0, 9]]
    );
    assert_eq!(
        fine.logical_extent.as_ref().expect("fine extent"),
        &vec![[0, 19], [0, 19]]
    );

    // No oracle involvement for purely rectilinear input.
    assert_eq!(report.trace.overlap.oracle_calls, 0);
    assert_eq!(report.trace.extents.unresolved, 0);
}

#[test]
fn zero_overlap_mesh_is_a_flat_forest() {
    let raw = vec![
        rect_domain(0, &[[0.0, 1.0], [0.0, 1.0]], &[8, 8]),
        rect_domain(1, &[[5.0, 6.0], [0.0, 1.0]], &[8, 8]),
        rect_domain(2, &[[0.0, 1.0], [5.0, 6.0]], &[8, 8]),
    ];
    let mut backend = BoxWorld::from_raw(&raw);

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let report = reconstructor
        .reconstruct("scattered", &raw, &mut backend)
        .expect("structurally valid input");
    let document = &report.document;

    assert_eq!(document.level_count, 1);
    assert_eq!(document.levels[0].patches, vec![0, 1, 2]);
    assert!(document.patches.iter().all(|p| p.level == 0));
    assert!(document.patches.iter().all(|p| p.children.is_empty()));
    assert_eq!(report.trace.candidates.edges_proposed, 0);
}

#[test]
fn deep_nesting_keeps_only_immediate_children() {
    // Three levels; the innermost patch overlaps both ancestors, but must
    // only ever appear under the middle one.
    let raw = vec![
        rect_domain(0, &[[0.0, 16.0], [0.0, 16.0]], &[16, 16]),
        rect_domain(1, &[[0.0, 8.0], [0.0, 8.0]], &[32, 32]),
        rect_domain(2, &[[0.0, 4.0], [0.0, 4.0]], &[64, 64]),
    ];
    let mut backend = BoxWorld::from_raw(&raw);

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let report = reconstructor
        .reconstruct("three-deep", &raw, &mut backend)
        .expect("structurally valid input");
    let document = &report.document;

    assert_eq!(document.level_count, 3);
    assert_eq!(document.patches[0].children, vec![1]);
    assert_eq!(document.patches[1].children, vec![2]);
    assert!(document.patches[2].children.is_empty());
    assert_eq!(report.trace.reduction.edges_dropped_transitive, 1);
}

#[test]
fn repeated_runs_serialize_identically() {
    let raw = vec![
        rect_domain(0, &[[0.0, 10.0], [0.0, 10.0]], &[10, 10]),
        rect_domain(1, &[[0.0, 5.0], [0.0, 5.0]], &[20, 20]),
        rect_domain(2, &[[5.0, 10.0], [5.0, 10.0]], &[20, 20]),
    ];

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let mut backend = BoxWorld::from_raw(&raw);
    let first = reconstructor
        .reconstruct("stable", &raw, &mut backend)
        .expect("structurally valid input");
    let mut backend = BoxWorld::from_raw(&raw);
    let second = reconstructor
        .reconstruct("stable", &raw, &mut backend)
        .expect("structurally valid input");

    let first_json = first.document.to_json().expect("serializable document");
    let second_json = second.document.to_json().expect("serializable document");
    assert_eq!(first_json, second_json);
}
