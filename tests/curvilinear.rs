mod common;

use amr_stitcher::types::DomainId;
use amr_stitcher::{HierarchyReconstructor, ReconstructOptions};
use common::synthetic_mesh::{curv_domain, BoxWorld};

#[test]
fn curvilinear_nesting_confirms_through_the_oracle() {
    let raw = vec![
        curv_domain(0, &[[0.0, 10.0], [0.0, 10.0]], &[10, 10]),
        curv_domain(1, &[[0.0, 5.0], [0.0, 5.0]], &[20, 20]),
    ];
    let mut backend = BoxWorld::from_raw(&raw);

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let report = reconstructor
        .reconstruct("curved", &raw, &mut backend)
        .expect("structurally valid input");
    let document = &report.document;

    // The box test alone is not definitive here; the oracle must have run.
    assert_eq!(report.trace.overlap.oracle_calls, 1);
    assert_eq!(report.trace.overlap.edges_confirmed, 1);

    assert_eq!(document.level_count, 2);
    let fine = &document.patches[1];
    assert_eq!(fine.domain, DomainId(1));
    assert_eq!(fine.level, 1);

    // Probed zone edge lengths: 1.0 on the parent against 0.25 on the child.
    assert_eq!(document.levels[1].ratio, vec![4, 4]);
    assert_eq!(
        fine.logical_extent.as_ref().expect("resolved extent"),
        &vec![[0, 19], [0, 19]]
    );
}

#[test]
fn pick_misses_leave_a_partial_result_not_an_error() {
    let raw = vec![
        curv_domain(0, &[[0.0, 10.0], [0.0, 10.0]], &[10, 10]),
        curv_domain(1, &[[0.0, 5.0], [0.0, 5.0]], &[20, 20]),
    ];
    let mut backend = BoxWorld::from_raw(&raw);
    backend.force_pick_miss(DomainId(0));

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let report = reconstructor
        .reconstruct("curved-miss", &raw, &mut backend)
        .expect("pick misses never abort the pass");
    let document = &report.document;

    // The hierarchy itself still reconstructs.
    assert_eq!(document.level_count, 2);
    assert_eq!(document.patches[0].children, vec![1]);

    // The ratio probe and the extent corners depended on parent picks.
    assert!(report.trace.ratios.probe_misses > 0);
    let transition = &report.trace.ratios.transitions[0];
    assert_eq!(transition.skipped_edges, 1);
    assert_eq!(report.trace.extents.unresolved, 1);
    assert!(document.patches[1].logical_extent.is_none());
    assert_eq!(
        report.trace.extents.unresolved_domains,
        vec![DomainId(1)]
    );
}

#[test]
fn corner_contact_never_reaches_the_oracle() {
    // Boxes touching at a single corner share no interior; the candidate
    // stage must stay quiet and the backend untouched.
    let raw = vec![
        curv_domain(0, &[[0.0, 4.0], [0.0, 4.0]], &[8, 8]),
        curv_domain(1, &[[4.0, 8.0], [4.0, 8.0]], &[16, 16]),
    ];
    let mut backend = BoxWorld::from_raw(&raw);

    let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
    let report = reconstructor
        .reconstruct("curved-apart", &raw, &mut backend)
        .expect("structurally valid input");

    assert_eq!(report.trace.candidates.edges_proposed, 0);
    assert_eq!(report.trace.overlap.oracle_calls, 0);
    assert_eq!(report.document.level_count, 1);
}
