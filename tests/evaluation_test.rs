use approx::assert_relative_eq;
use instance_linker::{
    Error, LinkInfo, LinkerConfig, MaskStack, MaskStackBuilder, OverlapMode, TimeSeriesLinker,
    TrackingEvaluation, TrackingInfo, confusion, evaluate_link, mismatch_rate,
};
use ndarray::array;

/// Two leaves: one steady, one that drifts out of reach after frame 1.
fn frames() -> Vec<MaskStack> {
    vec![
        MaskStackBuilder::new(30, 30).rect(0, 0, 8, 8).rect(15, 15, 25, 25).build(),
        MaskStackBuilder::new(30, 30).rect(0, 0, 8, 8).rect(16, 16, 26, 26).build(),
        MaskStackBuilder::new(30, 30).rect(0, 1, 8, 9).rect(5, 20, 15, 30).build(),
    ]
}

fn linked_prediction() -> (LinkInfo, TrackingInfo) {
    let config = LinkerConfig::new(OverlapMode::Iou, 0.3).unwrap();
    let linked = TimeSeriesLinker::new(config).unwrap().link(&frames()).unwrap();
    let ti = linked.tracking_info();
    (linked.link_info, ti)
}

#[test]
fn test_self_evaluation_is_perfect() {
    let (li, ti) = linked_prediction();
    let eval = TrackingEvaluation::evaluate(&li, &ti, &li, &ti).unwrap();

    assert_relative_eq!(eval.link.score, 1.0);
    assert_eq!(eval.mismatch.unmatched_rate, 0.0);
    assert_eq!(eval.mismatch.fake_new_rate, 0.0);
    assert_relative_eq!(eval.confusion.track_score, 1.0);
}

#[test]
fn test_against_ground_truth() {
    let (li, ti) = linked_prediction();

    // The drifting leaf is broken into two predicted tracks.
    assert_eq!(li.to_sentinel(), vec![vec![0, 1], vec![0, -1]]);
    assert_eq!(ti.num_tracks(), 3);

    // Ground truth keeps it as one object throughout.
    let gt_li = LinkInfo::from_sentinel(vec![vec![0, 1], vec![0, 1]], &[2, 2, 2]).unwrap();
    let gt_ti = TrackingInfo::from_sentinel(array![[0, 1], [0, 1], [0, 1]]).unwrap();

    let link = evaluate_link(&li, &gt_li).unwrap();
    assert_eq!(link.num_insts, vec![2, 2]);
    assert_eq!(link.num_matched, vec![2, 1]);
    assert_relative_eq!(link.score, 0.75);

    let rate = mismatch_rate(&ti, &gt_ti);
    assert_eq!((rate.n_gt, rate.n_pred), (2, 3));
    assert_relative_eq!(rate.fake_new_rate, 0.5);
    assert_eq!(rate.unmatched_rate, 0.0);

    let eval = confusion(&ti, &gt_ti).unwrap();
    assert_eq!(eval.confusion.dim(), (2, 3));
    assert_eq!(eval.track_match, vec![Some(0), Some(1)]);
    assert_eq!(eval.num_matched, vec![3, 2]);
    assert_relative_eq!(eval.track_rate[1], 2.0 / 3.0);
    assert_relative_eq!(eval.track_score, (1.0 + 2.0 / 3.0) / 2.0);
}

#[test]
fn test_evaluation_shape_checks() {
    let (li, ti) = linked_prediction();
    let short_li = LinkInfo::from_sentinel(vec![vec![0, 1]], &[2, 2]).unwrap();
    let short_ti = TrackingInfo::from_sentinel(array![[0], [0]]).unwrap();

    assert!(matches!(
        TrackingEvaluation::evaluate(&li, &ti, &short_li, &ti),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(
        TrackingEvaluation::evaluate(&li, &ti, &li, &short_ti),
        Err(Error::ShapeMismatch { .. })
    ));
}
