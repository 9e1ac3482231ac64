use instance_linker::{
    LinkInfo, LinkSeries, LinkerConfig, MaskStack, MaskStackBuilder, OverlapMode, TimeSeriesLinker,
    TrackId,
};

fn linker(mode: OverlapMode, threshold: f64) -> TimeSeriesLinker {
    TimeSeriesLinker::new(LinkerConfig::new(mode, threshold).unwrap()).unwrap()
}

#[test]
fn test_emergence_and_disappearance() {
    // Frame 0: A, B
    let frame0 = MaskStackBuilder::new(40, 40)
        .rect(0, 0, 10, 10) // A
        .rect(20, 20, 25, 25) // B
        .build();
    // Frame 1: A shrunk to IoU 0.8, and a new object C away from everything
    let frame1 = MaskStackBuilder::new(40, 40)
        .rect(0, 0, 10, 8)
        .rect(0, 30, 5, 35)
        .build();

    let linked = linker(OverlapMode::Iou, 0.2).link(&[frame0, frame1]).unwrap();

    assert_eq!(linked.link_info.transition(0), &[Some(0), None]);

    let tracks = linked.series.tracks();
    assert_eq!(tracks.len(), 3);
    // A persists through both frames
    assert_eq!(tracks[0].lifetime, vec![Some(0), Some(0)]);
    // B ends at frame 0
    assert_eq!(tracks[1].lifetime, vec![Some(1), None]);
    assert!(tracks[1].terminates_at(0));
    // C emerges at frame 1
    assert_eq!(tracks[2].emergence_frame, 1);
    assert_eq!(tracks[2].lifetime, vec![None, Some(1)]);
}

#[test]
fn test_one_frame_occlusion_is_bridged() {
    let x = (0, 0, 8, 8);
    let z = (20, 20, 30, 30);
    let frame = |rects: &[(usize, usize, usize, usize)]| {
        rects
            .iter()
            .fold(MaskStackBuilder::new(32, 32), |b, &(y0, x0, y1, x1)| {
                b.rect(y0, x0, y1, x1)
            })
            .build()
    };

    let frames = vec![
        frame(&[z, x]),
        frame(&[x, z]),
        frame(&[z]),
        frame(&[z, x]), // Y reappears where X was
    ];

    let linked = linker(OverlapMode::Iou, 0.5).link(&frames).unwrap();
    let series = &linked.series;

    assert_eq!(series.len(), 2);
    let z_track = &series.tracks()[0];
    let x_track = &series.tracks()[1];
    assert_eq!(z_track.lifetime, vec![Some(0), Some(1), Some(0), Some(0)]);
    assert_eq!(x_track.lifetime, vec![Some(1), Some(0), None, Some(1)]);
    assert_eq!(x_track.bridged_gaps, vec![2]);

    // Ids are stable: the absorbed track's id is simply gone.
    assert_eq!(x_track.id, TrackId(1));
    assert!(series.get(TrackId(2)).is_none());
    assert_eq!(series.display_index(TrackId(1)), Some(1));
}

#[test]
fn test_repeated_occlusions_chain_into_one_track() {
    let square = MaskStackBuilder::new(16, 16).rect(4, 4, 10, 10).build();
    let empty = MaskStack::empty(16, 16);
    let frames = vec![
        square.clone(),
        empty.clone(),
        square.clone(),
        empty,
        square,
    ];

    let linked = linker(OverlapMode::Iou, 0.5).link(&frames).unwrap();
    let tracks = linked.series.tracks();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, TrackId(0));
    assert_eq!(tracks[0].lifetime, vec![Some(0), None, Some(0), None, Some(0)]);
    assert_eq!(tracks[0].bridged_gaps, vec![1, 3]);
    assert_eq!(linked.tracking_info().num_tracks(), 1);
}

#[test]
fn test_disjoint_frames_produce_no_links() {
    let frame0 = MaskStackBuilder::new(20, 20)
        .rect(0, 0, 5, 5)
        .rect(0, 10, 5, 15)
        .build();
    let frame1 = MaskStackBuilder::new(20, 20)
        .rect(10, 0, 15, 5)
        .rect(10, 10, 15, 15)
        .build();

    for mode in [OverlapMode::Iou, OverlapMode::Ios] {
        let links = linker(mode, 0.0).link_pair(&frame0, &frame1).unwrap();
        assert_eq!(links, vec![None, None]);
    }
}

#[test]
fn test_threshold_monotonicity_and_injectivity() {
    let frame0 = MaskStackBuilder::new(30, 30)
        .rect(0, 0, 10, 10)
        .rect(0, 12, 10, 22)
        .rect(15, 0, 25, 10)
        .rect(15, 15, 20, 20)
        .build();
    let frame1 = MaskStackBuilder::new(30, 30)
        .rect(1, 1, 11, 11)
        .rect(0, 16, 10, 26)
        .rect(20, 0, 30, 10)
        .rect(0, 5, 10, 15)
        .build();

    let mut previous_unlinked = 0;
    for step in 0..=10 {
        let threshold = step as f64 / 10.0;
        let links = linker(OverlapMode::Iou, threshold)
            .link_pair(&frame0, &frame1)
            .unwrap();

        let mut targets: Vec<usize> = links.iter().flatten().copied().collect();
        let linked = targets.len();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), linked, "duplicate target at {threshold}");

        let unlinked = links.iter().filter(|l| l.is_none()).count();
        assert!(unlinked >= previous_unlinked, "fewer -1 entries at {threshold}");
        previous_unlinked = unlinked;
    }
    assert_eq!(previous_unlinked, 4);
}

#[test]
fn test_lineage_round_trip() {
    let frames: Vec<MaskStack> = (0..5)
        .map(|t| {
            MaskStackBuilder::new(40, 40)
                .rect(t, 0, t + 10, 10)
                .rect(20, t * 4, 30, t * 4 + 6)
                .build()
        })
        .collect();

    let linked = linker(OverlapMode::Iou, 0.3).link(&frames).unwrap();
    let ti = linked.tracking_info();
    let rebuilt = LinkInfo::from_tracking_info(&ti, &linked.num_insts).unwrap();
    assert_eq!(rebuilt, linked.link_info);

    let unbridged = LinkSeries::build(&linked.link_info, &linked.num_insts).unwrap();
    let rebuilt =
        LinkInfo::from_tracking_info(&unbridged.tracking_info(), &linked.num_insts).unwrap();
    assert_eq!(rebuilt, linked.link_info);
}

#[test]
fn test_ios_rejects_empty_reference_mask() {
    let frame0 = MaskStackBuilder::new(10, 10).pixels(&[]).build();
    let frame1 = MaskStackBuilder::new(10, 10).rect(0, 0, 3, 3).build();

    let result = linker(OverlapMode::Ios, 0.5).link(&[frame0, frame1]);
    assert!(matches!(
        result,
        Err(instance_linker::Error::DegenerateInput(_))
    ));
}
