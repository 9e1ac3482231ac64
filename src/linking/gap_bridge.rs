//! Reconnection of tracks separated by a single missing frame.

use tracing::debug;

use crate::error::{Error, Result};
use crate::linking::lineage::LinkSeries;
use crate::linking::linker::LinkerConfig;
use crate::linking::mask::MaskStack;
use crate::linking::matching::link_by_weights;
use crate::linking::overlap::overlap_matrix;
use crate::linking::track::TrackId;

/// Join tracks that end at frame `t0` with tracks that emerge at `t0 + 2`.
///
/// For every `t0`, the last masks of the ending tracks are matched against the
/// first masks of the emerging tracks with the same mode, threshold and
/// pruned assignment used for frame-to-frame linking. A matched emerging
/// track is folded into the ending one and removed; frame `t0 + 1` stays
/// absent in the merged lifetime. Tracks separated by two or more missing
/// frames are left apart.
///
/// Frames are processed in ascending order, so a track extended here can be
/// bridged again at a later gap.
pub fn bridge_gaps(
    mut series: LinkSeries,
    frames: &[MaskStack],
    config: &LinkerConfig,
) -> Result<LinkSeries> {
    if frames.len() != series.num_frames() {
        return Err(Error::ShapeMismatch {
            what: "frame count",
            expected: series.num_frames(),
            got: frames.len(),
        });
    }

    let mut bridged = 0usize;
    for t0 in 0..frames.len().saturating_sub(2) {
        let t2 = t0 + 2;
        let (ending_ids, ending_insts) = endpoints(series.terminating_at(t0).map(|track| {
            (track.id, track.lifetime[t0])
        }));
        let (emerging_ids, emerging_insts) = endpoints(series.emerging_at(t2).map(|track| {
            (track.id, track.lifetime[t2])
        }));
        if ending_ids.is_empty() || emerging_ids.is_empty() {
            continue;
        }

        let before = frames[t0].select(&ending_insts)?;
        let after = frames[t2].select(&emerging_insts)?;
        let weights = overlap_matrix(config.mode, &before, &after)?;
        let links = link_by_weights(&weights, config.threshold);

        for (row, col) in links
            .into_iter()
            .enumerate()
            .filter_map(|(row, col)| Some((row, col?)))
        {
            debug!(
                survivor = %ending_ids[row],
                absorbed = %emerging_ids[col],
                gap = t0 + 1,
                overlap = weights[[row, col]],
                "bridging one-frame gap"
            );
            series.splice(ending_ids[row], emerging_ids[col], t2)?;
            bridged += 1;
        }
    }

    debug!(bridged, tracks = series.len(), "gap bridging done");
    Ok(series)
}

fn endpoints(
    items: impl Iterator<Item = (TrackId, Option<usize>)>,
) -> (Vec<TrackId>, Vec<usize>) {
    items
        .filter_map(|(id, inst)| Some((id, inst?)))
        .unzip()
}
