mod gap_bridge;
mod lineage;
mod link_info;
mod linker;
mod mask;
mod matching;
mod overlap;
mod track;

pub use gap_bridge::bridge_gaps;
pub use lineage::{LinkSeries, TrackingInfo};
pub use link_info::LinkInfo;
pub use linker::{LinkedSeries, LinkerConfig, TimeSeriesLinker};
pub use mask::MaskStack;
pub use matching::{AssignmentResult, link_by_weights, max_weight_assignment};
pub use overlap::{OverlapMode, Overlaps, overlap_matrix};
pub use track::{Track, TrackId};
