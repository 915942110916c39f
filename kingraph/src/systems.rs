//! Graph systems - pure transformations over the graph store
//!
//! Merge runs to completion before layout; neither keeps state between calls.

pub mod edges;
pub mod layout;
pub mod merge;

pub use edges::{edge_path, EdgePath};
pub use layout::{cross_links, layout, layout_with, step_offset, Layout, LayoutEdge};
pub use merge::{merge_snapshot, merge_snapshot_by_id, merge_with, MergeReport};
