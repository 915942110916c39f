//! Merge System
//!
//! Reconciles a name-less engine snapshot into the graph store. The engine
//! owns structure (ids, sexes of new people, relations); the store owns
//! display names. A merge never lets a bad snapshot half-apply: every tag is
//! converted before the store is touched.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::MergeStrategy;
use crate::error::Result;
use crate::model::{GraphStore, PersonId, PersonNode};
use crate::snapshot::{ConvertedNode, RelationEngineSnapshot};

/// Counts of what a merge did to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// People whose metadata was carried over
    pub kept: usize,
    pub added: usize,
    pub removed: usize,
}

/// Merge using the given strategy.
pub fn merge_with(
    strategy: MergeStrategy,
    store: &mut GraphStore,
    snapshot: &RelationEngineSnapshot,
) -> Result<MergeReport> {
    match strategy {
        MergeStrategy::Positional => merge_snapshot(store, snapshot),
        MergeStrategy::ById => merge_snapshot_by_id(store, snapshot),
    }
}

/// Positional merge.
///
/// Both sides are sorted by id and aligned by index: the store is truncated
/// or extended to the snapshot length, then every node takes the relations of
/// the snapshot node at the same index while keeping its own name and sex.
/// Only correct when ids form a dense range starting at 0; a store node past
/// the snapshot length is dropped even if its id is still in the snapshot.
pub fn merge_snapshot(store: &mut GraphStore, snapshot: &RelationEngineSnapshot) -> Result<MergeReport> {
    let incoming = snapshot.convert()?;
    store.sort_by_id();

    let old_len = store.nodes.len();
    store.nodes.truncate(incoming.len());
    let kept = store.nodes.len();

    for (ours, theirs) in store.nodes.iter_mut().zip(&incoming) {
        ours.relations = theirs.relations.clone();
    }
    for node in incoming.into_iter().skip(kept) {
        store.nodes.push(new_person(node));
    }

    let report = MergeReport {
        kept,
        added: store.nodes.len() - kept,
        removed: old_len - kept,
    };
    debug!(?report, "positional merge applied");
    Ok(report)
}

/// Id-keyed merge.
///
/// People present on both sides keep their metadata and take the snapshot's
/// relations, snapshot-only people are added without a name, and store-only
/// people are removed. Positions play no part.
pub fn merge_snapshot_by_id(
    store: &mut GraphStore,
    snapshot: &RelationEngineSnapshot,
) -> Result<MergeReport> {
    let incoming = snapshot.convert()?;

    let mut existing: HashMap<PersonId, PersonNode> =
        store.nodes.drain(..).map(|node| (node.id, node)).collect();
    let mut report = MergeReport::default();

    for node in incoming {
        match existing.remove(&node.id) {
            Some(mut ours) => {
                ours.relations = node.relations;
                store.nodes.push(ours);
                report.kept += 1;
            }
            None => {
                store.nodes.push(new_person(node));
                report.added += 1;
            }
        }
    }
    report.removed = existing.len();

    debug!(?report, "id-keyed merge applied");
    Ok(report)
}

fn new_person(node: ConvertedNode) -> PersonNode {
    PersonNode {
        id: node.id,
        sex: node.sex,
        name: None,
        relations: node.relations,
    }
}
