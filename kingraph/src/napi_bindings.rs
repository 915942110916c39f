//! N-API bindings for Node.js
//!
//! Exposes the graph store, snapshot merging and layout to a JavaScript
//! presentation layer. Values cross the boundary as JSON strings.

use std::sync::{Arc, Mutex, MutexGuard};

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::config::ViewConfig;
use crate::model::{GraphStore, PersonId};
use crate::snapshot::RelationEngineSnapshot;
use crate::systems;

type StoreHandle = Arc<Mutex<GraphStore>>;

fn lock(store: &StoreHandle) -> Result<MutexGuard<'_, GraphStore>> {
    store
        .lock()
        .map_err(|_| Error::from_reason("graph store lock poisoned"))
}

fn to_napi(err: crate::error::KinError) -> Error {
    Error::from_reason(err.to_string())
}

#[napi]
pub fn create_store() -> External<StoreHandle> {
    External::new(Arc::new(Mutex::new(GraphStore::new())))
}

/// Restore a store previously saved with `export_store`.
#[napi]
pub fn import_store(json: String) -> Result<External<StoreHandle>> {
    let mut store = GraphStore::new();
    store.import_json(&json).map_err(to_napi)?;
    Ok(External::new(Arc::new(Mutex::new(store))))
}

#[napi]
pub fn export_store(store: External<StoreHandle>) -> Result<String> {
    lock(&store)?.export_json().map_err(to_napi)
}

#[napi(object)]
pub struct JsMergeReport {
    pub kept: u32,
    pub added: u32,
    pub removed: u32,
}

/// Merge an engine snapshot (JSON) into the store.
#[napi]
pub fn merge_snapshot(store: External<StoreHandle>, snapshot_json: String, by_id: Option<bool>) -> Result<JsMergeReport> {
    let snapshot = RelationEngineSnapshot::from_json_str(&snapshot_json).map_err(to_napi)?;
    let mut store = lock(&store)?;
    let report = if by_id.unwrap_or(false) {
        systems::merge_snapshot_by_id(&mut store, &snapshot)
    } else {
        systems::merge_snapshot(&mut store, &snapshot)
    }
    .map_err(to_napi)?;

    Ok(JsMergeReport {
        kept: report.kept as u32,
        added: report.added as u32,
        removed: report.removed as u32,
    })
}

#[napi]
pub fn set_person_name(store: External<StoreHandle>, id: u32, name: Option<String>) -> Result<()> {
    lock(&store)?.set_name(PersonId(id), name).map_err(to_napi)
}

#[napi]
pub fn get_store_size(store: External<StoreHandle>) -> Result<u32> {
    Ok(lock(&store)?.len() as u32)
}

/// Lay out from `root`. `config_json` is an optional partial view config.
/// Returns `{ positions, edges, cross_links?, paths }` as JSON.
#[napi]
pub fn layout_json(store: External<StoreHandle>, root: u32, config_json: Option<String>) -> Result<String> {
    let config = match config_json {
        Some(json) => ViewConfig::from_json_str(&json).map_err(to_napi)?,
        None => ViewConfig::default(),
    };
    let store = lock(&store)?;
    let layout = systems::layout_with(&store, PersonId(root), &config).map_err(to_napi)?;
    let paths = layout.edge_paths(config.step_distance);

    serde_json::to_string(&serde_json::json!({
        "positions": layout.positions,
        "edges": layout.edges,
        "cross_links": layout.cross_links,
        "paths": paths,
    }))
    .map_err(|e| Error::from_reason(e.to_string()))
}
