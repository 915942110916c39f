//! Kin Session - main orchestrator
//!
//! Owns one graph store and one relation engine handle. Every update goes
//! describe -> snapshot -> merge, and `&mut self` keeps merges serialized.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::config::ViewConfig;
use crate::error::{KinError, Result};
use crate::model::{GraphStore, PersonId, PersonNode, Point, Sex};
use crate::relation_engine::{DescriptiveResult, EnginePerson, RelationEngine};
use crate::snapshot::RelationEngineSnapshot;
use crate::systems::{self, EdgePath, Layout, MergeReport};

/// What the presentation side needs to draw one person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedNode {
    pub id: PersonId,
    pub name: Option<String>,
    pub sex: Sex,
    pub position: Point,
}

/// Everything a renderer consumes for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub nodes: Vec<PresentedNode>,
    pub edges: Vec<EdgePath>,
}

pub struct KinSession<E: RelationEngine> {
    engine: E,
    store: GraphStore,
    config: ViewConfig,
}

impl<E: RelationEngine> KinSession<E> {
    pub fn new(engine: E, config: ViewConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine,
            store: GraphStore::new(),
            config,
        })
    }

    /// Resume a session over a previously persisted store.
    pub fn with_store(engine: E, store: GraphStore, config: ViewConfig) -> Result<Self> {
        let mut session = Self::new(engine, config)?;
        session.store = store;
        session.store.sort_by_id();
        Ok(session)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn into_store(self) -> GraphStore {
        self.store
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Feed a description to the engine and merge the recomputed graph.
    ///
    /// If the engine fails the store is left as it was.
    pub fn describe(&mut self, text: &str) -> Result<MergeReport> {
        self.engine.describe(text)?;
        self.refresh()
    }

    /// Pull a fresh snapshot from the engine and merge it.
    pub fn refresh(&mut self) -> Result<MergeReport> {
        let snapshot = self.engine.snapshot()?;
        self.apply(&snapshot)
    }

    /// Merge an already obtained snapshot.
    pub fn apply(&mut self, snapshot: &RelationEngineSnapshot) -> Result<MergeReport> {
        let report = systems::merge_with(self.config.merge_strategy, &mut self.store, snapshot)?;
        info!(
            people = self.store.len(),
            kept = report.kept,
            added = report.added,
            removed = report.removed,
            "graph store updated"
        );
        Ok(report)
    }

    pub fn set_name(&mut self, id: PersonId, name: Option<String>) -> Result<()> {
        self.store.set_name(id, name)
    }

    pub fn layout(&self, root: PersonId) -> Result<Layout> {
        systems::layout_with(&self.store, root, &self.config)
    }

    /// Layout joined with names and sexes, ready to draw.
    pub fn present(&self, root: PersonId) -> Result<Presentation> {
        let layout = self.layout(root)?;
        let index: HashMap<PersonId, &PersonNode> =
            self.store.nodes().iter().map(|node| (node.id, node)).collect();
        let nodes = layout
            .positions
            .iter()
            .filter_map(|(&id, &position)| {
                index.get(&id).map(|node| PresentedNode {
                    id,
                    name: node.name.clone(),
                    sex: node.sex,
                    position,
                })
            })
            .collect();
        let edges = layout.edge_paths(self.config.step_distance);
        Ok(Presentation { nodes, edges })
    }

    /// Ask the engine how `a` is related to `b`.
    pub fn relation_between(&self, a: PersonId, b: PersonId) -> Result<DescriptiveResult> {
        let a = self.engine_person(a)?;
        let b = self.engine_person(b)?;
        Ok(self.engine.relation_between(a, b)?)
    }

    fn engine_person(&self, id: PersonId) -> Result<EnginePerson> {
        let node = self.store.get(id).ok_or(KinError::PersonNotFound { id })?;
        Ok(EnginePerson { id, sex: node.sex })
    }
}
