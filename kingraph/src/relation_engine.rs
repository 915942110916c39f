//! Relation engine boundary
//!
//! The engine that parses family descriptions and infers the full relation
//! graph lives outside this crate. It is reached through [`RelationEngine`];
//! its failures are opaque and passed through as `anyhow` errors.

use std::collections::HashMap;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::model::{PersonId, Sex};
use crate::snapshot::RelationEngineSnapshot;

/// A person as the engine knows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnginePerson {
    pub id: PersonId,
    pub sex: Sex,
}

/// Display-oriented relationship label between two people, passed through as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveResult(pub String);

pub trait RelationEngine {
    /// Extend the engine's accumulated family description.
    fn describe(&mut self, text: &str) -> anyhow::Result<()>;

    /// The complete current relation graph, recomputed from scratch.
    fn snapshot(&self) -> anyhow::Result<RelationEngineSnapshot>;

    fn relation_between(&self, a: EnginePerson, b: EnginePerson) -> anyhow::Result<DescriptiveResult>;
}

/// Engine stand-in that serves a fixed snapshot.
///
/// Descriptions are recorded but not interpreted. Hosts that run the real
/// engine elsewhere push each fresh snapshot with [`StaticEngine::set_snapshot`].
#[derive(Debug, Clone, Default)]
pub struct StaticEngine {
    snapshot: RelationEngineSnapshot,
    descriptions: Vec<String>,
    labels: HashMap<(PersonId, PersonId), String>,
    fail_next_describe: Option<String>,
}

impl StaticEngine {
    pub fn new(snapshot: RelationEngineSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn set_snapshot(&mut self, snapshot: RelationEngineSnapshot) {
        self.snapshot = snapshot;
    }

    /// Canned label returned for the ordered pair `(a, b)`.
    pub fn with_label(mut self, a: PersonId, b: PersonId, label: impl Into<String>) -> Self {
        self.labels.insert((a, b), label.into());
        self
    }

    /// Make the next `describe` call fail with `message`, as a parse error would.
    pub fn fail_next_describe(&mut self, message: impl Into<String>) {
        self.fail_next_describe = Some(message.into());
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }
}

impl RelationEngine for StaticEngine {
    fn describe(&mut self, text: &str) -> anyhow::Result<()> {
        if let Some(message) = self.fail_next_describe.take() {
            bail!(message);
        }
        self.descriptions.push(text.to_string());
        Ok(())
    }

    fn snapshot(&self) -> anyhow::Result<RelationEngineSnapshot> {
        Ok(self.snapshot.clone())
    }

    fn relation_between(&self, a: EnginePerson, b: EnginePerson) -> anyhow::Result<DescriptiveResult> {
        match self.labels.get(&(a.id, b.id)) {
            Some(label) => Ok(DescriptiveResult(label.clone())),
            None => bail!("no relation known between {} and {}", a.id, b.id),
        }
    }
}
