//! Kin graph data model
//!
//! People, typed relations, the locally owned graph store and 2D points.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{KinError, Result};

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for PersonId {
    fn from(id: u32) -> Self {
        PersonId(id)
    }
}

// ============================================================================
// Person
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Horizontal side a newly placed person lands on: men left, women right.
    pub fn side(self) -> f64 {
        match self {
            Sex::Male => -1.0,
            Sex::Female => 1.0,
        }
    }
}

impl TryFrom<&str> for Sex {
    type Error = KinError;

    fn try_from(tag: &str) -> Result<Self> {
        match tag {
            "Male" => Ok(Sex::Male),
            "Female" => Ok(Sex::Female),
            other => Err(KinError::InvalidSexTag {
                tag: other.to_string(),
            }),
        }
    }
}

/// The fundamental relation kinds. Every other family relation is a chain of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// The target is a parent of the holder.
    Parent,
    /// The target is a child of the holder.
    Child,
    Sibling,
    ReproductivePartner,
}

impl RelationKind {
    /// Wire tag used by the relation engine.
    pub fn tag(self) -> &'static str {
        match self {
            RelationKind::Parent => "Parent",
            RelationKind::Child => "Child",
            RelationKind::Sibling => "Sibling",
            RelationKind::ReproductivePartner => "RP",
        }
    }

    /// Vertical step direction: parents sit one step down, children one step up.
    pub fn vertical(self) -> f64 {
        match self {
            RelationKind::Parent => 1.0,
            RelationKind::Child => -1.0,
            RelationKind::Sibling | RelationKind::ReproductivePartner => 0.0,
        }
    }

    pub fn is_lineal(self) -> bool {
        matches!(self, RelationKind::Parent | RelationKind::Child)
    }
}

impl TryFrom<&str> for RelationKind {
    type Error = KinError;

    fn try_from(tag: &str) -> Result<Self> {
        match tag {
            "Parent" => Ok(RelationKind::Parent),
            "Child" => Ok(RelationKind::Child),
            "RP" => Ok(RelationKind::ReproductivePartner),
            "Sibling" => Ok(RelationKind::Sibling),
            other => Err(KinError::InvalidRelationTag {
                tag: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    /// Target person
    pub id: PersonId,
}

impl Relation {
    pub fn new(kind: RelationKind, id: u32) -> Self {
        Self { kind, id: PersonId(id) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonNode {
    pub id: PersonId,
    pub sex: Sex,
    /// Display name. Only ever written locally, never by the relation engine.
    pub name: Option<String>,
    /// Stored order is the layout tie-break order.
    pub relations: Vec<Relation>,
}

impl PersonNode {
    pub fn new(id: u32, sex: Sex) -> Self {
        Self {
            id: PersonId(id),
            sex,
            name: None,
            relations: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_relation(mut self, kind: RelationKind, id: u32) -> Self {
        self.relations.push(Relation::new(kind, id));
        self
    }
}

// ============================================================================
// Graph store
// ============================================================================

/// Locally owned, metadata-bearing copy of the kin graph, sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStore {
    pub(crate) nodes: Vec<PersonNode>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from arbitrary nodes; they are sorted by id.
    pub fn from_nodes(nodes: Vec<PersonNode>) -> Self {
        let mut store = Self { nodes };
        store.sort_by_id();
        store
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PersonNode] {
        &self.nodes
    }

    /// Lookup by id, independent of position.
    pub fn get(&self, id: PersonId) -> Option<&PersonNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Set or clear the display name of a person.
    pub fn set_name(&mut self, id: PersonId, name: Option<String>) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or(KinError::PersonNotFound { id })?;
        node.name = name;
        Ok(())
    }

    pub fn sort_by_id(&mut self) {
        self.nodes.sort_by_key(|node| node.id);
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}
