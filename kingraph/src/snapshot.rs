//! Relation engine snapshots
//!
//! A snapshot is one full, name-less recomputation of the relation graph as
//! the engine reports it. Relation kinds and sexes arrive as string tags and
//! are converted up front so a bad tag never reaches the store.

use serde::{Deserialize, Serialize};

use crate::error::{KinError, Result};
use crate::model::{PersonId, Relation, RelationKind, Sex};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEngineSnapshot {
    pub nodes: Vec<SnapshotNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: u32,
    pub sex: String,
    pub relations: Vec<SnapshotRelation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRelation {
    pub kind: String,
    pub id: u32,
}

/// A snapshot node after tag conversion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConvertedNode {
    pub id: PersonId,
    pub sex: Sex,
    pub relations: Vec<Relation>,
}

impl RelationEngineSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Convert every node, sorted by id. Fails on the first unknown tag or
    /// on an id reported more than once.
    pub(crate) fn convert(&self) -> Result<Vec<ConvertedNode>> {
        let mut converted = self
            .nodes
            .iter()
            .map(SnapshotNode::convert)
            .collect::<Result<Vec<_>>>()?;
        converted.sort_by_key(|node| node.id);
        if let Some(pair) = converted.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(KinError::DuplicatePersonId { id: pair[0].id });
        }
        Ok(converted)
    }
}

impl SnapshotNode {
    pub fn new(id: u32, sex: &str) -> Self {
        Self {
            id,
            sex: sex.to_string(),
            relations: Vec::new(),
        }
    }

    pub fn with_relation(mut self, kind: &str, id: u32) -> Self {
        self.relations.push(SnapshotRelation {
            kind: kind.to_string(),
            id,
        });
        self
    }

    fn convert(&self) -> Result<ConvertedNode> {
        let relations = self
            .relations
            .iter()
            .map(|r| {
                Ok(Relation {
                    kind: RelationKind::try_from(r.kind.as_str())?,
                    id: PersonId(r.id),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ConvertedNode {
            id: PersonId(self.id),
            sex: Sex::try_from(self.sex.as_str())?,
            relations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_json() {
        let json = r#"{"nodes":[
            {"id":1,"sex":"Female","name":"","relations":[{"id":0,"kind":"Child"}]},
            {"id":0,"sex":"Male","name":"","relations":[{"id":1,"kind":"Parent"},{"id":2,"kind":"RP"}]}
        ]}"#;
        let snapshot = RelationEngineSnapshot::from_json_str(json).unwrap();
        assert_eq!(snapshot.len(), 2);

        let converted = snapshot.convert().unwrap();
        assert_eq!(converted[0].id, PersonId(0));
        assert_eq!(converted[0].sex, Sex::Male);
        assert_eq!(
            converted[0].relations,
            vec![
                Relation::new(RelationKind::Parent, 1),
                Relation::new(RelationKind::ReproductivePartner, 2),
            ]
        );
        assert_eq!(converted[1].relations, vec![Relation::new(RelationKind::Child, 0)]);
    }

    #[test]
    fn test_unknown_tag_fails_conversion() {
        let snapshot = RelationEngineSnapshot {
            nodes: vec![
                SnapshotNode::new(0, "Male").with_relation("Parent", 1),
                SnapshotNode::new(1, "Female").with_relation("Cousin", 0),
            ],
        };
        let err = snapshot.convert().unwrap_err();
        assert!(matches!(err, KinError::InvalidRelationTag { tag } if tag == "Cousin"));
    }

    #[test]
    fn test_repeated_id_fails_conversion() {
        let snapshot = RelationEngineSnapshot {
            nodes: vec![
                SnapshotNode::new(0, "Male"),
                SnapshotNode::new(1, "Female"),
                SnapshotNode::new(0, "Female"),
            ],
        };
        let err = snapshot.convert().unwrap_err();
        assert!(matches!(err, KinError::DuplicatePersonId { id } if id == PersonId(0)));
    }
}
