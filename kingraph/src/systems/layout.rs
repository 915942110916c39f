//! Layout System
//!
//! Places people on a plane with a single depth-first walk from a root.
//!
//! The walk keeps an explicit stack. At each step the person on top of the
//! stack offers the first relation, in stored order, that leads to someone
//! not yet placed; that person is placed one step away from the discoverer
//! and pushed. A person with nothing left to offer is popped. Positions are
//! never revisited, so a person reachable along two chains is drawn once,
//! via whichever edge the walk took first. People the walk never reaches are
//! left out of the layout entirely.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::error::{KinError, Result};
use crate::model::{GraphStore, PersonId, PersonNode, Point, RelationKind, Sex};

/// An edge the walk traversed, from discoverer to discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub from: PersonId,
    pub to: PersonId,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub positions: BTreeMap<PersonId, Point>,
    /// Traversal edges in discovery order
    pub edges: Vec<LayoutEdge>,
    /// Relations between placed people that the walk did not take.
    /// Only filled when requested; never affects positions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_links: Vec<LayoutEdge>,
}

impl Layout {
    pub fn position(&self, id: PersonId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Offset of a newly discovered person from the person who discovered them.
pub fn step_offset(kind: RelationKind, discovered: Sex, step_distance: f64) -> Point {
    Point {
        x: discovered.side() * step_distance,
        y: kind.vertical() * step_distance,
    }
}

/// Lay out everything reachable from `root`.
///
/// An empty store yields an empty layout whatever the root.
pub fn layout(store: &GraphStore, root: PersonId, step_distance: f64, origin: Point) -> Result<Layout> {
    if store.is_empty() {
        return Ok(Layout::default());
    }

    let index: HashMap<PersonId, &PersonNode> = store.nodes().iter().map(|n| (n.id, n)).collect();
    let root_node = *index.get(&root).ok_or(KinError::RootNotFound { id: root })?;

    let mut visited: HashSet<PersonId> = HashSet::from([root]);
    let mut dangling: HashSet<(PersonId, PersonId)> = HashSet::new();
    let mut result = Layout::default();
    result.positions.insert(root, origin);

    // (person, their position, how far into their relations the scan has got)
    let mut stack: Vec<(&PersonNode, Point, usize)> = vec![(root_node, origin, 0)];

    while let Some(frame) = stack.last_mut() {
        let (current, at) = (frame.0, frame.1);
        // Relations before the cursor led to visited or missing people, and
        // visited only grows, so the scan can resume where it stopped.
        let mut chosen = None;
        while let Some(relation) = current.relations.get(frame.2) {
            frame.2 += 1;
            if visited.contains(&relation.id) {
                continue;
            }
            match index.get(&relation.id) {
                Some(next) => {
                    chosen = Some((*relation, *next));
                    break;
                }
                None => {
                    if dangling.insert((current.id, relation.id)) {
                        warn!(from = %current.id, to = %relation.id, "relation points outside the store, skipping");
                    }
                }
            }
        }

        let Some((relation, next)) = chosen else {
            stack.pop();
            continue;
        };

        let placed = at + step_offset(relation.kind, next.sex, step_distance);
        result.positions.insert(next.id, placed);
        result.edges.push(LayoutEdge {
            from: current.id,
            to: next.id,
            kind: relation.kind,
        });
        visited.insert(next.id);
        stack.push((next, placed, 0));
    }

    debug!(
        root = %root,
        placed = result.positions.len(),
        edges = result.edges.len(),
        "layout complete"
    );
    Ok(result)
}

/// Lay out with the step, origin and cross-link setting of a view config.
pub fn layout_with(store: &GraphStore, root: PersonId, config: &ViewConfig) -> Result<Layout> {
    let mut result = layout(store, root, config.step_distance, config.origin)?;
    if config.cross_links {
        result.cross_links = cross_links(store, &result);
    }
    Ok(result)
}

/// Relations between placed people that the walk never took, one per
/// unordered pair, scanned in id order then stored relation order.
pub fn cross_links(store: &GraphStore, layout: &Layout) -> Vec<LayoutEdge> {
    let pair = |a: PersonId, b: PersonId| if a <= b { (a, b) } else { (b, a) };

    let mut seen: HashSet<(PersonId, PersonId)> =
        layout.edges.iter().map(|e| pair(e.from, e.to)).collect();
    let mut links = Vec::new();

    for node in store.nodes() {
        if !layout.positions.contains_key(&node.id) {
            continue;
        }
        for relation in &node.relations {
            if relation.id == node.id || !layout.positions.contains_key(&relation.id) {
                continue;
            }
            if seen.insert(pair(node.id, relation.id)) {
                links.push(LayoutEdge {
                    from: node.id,
                    to: relation.id,
                    kind: relation.kind,
                });
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationKind::{Child, Parent, ReproductivePartner, Sibling};

    fn family() -> GraphStore {
        GraphStore::from_nodes(vec![
            PersonNode::new(0, Sex::Male)
                .with_name("John")
                .with_relation(Parent, 1)
                .with_relation(Parent, 2),
            PersonNode::new(1, Sex::Male).with_name("Gabe"),
            PersonNode::new(2, Sex::Female).with_name("Izy"),
        ])
    }

    #[test]
    fn test_parents_of_root() {
        let result = layout(&family(), PersonId(0), 10.0, Point::ORIGIN).unwrap();

        assert_eq!(result.position(PersonId(0)), Some(Point::new(0.0, 0.0)));
        assert_eq!(result.position(PersonId(1)), Some(Point::new(-10.0, 10.0)));
        assert_eq!(result.position(PersonId(2)), Some(Point::new(10.0, 10.0)));
        assert_eq!(
            result.edges,
            vec![
                LayoutEdge { from: PersonId(0), to: PersonId(1), kind: Parent },
                LayoutEdge { from: PersonId(0), to: PersonId(2), kind: Parent },
            ]
        );
    }

    #[test]
    fn test_offsets_accumulate_along_the_walk() {
        // Mary (0) -> child Solomon (1) -> partner Izy (2) -> sibling Ann (3)
        let store = GraphStore::from_nodes(vec![
            PersonNode::new(0, Sex::Female).with_relation(Child, 1),
            PersonNode::new(1, Sex::Male)
                .with_relation(Parent, 0)
                .with_relation(ReproductivePartner, 2),
            PersonNode::new(2, Sex::Female)
                .with_relation(ReproductivePartner, 1)
                .with_relation(Sibling, 3),
            PersonNode::new(3, Sex::Female).with_relation(Sibling, 2),
        ]);

        let result = layout(&store, PersonId(0), 5.0, Point::new(100.0, 50.0)).unwrap();

        assert_eq!(result.position(PersonId(1)), Some(Point::new(95.0, 45.0)));
        assert_eq!(result.position(PersonId(2)), Some(Point::new(100.0, 45.0)));
        assert_eq!(result.position(PersonId(3)), Some(Point::new(105.0, 45.0)));
        let kinds: Vec<_> = result.edges.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![Child, ReproductivePartner, Sibling]);
    }

    #[test]
    fn test_depth_first_order() {
        // 0 has children 1 and 2; 1 has child 3. Depth-first discovers 3 before 2.
        let store = GraphStore::from_nodes(vec![
            PersonNode::new(0, Sex::Male).with_relation(Child, 1).with_relation(Child, 2),
            PersonNode::new(1, Sex::Female).with_relation(Parent, 0).with_relation(Child, 3),
            PersonNode::new(2, Sex::Male).with_relation(Parent, 0),
            PersonNode::new(3, Sex::Male).with_relation(Parent, 1),
        ]);

        let result = layout(&store, PersonId(0), 1.0, Point::ORIGIN).unwrap();

        let order: Vec<_> = result.edges.iter().map(|e| (e.from.0, e.to.0)).collect();
        assert_eq!(order, vec![(0, 1), (1, 3), (0, 2)]);
        assert_eq!(result.position(PersonId(3)), Some(Point::new(0.0, -2.0)));
    }

    #[test]
    fn test_deterministic() {
        let store = family();
        let a = layout(&store, PersonId(2), 7.5, Point::ORIGIN).unwrap();
        let b = layout(&store, PersonId(2), 7.5, Point::ORIGIN).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unreachable_people_are_left_out() {
        // Relations are one-directional here: 1 and 2 have no way back to 0,
        // and 3 is only reachable from 2.
        let mut store = family();
        store.nodes.push(PersonNode::new(3, Sex::Female).with_relation(Sibling, 0));

        let from_gabe = layout(&store, PersonId(1), 10.0, Point::ORIGIN).unwrap();
        assert_eq!(from_gabe.positions.len(), 1);
        assert!(from_gabe.edges.is_empty());

        let from_john = layout(&store, PersonId(0), 10.0, Point::ORIGIN).unwrap();
        assert!(from_john.position(PersonId(3)).is_none());
        assert!(from_john.edges.iter().all(|e| e.from != PersonId(3) && e.to != PersonId(3)));
    }

    #[test]
    fn test_cycle_drawn_once() {
        // Two parents who are partners: 1 is reached from 0 first, so the
        // partner link between 1 and 2 is never walked.
        let store = GraphStore::from_nodes(vec![
            PersonNode::new(0, Sex::Male).with_relation(Parent, 1).with_relation(Parent, 2),
            PersonNode::new(1, Sex::Male)
                .with_relation(Child, 0)
                .with_relation(ReproductivePartner, 2),
            PersonNode::new(2, Sex::Female)
                .with_relation(Child, 0)
                .with_relation(ReproductivePartner, 1),
        ]);

        let result = layout(&store, PersonId(0), 10.0, Point::ORIGIN).unwrap();

        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.edges[1], LayoutEdge { from: PersonId(1), to: PersonId(2), kind: ReproductivePartner });
        // Placed relative to 1, not to 0
        assert_eq!(result.position(PersonId(2)), Some(Point::new(0.0, 10.0)));
        assert!(result.cross_links.is_empty());
    }

    #[test]
    fn test_cross_links_reported_when_enabled() {
        let store = GraphStore::from_nodes(vec![
            PersonNode::new(0, Sex::Male).with_relation(Parent, 1).with_relation(Parent, 2),
            PersonNode::new(1, Sex::Male)
                .with_relation(Child, 0)
                .with_relation(ReproductivePartner, 2),
            PersonNode::new(2, Sex::Female)
                .with_relation(Child, 0)
                .with_relation(ReproductivePartner, 1),
        ]);
        let config = ViewConfig {
            step_distance: 10.0,
            cross_links: true,
            ..ViewConfig::default()
        };

        let result = layout_with(&store, PersonId(0), &config).unwrap();

        assert_eq!(
            result.edges,
            vec![
                LayoutEdge { from: PersonId(0), to: PersonId(1), kind: Parent },
                LayoutEdge { from: PersonId(1), to: PersonId(2), kind: ReproductivePartner },
            ]
        );
        assert_eq!(
            result.cross_links,
            vec![LayoutEdge { from: PersonId(0), to: PersonId(2), kind: Parent }]
        );
    }

    #[test]
    fn test_dangling_and_self_relations_skipped() {
        let store = GraphStore::from_nodes(vec![
            PersonNode::new(0, Sex::Female)
                .with_relation(Sibling, 0)
                .with_relation(Sibling, 42)
                .with_relation(Sibling, 1),
            PersonNode::new(1, Sex::Male),
        ]);

        let result = layout(&store, PersonId(0), 10.0, Point::ORIGIN).unwrap();

        assert_eq!(result.positions.len(), 2);
        assert_eq!(result.position(PersonId(1)), Some(Point::new(-10.0, 0.0)));
        assert_eq!(result.edges.len(), 1);
    }

    #[test]
    fn test_missing_root() {
        let err = layout(&family(), PersonId(9), 10.0, Point::ORIGIN).unwrap_err();
        assert!(matches!(err, KinError::RootNotFound { id } if id == PersonId(9)));
    }

    #[test]
    fn test_empty_store() {
        let result = layout(&GraphStore::new(), PersonId(0), 10.0, Point::ORIGIN).unwrap();
        assert!(result.is_empty());
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_positions_serialize_by_id() {
        let result = layout(&family(), PersonId(0), 10.0, Point::ORIGIN).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["positions"]["2"]["x"], 10.0);
        assert!(json.get("cross_links").is_none());
    }
}
