//! Edge geometry for the presentation side.
//!
//! Parent and child links are elbows: straight down (or up) one step from the
//! discoverer, then across to the discovered person. Sibling and partner links
//! are straight segments. Every point is a final global position taken from
//! the layout.

use serde::Serialize;

use crate::model::{PersonId, Point, RelationKind};
use crate::systems::layout::{Layout, LayoutEdge};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePath {
    pub from: PersonId,
    pub to: PersonId,
    pub kind: RelationKind,
    pub points: Vec<Point>,
}

/// Polyline for one edge, or `None` if either end was not placed.
pub fn edge_path(layout: &Layout, edge: &LayoutEdge, step_distance: f64) -> Option<EdgePath> {
    let start = layout.position(edge.from)?;
    let end = layout.position(edge.to)?;

    let points = if edge.kind.is_lineal() {
        let bend = Point::new(start.x, start.y + edge.kind.vertical() * step_distance);
        let across = Point::new(end.x, bend.y);
        let mut points = vec![start, bend, across];
        // Traversal edges always land on the target; cross links may not.
        if across != end {
            points.push(end);
        }
        points
    } else {
        vec![start, end]
    };

    Some(EdgePath {
        from: edge.from,
        to: edge.to,
        kind: edge.kind,
        points,
    })
}

impl Layout {
    /// Paths for the traversal edges, then any cross links, in order.
    pub fn edge_paths(&self, step_distance: f64) -> Vec<EdgePath> {
        self.edges
            .iter()
            .chain(&self.cross_links)
            .filter_map(|edge| edge_path(self, edge, step_distance))
            .collect()
    }
}
