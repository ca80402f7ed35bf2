use std::collections::{BTreeMap, BTreeSet};

use geom::{GlobalOffset, LonLat, Projection, Pt2D};

use crate::{Document, NodeID, WayID};

/// Index into `StreetGraph::nodes`. Nodes are stored in ID order, so comparing indices is the
/// same as comparing IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeID,
    pub gps: LonLat,
    /// In the shared local frame, after subtracting the global offset
    pub pt: Pt2D,
}

/// One way from the input, pointing into the node arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub id: WayID,
    pub nodes: Vec<NodeIdx>,
    pub oneway: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("{way} references missing {node}")]
pub struct MissingNode {
    pub way: WayID,
    pub node: NodeID,
}

/// Arena of the nodes and ways that survived ingestion. Only nodes referenced by some way are
/// kept.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetGraph {
    pub nodes: Vec<Node>,
    /// In way ID order
    pub segments: Vec<Segment>,
}

impl StreetGraph {
    /// Projects every referenced node, then shifts the whole frame so the smallest x and y are 0.
    pub fn new(doc: &Document, projection: &dyn Projection) -> Result<StreetGraph, MissingNode> {
        let mut referenced = BTreeSet::new();
        for (way_id, way) in &doc.ways {
            for node in &way.nodes {
                if !doc.nodes.contains_key(node) {
                    return Err(MissingNode {
                        way: *way_id,
                        node: *node,
                    });
                }
                referenced.insert(*node);
            }
        }

        let projected: Vec<(NodeID, LonLat, Pt2D)> = referenced
            .into_iter()
            .map(|id| {
                let gps = doc.nodes[&id];
                (id, gps, projection.project(gps))
            })
            .collect();
        let offset = GlobalOffset::from_points(projected.iter().map(|(_, _, pt)| *pt));

        let mut id_to_idx = BTreeMap::new();
        let mut nodes = Vec::new();
        for (id, gps, pt) in projected {
            id_to_idx.insert(id, NodeIdx(nodes.len()));
            nodes.push(Node {
                id,
                gps,
                pt: match offset {
                    Some(offset) => offset.apply(pt),
                    None => pt,
                },
            });
        }

        let segments = doc
            .ways
            .iter()
            .map(|(id, way)| Segment {
                id: *id,
                nodes: way.nodes.iter().map(|n| id_to_idx[n]).collect(),
                oneway: way.oneway,
            })
            .collect();

        Ok(StreetGraph { nodes, segments })
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.0]
    }

    pub fn pt(&self, idx: NodeIdx) -> Pt2D {
        self.nodes[idx.0].pt
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::Way;
    use geom::HaversineProjection;

    fn doc(nodes: Vec<(i64, f64, f64)>, ways: Vec<(i64, Vec<i64>)>) -> Document {
        Document {
            nodes: nodes
                .into_iter()
                .map(|(id, lon, lat)| (NodeID(id), LonLat::new(lon, lat)))
                .collect(),
            ways: ways
                .into_iter()
                .map(|(id, nodes)| {
                    (
                        WayID(id),
                        Way {
                            nodes: nodes.into_iter().map(NodeID).collect(),
                            oneway: false,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn only_referenced_nodes_anchor_the_frame() {
        let graph = StreetGraph::new(
            &doc(
                vec![(1, -0.001, 0.001), (2, 0.001, 0.002), (3, -5.0, -5.0)],
                vec![(7, vec![2, 1])],
            ),
            &HaversineProjection,
        )
        .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].id, NodeID(1));
        assert_eq!(graph.pt(NodeIdx(0)), Pt2D::new(0.0, 0.0));
        let far = graph.pt(NodeIdx(1));
        assert!(far.x() > 200.0 && far.x() < 250.0);
        assert_relative_eq!(far.y(), 111.19, epsilon = 0.01);
        assert_eq!(graph.segments[0].nodes, vec![NodeIdx(1), NodeIdx(0)]);
    }

    #[test]
    fn missing_node() {
        let err = StreetGraph::new(
            &doc(vec![(1, 0.0, 0.0)], vec![(7, vec![1, 2])]),
            &HaversineProjection,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MissingNode {
                way: WayID(7),
                node: NodeID(2)
            }
        );
    }
}
