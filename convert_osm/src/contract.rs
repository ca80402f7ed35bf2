use anyhow::Result;

use abstutil::Timer;
use geom::{Distance, PolyLine, Pt2D};

use crate::{DegreeMap, NodeIdx, Segment, StreetGraph, WayID};

/// A maximal chain of ways joined through degree-2 nodes. `pts`, `nodes`, and `degrees` line up.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRoad {
    pub pts: Vec<Pt2D>,
    pub nodes: Vec<NodeIdx>,
    pub degrees: Vec<usize>,
    /// Only when every way in the chain is one-way
    pub oneway: bool,
    /// Every way absorbed into this road
    pub ways: Vec<WayID>,
}

impl MergedRoad {
    pub fn from_segment(
        graph: &StreetGraph,
        segment: &Segment,
        degrees: &DegreeMap,
    ) -> MergedRoad {
        MergedRoad {
            pts: segment.nodes.iter().map(|n| graph.pt(*n)).collect(),
            nodes: segment.nodes.clone(),
            degrees: segment.nodes.iter().map(|n| degrees.get(*n)).collect(),
            oneway: segment.oneway,
            ways: vec![segment.id],
        }
    }

    pub fn first_node(&self) -> NodeIdx {
        self.nodes[0]
    }

    pub fn last_node(&self) -> NodeIdx {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn first_pt(&self) -> Pt2D {
        self.pts[0]
    }

    pub fn last_pt(&self) -> Pt2D {
        self.pts[self.pts.len() - 1]
    }

    pub fn length(&self) -> Distance {
        self.pts
            .windows(2)
            .fold(Distance::ZERO, |so_far, pair| so_far + pair[0].dist_to(pair[1]))
    }

    /// Fails on segments no longer than `epsilon`, the same tolerance the merge used.
    pub fn to_polyline(&self, epsilon: Distance) -> Result<PolyLine> {
        PolyLine::with_tolerance(self.pts.clone(), epsilon)
    }

    /// Cuts the road at every interior node that's an intersection, so each piece only touches
    /// other roads at its ends.
    fn split_at_intersections(self) -> Vec<MergedRoad> {
        let last = self.nodes.len() - 1;
        let cuts: Vec<usize> = (1..last).filter(|idx| self.degrees[*idx] > 2).collect();
        if cuts.is_empty() {
            return vec![self];
        }

        let mut pieces = Vec::new();
        let mut start = 0;
        for end in cuts.into_iter().chain(std::iter::once(last)) {
            pieces.push(MergedRoad {
                pts: self.pts[start..=end].to_vec(),
                nodes: self.nodes[start..=end].to_vec(),
                degrees: self.degrees[start..=end].to_vec(),
                oneway: self.oneway,
                ways: self.ways.clone(),
            });
            start = end;
        }
        pieces
    }

    fn reversed(mut self) -> MergedRoad {
        self.pts.reverse();
        self.nodes.reverse();
        self.degrees.reverse();
        self
    }

    /// `self` ends where `other` starts. The shared point appears once.
    fn append(mut self, other: MergedRoad) -> MergedRoad {
        self.pts.extend(other.pts.into_iter().skip(1));
        self.nodes.extend(other.nodes.into_iter().skip(1));
        self.degrees.extend(other.degrees.into_iter().skip(1));
        self.oneway = self.oneway && other.oneway;
        self.ways.extend(other.ways);
        self
    }

    /// Drops points closer than `epsilon` to the previous kept one. The real last point always
    /// survives, so endpoint nodes are preserved.
    fn remove_short_segments(&mut self, epsilon: Distance) {
        let mut keep: Vec<usize> = vec![0];
        for idx in 1..self.pts.len() {
            let prev = keep[keep.len() - 1];
            if !self.pts[prev].approx_eq(self.pts[idx], epsilon) {
                keep.push(idx);
            } else if idx == self.pts.len() - 1 && prev != 0 {
                let last = keep.len() - 1;
                keep[last] = idx;
            }
        }
        if keep.len() == self.pts.len() {
            return;
        }
        self.pts = keep.iter().map(|i| self.pts[*i]).collect();
        self.nodes = keep.iter().map(|i| self.nodes[*i]).collect();
        self.degrees = keep.iter().map(|i| self.degrees[*i]).collect();
    }
}

/// How two roads get spliced together. `a` is the road being extended, `b` gets absorbed.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Splice {
    AThenB,
    AThenReversedB,
    ReversedAThenB,
    BThenA,
    ReversedBThenA,
    BThenReversedA,
}

impl Splice {
    fn apply(self, a: MergedRoad, b: MergedRoad) -> MergedRoad {
        match self {
            Splice::AThenB => a.append(b),
            Splice::AThenReversedB => a.append(b.reversed()),
            Splice::ReversedAThenB => a.reversed().append(b),
            Splice::BThenA => b.append(a),
            Splice::ReversedBThenA => b.reversed().append(a),
            Splice::BThenReversedA => b.append(a.reversed()),
        }
    }
}

/// Splits ways where other ways join them mid-way, merges every chain through degree-2 nodes,
/// then cleans up the geometry. Roads that end up with fewer than two distinct points are skipped
/// with a warning.
pub fn contract(
    graph: &StreetGraph,
    degrees: &DegreeMap,
    epsilon: Distance,
    timer: &mut Timer,
) -> Vec<MergedRoad> {
    let roads: Vec<MergedRoad> = graph
        .segments
        .iter()
        .flat_map(|s| MergedRoad::from_segment(graph, s, degrees).split_at_intersections())
        .collect();
    if roads.len() > graph.segments.len() {
        info!(
            "Split {} ways into {} pieces at intersections",
            graph.segments.len(),
            roads.len()
        );
    }
    let merged = contract_roads(roads, degrees, epsilon);

    let mut result = Vec::new();
    for mut road in merged {
        road.remove_short_segments(epsilon);
        if road.pts.len() < 2 {
            timer.warn(format!(
                "Road made from {} ways collapsed to a point, skipping it",
                road.ways.len()
            ));
            continue;
        }
        result.push(road);
    }
    result
}

/// Repeatedly splices pairs of roads meeting at a degree-2 node until nothing changes. Roads are
/// scanned in order; when several could absorb the same road, the earliest one wins, and when one
/// road could absorb several, the earliest of those wins. Running this on its own output changes
/// nothing.
pub fn contract_roads(
    roads: Vec<MergedRoad>,
    degrees: &DegreeMap,
    epsilon: Distance,
) -> Vec<MergedRoad> {
    let mut slots: Vec<Option<MergedRoad>> = roads.into_iter().map(Some).collect();
    loop {
        let mut changed = false;
        for idx in 0..slots.len() {
            while let Some((other, splice)) = find_splice(&slots, idx, degrees, epsilon) {
                let a = slots[idx].take();
                let b = slots[other].take();
                if let (Some(a), Some(b)) = (a, b) {
                    slots[idx] = Some(splice.apply(a, b));
                }
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    slots.into_iter().flatten().collect()
}

fn find_splice(
    slots: &[Option<MergedRoad>],
    idx: usize,
    degrees: &DegreeMap,
    epsilon: Distance,
) -> Option<(usize, Splice)> {
    let a = slots[idx].as_ref()?;
    let end_mergeable = degrees.get(a.last_node()) == 2;
    let start_mergeable = degrees.get(a.first_node()) == 2;
    if !end_mergeable && !start_mergeable {
        return None;
    }

    for (other, b) in slots.iter().enumerate() {
        let b = match b {
            Some(b) if other != idx => b,
            _ => continue,
        };

        if end_mergeable {
            let pt = a.last_pt();
            if b.first_pt().approx_eq(pt, epsilon) {
                return Some((other, Splice::AThenB));
            }
            if b.last_pt().approx_eq(pt, epsilon) {
                if !b.oneway {
                    return Some((other, Splice::AThenReversedB));
                }
                if !a.oneway {
                    return Some((other, Splice::BThenReversedA));
                }
            }
        }
        if start_mergeable {
            let pt = a.first_pt();
            if b.last_pt().approx_eq(pt, epsilon) {
                return Some((other, Splice::BThenA));
            }
            if b.first_pt().approx_eq(pt, epsilon) {
                if !b.oneway {
                    return Some((other, Splice::ReversedBThenA));
                }
                if !a.oneway {
                    return Some((other, Splice::ReversedAThenB));
                }
            }
        }
    }
    None
}
