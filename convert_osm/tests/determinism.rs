use abstutil::Timer;
use convert_osm::{compute_degrees, contract, parse, MergedRoad, StreetGraph};
use geom::{HaversineProjection, EPSILON_DIST};

// A small grid: two horizontal streets, three vertical ones, a one-way alley and a dangling
// driveway.
const GRID: &str = r#"{"elements": [
    {"type": "node", "id": 1, "lon": -122.300, "lat": 47.600},
    {"type": "node", "id": 2, "lon": -122.299, "lat": 47.600},
    {"type": "node", "id": 3, "lon": -122.298, "lat": 47.600},
    {"type": "node", "id": 4, "lon": -122.300, "lat": 47.601},
    {"type": "node", "id": 5, "lon": -122.299, "lat": 47.601},
    {"type": "node", "id": 6, "lon": -122.298, "lat": 47.601},
    {"type": "node", "id": 7, "lon": -122.2985, "lat": 47.6015},
    {"type": "node", "id": 8, "lon": -122.2995, "lat": 47.6005},
    {"type": "node", "id": 9, "lon": -122.2993, "lat": 47.6004},
    {"type": "way", "id": 100, "nodes": [1, 2], "tags": {"highway": "residential"}},
    {"type": "way", "id": 101, "nodes": [2, 3], "tags": {"highway": "residential"}},
    {"type": "way", "id": 102, "nodes": [4, 5, 6], "tags": {"highway": "residential"}},
    {"type": "way", "id": 103, "nodes": [1, 4], "tags": {"highway": "residential"}},
    {"type": "way", "id": 104, "nodes": [2, 8, 5], "tags": {"highway": "residential"}},
    {"type": "way", "id": 105, "nodes": [3, 6], "tags": {"highway": "residential"}},
    {"type": "way", "id": 106, "nodes": [6, 7], "tags": {"highway": "service", "oneway": "yes"}},
    {"type": "way", "id": 107, "nodes": [8, 9], "tags": {"highway": "service"}}
]}"#;

fn convert() -> (StreetGraph, Vec<MergedRoad>) {
    let mut timer = Timer::new("convert grid");
    let doc = parse(GRID, &mut timer).unwrap();
    let graph = StreetGraph::new(&doc, &HaversineProjection).unwrap();
    let degrees = compute_degrees(&graph);
    let roads = contract(&graph, &degrees, EPSILON_DIST, &mut timer);
    (graph, roads)
}

#[test]
fn convert_twice() {
    let (graph1, roads1) = convert();
    let (graph2, roads2) = convert();
    assert_eq!(graph1, graph2);
    assert_eq!(roads1, roads2);
}

#[test]
fn grid_contracts_around_intersections() {
    let (graph, roads) = convert();
    let degrees = compute_degrees(&graph);
    // Ways 102 and 104 get cut where others join them mid-way, at nodes 5 and 8. Then the
    // corners at nodes 1, 3 and 4 have degree 2, so five pieces fuse into two roads.
    assert_eq!(roads.len(), 7);
    for road in &roads {
        assert_ne!(degrees.get(road.first_node()), 2);
        assert_ne!(degrees.get(road.last_node()), 2);
        assert!(road.degrees[1..road.degrees.len() - 1]
            .iter()
            .all(|d| *d == 2));
    }
    assert!(roads.iter().any(|r| r.oneway));
    assert!(graph
        .nodes
        .iter()
        .all(|n| n.pt.x() >= 0.0 && n.pt.y() >= 0.0));
}
