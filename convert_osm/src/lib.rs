//! Reads a street-graph extract and contracts it into merged roads. Chains of ways that meet at
//! through-nodes become one polyline; true intersections and dead ends stay as endpoints.

#[macro_use]
extern crate log;

mod contract;
mod degrees;
mod graph;
mod reader;

pub use crate::contract::{contract, contract_roads, MergedRoad};
pub use crate::degrees::{compute_degrees, DegreeMap};
pub use crate::graph::{MissingNode, Node, NodeIdx, Segment, StreetGraph};
pub use crate::reader::{parse, read, Document, NodeID, Way, WayID};
