use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Timer};
use geom::LonLat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeID(pub i64);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/node/{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WayID(pub i64);

impl fmt::Display for WayID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/way/{}", self.0)
    }
}

/// Everything needed from the extract. Tunnels are already gone.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub nodes: BTreeMap<NodeID, LonLat>,
    pub ways: BTreeMap<WayID, Way>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Way {
    /// At least two
    pub nodes: Vec<NodeID>,
    pub oneway: bool,
}

// The Overpass JSON shape. Relations and anything else are skipped.
#[derive(Deserialize)]
struct Overpass {
    elements: Vec<Element>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: i64,
        lon: f64,
        lat: f64,
    },
    Way {
        id: i64,
        nodes: Vec<i64>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// A tag counts as set if the key is present with anything other than "no".
fn tag_is_set(tags: &BTreeMap<String, String>, key: &str) -> bool {
    tags.get(key).map(|v| v != "no").unwrap_or(false)
}

pub fn read(path: &str, timer: &mut Timer) -> Result<Document> {
    timer.start(format!("read {}", path));
    let raw = fs_err::read_to_string(path)?;
    timer.stop(format!("read {}", path));
    parse(&raw, timer).with_context(|| format!("parsing {}", path))
}

/// Parses an Overpass-style JSON document. Ways referencing missing nodes are kept here; that's
/// caught when building the graph.
pub fn parse(raw: &str, timer: &mut Timer) -> Result<Document> {
    timer.start("scrape objects");
    let overpass: Overpass = serde_json::from_str(raw)?;

    let mut doc = Document {
        nodes: BTreeMap::new(),
        ways: BTreeMap::new(),
    };
    let mut tunnels = 0;
    for element in overpass.elements {
        match element {
            Element::Node { id, lon, lat } => {
                let id = NodeID(id);
                if doc.nodes.insert(id, LonLat::new(lon, lat)).is_some() {
                    bail!("Duplicate {}, your .json is corrupt", id);
                }
            }
            Element::Way { id, nodes, tags } => {
                let id = WayID(id);
                if doc.ways.contains_key(&id) {
                    bail!("Duplicate {}, your .json is corrupt", id);
                }
                if tag_is_set(&tags, "tunnel") {
                    tunnels += 1;
                    continue;
                }
                if nodes.len() < 2 {
                    timer.warn(format!(
                        "{} has {} nodes, skipping it",
                        id,
                        nodes.len()
                    ));
                    continue;
                }
                doc.ways.insert(
                    id,
                    Way {
                        nodes: nodes.into_iter().map(NodeID).collect(),
                        oneway: tag_is_set(&tags, "oneway"),
                    },
                );
            }
            Element::Other => {}
        }
    }
    info!(
        "Found {} nodes and {} ways, skipped {} tunnels",
        prettyprint_usize(doc.nodes.len()),
        prettyprint_usize(doc.ways.len()),
        prettyprint_usize(tunnels)
    );
    timer.stop("scrape objects");

    Ok(doc)
}
