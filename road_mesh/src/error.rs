use std::path::PathBuf;

use convert_osm::{MissingNode, NodeID, WayID};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong turning a street graph into a road mesh. Per-road problems
/// (`DegenerateGeometry`, `InvalidPolygon`) skip that road and get recorded as warnings; the rest
/// abort the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{way} references {node}, which isn't in the input")]
    MalformedInput { way: WayID, node: NodeID },

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("no valid road polygons to build a network from")]
    EmptyNetwork,

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("couldn't write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed asset: {0}")]
    MalformedAsset(String),
}

impl From<MissingNode> for Error {
    fn from(err: MissingNode) -> Error {
        Error::MalformedInput {
            way: err.way,
            node: err.node,
        }
    }
}
