//! Turns a street graph into a road network mesh: merged road center-lines get thickened into
//! polygons, unioned into one surface, triangulated, and written as a text asset.

#[macro_use]
extern crate log;

mod asset;
mod error;
mod mesh;
mod network;
mod options;

use abstutil::{prettyprint_usize, Timer};
use convert_osm::{compute_degrees, contract, Document, StreetGraph};
use geom::{Projection, Triangulator, UnionKernel};

pub use crate::asset::{Asset, RoadSegment};
pub use crate::error::{Error, Result};
pub use crate::mesh::{build_mesh, Mesh};
pub use crate::network::{compose, ComposeReport, NetworkSurface};
pub use crate::options::Options;

/// Everything one run produces.
pub struct Conversion {
    pub asset: Asset,
    pub report: ComposeReport,
    pub surface: NetworkSurface,
}

/// Runs the whole pipeline on an already-parsed document. Roads that can't be thickened are
/// skipped and recorded as warnings on the `timer`.
pub fn convert(
    doc: &Document,
    opts: &Options,
    projection: &dyn Projection,
    kernel: &dyn UnionKernel,
    triangulator: &dyn Triangulator,
    timer: &mut Timer,
) -> Result<Conversion> {
    timer.start("build street graph");
    let graph = StreetGraph::new(doc, projection);
    timer.stop("build street graph");
    let graph = graph?;
    let degrees = compute_degrees(&graph);
    info!(
        "{} nodes, {} intersections, {} dead ends",
        prettyprint_usize(graph.nodes.len()),
        prettyprint_usize(degrees.intersections().len()),
        prettyprint_usize(degrees.dead_ends().len())
    );

    timer.start("contract roads");
    let roads = contract(&graph, &degrees, opts.merge_epsilon, timer);
    timer.stop("contract roads");
    info!(
        "{} ways contracted into {} roads",
        prettyprint_usize(graph.segments.len()),
        prettyprint_usize(roads.len())
    );

    let mut emitted = Vec::new();
    let mut polygons = Vec::new();
    timer.start_iter("thicken roads", roads.len());
    for road in roads {
        timer.next();
        let pl = match road.to_polyline(opts.merge_epsilon) {
            Ok(pl) => pl,
            Err(err) => {
                timer.warn(
                    Error::DegenerateGeometry(format!("{}: {}", road.ways[0], err)).to_string(),
                );
                continue;
            }
        };
        match pl.make_road_polygons(opts.width(road.oneway), opts.cap_resolution, kernel) {
            Ok(list) => polygons.extend(list),
            Err(err) => {
                timer.warn(
                    Error::InvalidPolygon(format!("{}: {}", road.ways[0], err)).to_string(),
                );
            }
        }
        emitted.push(road);
    }

    let (surface, report) = compose(polygons, kernel, timer)?;

    timer.start("triangulate");
    let mesh = build_mesh(&surface, triangulator);
    timer.stop("triangulate");
    let mesh = mesh?;

    let asset = Asset::new(&graph, &emitted, &surface, mesh);
    info!(
        "Asset has {} nodes, {} roads, {} triangles",
        prettyprint_usize(asset.nodes.len()),
        prettyprint_usize(asset.roads.len()),
        prettyprint_usize(asset.mesh.triangles.len())
    );
    Ok(Conversion {
        asset,
        report,
        surface,
    })
}
