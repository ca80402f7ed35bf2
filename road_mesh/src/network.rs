use ordered_float::OrderedFloat;
use serde::Serialize;

use abstutil::{prettyprint_usize, Timer};
use geom::{Polygon, Pt2D, Ring, UnionKernel};

use crate::{Error, Result};

/// The union of every road polygon, restricted to one connected piece. The exterior winds
/// counter-clockwise and holes clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkSurface {
    polygon: Polygon,
}

/// What happened while composing the network. A disconnected network isn't an error, but callers
/// may want to treat it as one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComposeReport {
    pub input_polygons: usize,
    /// Road polygons that weren't simple, dropped before the union
    pub discarded_invalid: usize,
    /// Disjoint pieces the union produced. Only the largest is kept.
    pub components: usize,
    /// Total area of the pieces that weren't kept, in m^2
    pub discarded_area: f64,
}

impl ComposeReport {
    pub fn is_disconnected(&self) -> bool {
        self.components > 1
    }
}

impl NetworkSurface {
    pub fn exterior(&self) -> &Ring {
        self.polygon.exterior()
    }

    pub fn holes(&self) -> &Vec<Ring> {
        self.polygon.holes()
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// m^2
    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    /// Every edge of the exterior in order, then every edge of each hole.
    pub fn boundary_lines(&self) -> Vec<(Pt2D, Pt2D)> {
        std::iter::once(self.exterior())
            .chain(self.holes().iter())
            .flat_map(|ring| ring.lines().map(|l| (l.pt1(), l.pt2())))
            .collect()
    }

    /// For inspecting the network in any GeoJSON viewer. Coordinates are the local frame in
    /// meters, not WGS84.
    pub fn to_geojson(&self) -> geojson::GeoJson {
        let mut properties = serde_json::Map::new();
        properties.insert("area".to_string(), self.area().into());
        properties.insert("holes".to_string(), self.holes().len().into());
        geojson::GeoJson::FeatureCollection(geojson::FeatureCollection {
            bbox: None,
            features: vec![geojson::Feature {
                bbox: None,
                geometry: Some(self.polygon.to_geojson()),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }],
            foreign_members: None,
        })
    }
}

/// Unions the road polygons into one surface. Polygons that still cross themselves are dropped
/// first; if the union falls apart into several pieces, the one with the most area wins.
pub fn compose(
    polygons: Vec<Polygon>,
    kernel: &dyn UnionKernel,
    timer: &mut Timer,
) -> Result<(NetworkSurface, ComposeReport)> {
    let input_polygons = polygons.len();
    let mut valid = Vec::new();
    for (idx, polygon) in polygons.into_iter().enumerate() {
        if polygon.is_simple() {
            valid.push(polygon);
        } else {
            timer.warn(
                Error::InvalidPolygon(format!("road polygon #{} intersects itself", idx))
                    .to_string(),
            );
        }
    }
    let discarded_invalid = input_polygons - valid.len();
    if valid.is_empty() {
        return Err(Error::EmptyNetwork);
    }

    let span = format!("union {} polygons", prettyprint_usize(valid.len()));
    timer.start(span.clone());
    let pieces = kernel.union_all(valid);
    timer.stop(span);

    let components = pieces.len();
    let total_area: f64 = pieces.iter().map(|p| p.area()).sum();
    let largest = pieces
        .into_iter()
        .max_by_key(|p| OrderedFloat(p.area()))
        .ok_or(Error::EmptyNetwork)?;
    let polygon = largest
        .oriented()
        .map_err(|err| Error::InvalidPolygon(err.to_string()))?;

    let report = ComposeReport {
        input_polygons,
        discarded_invalid,
        components,
        discarded_area: total_area - polygon.area(),
    };
    if report.is_disconnected() {
        timer.note(format!(
            "Network has {} disjoint pieces; keeping the largest, dropping {:.1} m^2",
            components, report.discarded_area
        ));
    }
    Ok((NetworkSurface { polygon }, report))
}
