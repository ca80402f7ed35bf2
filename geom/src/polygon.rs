use anyhow::{bail, Result};
use geo::algorithm::orient::{Direction, Orient};
use geo::{Area, BooleanOps};
use serde::{Deserialize, Serialize};

use crate::{Pt2D, Ring};

/// An outer ring with zero or more holes. Nothing forces the rings to be simple; callers that
/// need that check `is_simple`.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Polygon {
        Polygon { exterior, holes }
    }

    /// Fixes up an outline that might cross over itself, by running it through the union kernel
    /// alone. Overlapping loops get absorbed; what's left must be simple.
    pub fn repaired(raw_pts: Vec<Pt2D>, kernel: &dyn UnionKernel) -> Result<Vec<Polygon>> {
        let raw = Polygon::new(Ring::deduping_new(raw_pts)?, Vec::new());
        let pieces = kernel.union_all(vec![raw]);
        if pieces.is_empty() {
            bail!("Repairing the outline left nothing");
        }
        if let Some(bad) = pieces.iter().find(|p| !p.is_simple()) {
            bail!(
                "Repaired outline still intersects itself; exterior has {} points",
                bad.exterior.points().len()
            );
        }
        Ok(pieces)
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn holes(&self) -> &Vec<Ring> {
        &self.holes
    }

    /// Usually m^2
    pub fn area(&self) -> f64 {
        // Don't use signed_area, since we may work with polygons that have different orientations
        self.to_geo().unsigned_area()
    }

    /// True if no ring crosses over itself.
    pub fn is_simple(&self) -> bool {
        !self.exterior.self_intersects() && self.holes.iter().all(|r| !r.self_intersects())
    }

    /// Exterior counter-clockwise, holes clockwise.
    pub fn oriented(&self) -> Result<Polygon> {
        Polygon::from_geo(&self.to_geo().orient(Direction::Default))
    }

    pub fn from_geo(poly: &geo::Polygon<f64>) -> Result<Polygon> {
        let exterior = Ring::try_from(poly.exterior())?;
        let mut holes = Vec::new();
        for interior in poly.interiors() {
            match Ring::try_from(interior) {
                Ok(ring) => holes.push(ring),
                // Slivers left over from the boolean ops
                Err(err) => debug!("Skipping a degenerate hole: {}", err),
            }
        }
        Ok(Polygon { exterior, holes })
    }

    /// GeoJSON with the world-space coordinates as-is.
    pub fn to_geojson(&self) -> geojson::Geometry {
        let rings = std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .map(|ring| {
                ring.points()
                    .iter()
                    .map(|pt| vec![pt.x(), pt.y()])
                    .collect()
            })
            .collect();
        geojson::Geometry::new(geojson::Value::Polygon(rings))
    }

    // A less verbose way of invoking the From/Into impl. Note this hides a clone.
    fn to_geo(&self) -> geo::Polygon<f64> {
        self.clone().into()
    }
}

impl From<Polygon> for geo::Polygon<f64> {
    fn from(poly: Polygon) -> Self {
        Self::new(
            poly.exterior.into(),
            poly.holes.into_iter().map(geo::LineString::from).collect(),
        )
    }
}

/// Set-union over polygon interiors. The result may have holes, and disjoint pieces come back as
/// separate polygons.
pub trait UnionKernel {
    fn union_all(&self, polygons: Vec<Polygon>) -> Vec<Polygon>;
}

/// Union through `geo`'s boolean ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoUnion;

impl UnionKernel for GeoUnion {
    fn union_all(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        // Start from nothing, rather than the first polygon, so that even a single input passes
        // through the boolean ops and gets cleaned up.
        let mut result = geo::MultiPolygon::<f64>(Vec::new());
        for p in polygons {
            result = result.union(&geo::MultiPolygon(vec![p.into()]));
        }
        result
            .0
            .iter()
            .filter_map(|p| match Polygon::from_geo(p) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!("Union produced a degenerate polygon: {}", err);
                    None
                }
            })
            .collect()
    }
}
