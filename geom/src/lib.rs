//! 2D geometry for turning street center-lines into a road surface: points and vectors in a local
//! metric frame, GPS projection, polylines with width, polygons backed by `geo` for boolean
//! operations, and triangulation through earcut.

#[macro_use]
extern crate log;

mod distance;
mod gps;
mod line;
mod polygon;
mod polyline;
mod pt;
mod ring;
mod tessellation;

pub use crate::distance::Distance;
pub use crate::gps::{GlobalOffset, HaversineProjection, LonLat, Projection};
pub use crate::line::Line;
pub use crate::polygon::{GeoUnion, Polygon, UnionKernel};
pub use crate::polyline::{miter_extra, PolyLine, MIN_CAP_RESOLUTION};
pub use crate::pt::{Pt2D, Vec2};
pub use crate::ring::Ring;
pub use crate::tessellation::{flatten, Earcut, Tessellation, Triangulator};

/// About as small as distances between distinct points in the local frame get. Endpoints closer
/// than this are the same place, and segments shorter than this are degenerate.
pub const EPSILON_DIST: Distance = Distance::const_meters(0.001);
