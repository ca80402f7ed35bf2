use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Distance, Pt2D};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// Haversine distance
    pub fn gps_dist_meters(self, other: LonLat) -> Distance {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(EARTH_RADIUS_M * c)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// Maps GPS coordinates into a planar frame measured in meters. Must be a pure function, so every
/// road projected during one run shares the same frame.
pub trait Projection {
    fn project(&self, gps: LonLat) -> Pt2D;
}

/// x is the distance along the equator from the prime meridian to the longitude, y is the
/// distance along the prime meridian from the equator to the latitude. Both keep the sign of the
/// input, so points west or south of the origin don't fold over.
#[derive(Clone, Copy, Debug, Default)]
pub struct HaversineProjection;

impl Projection for HaversineProjection {
    fn project(&self, gps: LonLat) -> Pt2D {
        let origin = LonLat::new(0.0, 0.0);
        let x = origin
            .gps_dist_meters(LonLat::new(gps.longitude, 0.0))
            .inner_meters();
        let y = origin
            .gps_dist_meters(LonLat::new(0.0, gps.latitude))
            .inner_meters();
        Pt2D::new(
            x.copysign(gps.longitude),
            y.copysign(gps.latitude),
        )
    }
}

/// The smallest x and y of a set of projected points. Subtracting it anchors the frame near
/// (0, 0) with no negative coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalOffset {
    pub min_x: f64,
    pub min_y: f64,
}

impl GlobalOffset {
    /// None if there are no points.
    pub fn from_points<I: IntoIterator<Item = Pt2D>>(pts: I) -> Option<GlobalOffset> {
        let mut result: Option<GlobalOffset> = None;
        for pt in pts {
            result = Some(match result {
                Some(o) => GlobalOffset {
                    min_x: o.min_x.min(pt.x()),
                    min_y: o.min_y.min(pt.y()),
                },
                None => GlobalOffset {
                    min_x: pt.x(),
                    min_y: pt.y(),
                },
            });
        }
        result
    }

    pub fn apply(self, pt: Pt2D) -> Pt2D {
        pt.offset(-self.min_x, -self.min_y)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn one_degree_along_the_equator() {
        let d = LonLat::new(0.0, 0.0).gps_dist_meters(LonLat::new(1.0, 0.0));
        // 2 * pi * R / 360
        assert_relative_eq!(d.inner_meters(), 111_194.93, epsilon = 0.01);
    }

    #[test]
    fn projection_keeps_sign_and_is_stable() {
        let proj = HaversineProjection;
        let east = proj.project(LonLat::new(0.5, 0.25));
        let west = proj.project(LonLat::new(-0.5, -0.25));
        assert_relative_eq!(east.x(), -west.x());
        assert_relative_eq!(east.y(), -west.y());
        assert!(east.x() > east.y());
        assert_eq!(east, proj.project(LonLat::new(0.5, 0.25)));
    }

    #[test]
    fn global_offset() {
        assert_eq!(GlobalOffset::from_points(Vec::new()), None);
        let offset = GlobalOffset::from_points(vec![
            Pt2D::new(10.0, -3.0),
            Pt2D::new(4.0, 7.0),
            Pt2D::new(12.0, 1.0),
        ])
        .unwrap();
        assert_eq!(offset.apply(Pt2D::new(4.0, -3.0)), Pt2D::new(0.0, 0.0));
        assert_eq!(offset.apply(Pt2D::new(12.0, 7.0)), Pt2D::new(8.0, 10.0));
    }
}
