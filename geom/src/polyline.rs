use std::f64::consts::{FRAC_PI_2, PI};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Distance, Line, Polygon, Pt2D, UnionKernel, Vec2, EPSILON_DIST};

/// Round caps are never coarser than this many steps over the half circle.
pub const MIN_CAP_RESOLUTION: usize = 8;

// When incoming + outgoing is shorter than this, the line doubles back on itself and there's no
// bisector to offset along.
const REVERSAL_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
}

impl PolyLine {
    /// Needs at least two points, and every segment must be longer than `EPSILON_DIST`.
    pub fn new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        PolyLine::with_tolerance(pts, EPSILON_DIST)
    }

    /// Like `new`, but segments only need to be longer than `epsilon`. Zero still rejects
    /// repeated points.
    pub fn with_tolerance(pts: Vec<Pt2D>, epsilon: Distance) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine");
        }
        if let Some(pair) = pts
            .windows(2)
            .find(|pair| pair[0].approx_eq(pair[1], epsilon))
        {
            bail!(
                "PolyLine has a zero-length segment between {} and {}",
                pair[0],
                pair[1]
            );
        }
        Ok(PolyLine { pts })
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    pub fn length(&self) -> Distance {
        self.lines()
            .fold(Distance::ZERO, |so_far, l| so_far + l.length())
    }

    /// The closed outline of a road following this center-line, before any repair. The ring is
    /// the start cap, the left edge walking forwards, the end cap, then the right edge walking
    /// backwards. The first point is repeated at the end.
    ///
    /// Each interior joint is offset along the bisector of the incoming and outgoing directions.
    /// Sharper turns push the joint further out, so the edges don't pinch in.
    pub fn road_outline(&self, width: Distance, cap_resolution: usize) -> Vec<Pt2D> {
        let half_width = width.inner_meters() / 2.0;
        let cap_resolution = cap_resolution.max(MIN_CAP_RESOLUTION);

        let mut first_edge_track = Vec::new();
        let mut second_edge_track = Vec::new();
        for triple in self.pts.windows(3) {
            let incoming = triple[0].vec_to(triple[1]).normalized();
            let outgoing = triple[1].vec_to(triple[2]).normalized();
            let bisector = incoming + outgoing;

            let offset = if bisector.length() < REVERSAL_EPSILON {
                incoming.scaled_to(half_width)
            } else {
                bisector.scaled_to(half_width + miter_extra(half_width, incoming, outgoing))
            };

            first_edge_track.push(triple[1] + offset.rotate(FRAC_PI_2));
            second_edge_track.push(triple[1] + offset.rotate(-FRAC_PI_2));
        }

        let n = self.pts.len();
        let start_dir = self.pts[0].vec_to(self.pts[1]);
        let end_dir = self.pts[n - 2].vec_to(self.pts[n - 1]);

        // The start cap is the end cap of the reversed line, so it sweeps from the right edge,
        // around the back, to the left edge.
        let mut ring = round_cap(self.pts[0], -start_dir, half_width, cap_resolution);
        ring.extend(first_edge_track);
        ring.extend(round_cap(
            self.pts[n - 1],
            end_dir,
            half_width,
            cap_resolution,
        ));
        second_edge_track.reverse();
        ring.extend(second_edge_track);
        ring.push(ring[0]);
        ring
    }

    /// Thickens the center-line into the road surface. Usually one polygon, but repairing a
    /// badly tangled outline can split it into several.
    pub fn make_road_polygons(
        &self,
        width: Distance,
        cap_resolution: usize,
        kernel: &dyn UnionKernel,
    ) -> Result<Vec<Polygon>> {
        if width <= Distance::ZERO {
            bail!("Can't make a road with width {}", width);
        }
        Polygon::repaired(self.road_outline(width, cap_resolution), kernel)
    }
}

/// How much further than `half_width` to push the joint between two segments. 0 when the
/// directions match, growing with `1 - cos(turn angle)` up to `2 * half_width` for a U-turn. Both
/// directions must be unit vectors.
pub fn miter_extra(half_width: f64, incoming: Vec2, outgoing: Vec2) -> f64 {
    half_width * (1.0 - incoming.dot(outgoing))
}

/// Half circle of radius `half_width` around `center`, starting on the left of `direction`,
/// sweeping clockwise through the tip, and ending on the right. Has `steps + 1` points.
fn round_cap(center: Pt2D, direction: Vec2, half_width: f64, steps: usize) -> Vec<Pt2D> {
    let left = direction.scaled_to(half_width).rotate(FRAC_PI_2);
    (0..=steps)
        .map(|i| center + left.rotate(-PI * (i as f64) / (steps as f64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::GeoUnion;

    fn pl(raw: Vec<(f64, f64)>) -> PolyLine {
        PolyLine::new(raw.into_iter().map(|(x, y)| Pt2D::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(PolyLine::new(vec![Pt2D::new(1.0, 1.0)]).is_err());
        assert!(PolyLine::new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(5.0, 0.0),
            Pt2D::new(5.0, 0.0),
        ])
        .is_err());
        assert_eq!(pl(vec![(0.0, 0.0), (3.0, 4.0)]).length(), Distance::meters(5.0));

        let short = vec![Pt2D::new(0.0, 0.0), Pt2D::new(0.0005, 0.0)];
        assert!(PolyLine::new(short.clone()).is_err());
        assert!(PolyLine::with_tolerance(short, Distance::meters(0.0001)).is_ok());
        let repeated = vec![Pt2D::new(1.0, 1.0), Pt2D::new(1.0, 1.0)];
        assert!(PolyLine::with_tolerance(repeated, Distance::ZERO).is_err());
    }

    #[test]
    fn outlines_are_closed() {
        let width = Distance::meters(6.0);
        for line in vec![
            pl(vec![(0.0, 0.0), (100.0, 0.0)]),
            pl(vec![(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]),
            // Nearly doubles back on itself
            pl(vec![(0.0, 0.0), (50.0, 0.0), (0.0, 1.0)]),
            pl(vec![(0.0, 0.0), (50.0, 0.0), (0.0, 0.0)]),
        ] {
            let outline = line.road_outline(width, 16);
            assert_eq!(outline[0], *outline.last().unwrap());
            // Two caps with 17 points each, one point per side for every joint, and the closing
            // point
            assert_eq!(outline.len(), 2 * 17 + 2 * (line.points().len() - 2) + 1);
        }
    }

    #[test]
    fn straight_road_edges_are_parallel_and_one_width_apart() {
        let outline = pl(vec![(10.0, 10.0), (110.0, 10.0)]).road_outline(Distance::meters(6.0), 8);
        // start cap: 0..=8, end cap: 9..=17
        let left_start = outline[8];
        let left_end = outline[9];
        let right_end = outline[17];
        let right_start = outline[0];

        assert_relative_eq!(left_start.y(), 13.0, epsilon = 1e-9);
        assert_relative_eq!(left_end.y(), 13.0, epsilon = 1e-9);
        assert_relative_eq!(right_end.y(), 7.0, epsilon = 1e-9);
        assert_relative_eq!(right_start.y(), 7.0, epsilon = 1e-9);
        assert_relative_eq!(left_start.x(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(left_end.x(), 110.0, epsilon = 1e-9);

        let left = left_start.vec_to(left_end);
        let right = right_end.vec_to(right_start);
        assert_relative_eq!(left.cross(right), 0.0, epsilon = 1e-6);
        assert_relative_eq!(left_start.dist_to(right_start).inner_meters(), 6.0, epsilon = 1e-9);

        // The caps bulge out by half the width
        assert_relative_eq!(outline[4].x(), 7.0, epsilon = 1e-9);
        assert_relative_eq!(outline[13].x(), 113.0, epsilon = 1e-9);
    }

    #[test]
    fn right_angle_joint() {
        let outline = pl(vec![(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)])
            .road_outline(Distance::meters(6.0), 8);
        // Left turn. Both joints sit 3 + 3 * (1 - cos 90) = 6 away along the diagonal.
        let d = 6.0 / 2.0_f64.sqrt();
        let left_joint = outline[9];
        let right_joint = outline[outline.len() - 2];
        assert_relative_eq!(left_joint.x(), 50.0 - d, epsilon = 1e-9);
        assert_relative_eq!(left_joint.y(), d, epsilon = 1e-9);
        assert_relative_eq!(right_joint.x(), 50.0 + d, epsilon = 1e-9);
        assert_relative_eq!(right_joint.y(), -d, epsilon = 1e-9);
    }

    #[test]
    fn miter_extra_grows_with_the_turn() {
        let incoming = Vec2::new(1.0, 0.0);
        assert_eq!(miter_extra(3.0, incoming, incoming), 0.0);
        assert_relative_eq!(miter_extra(3.0, incoming, -incoming), 6.0);

        let mut last = -1.0;
        for deg in (0..=180).step_by(5) {
            let outgoing = incoming.rotate((deg as f64).to_radians());
            let extra = miter_extra(3.0, incoming, outgoing);
            assert!(extra >= last - 1e-12, "{} at {} degrees", extra, deg);
            assert_relative_eq!(
                extra,
                3.0 * (1.0 - (deg as f64).to_radians().cos()),
                epsilon = 1e-9
            );
            last = extra;
        }
    }

    #[test]
    fn cap_resolution_is_clamped() {
        let line = pl(vec![(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(
            line.road_outline(Distance::meters(2.0), 2),
            line.road_outline(Distance::meters(2.0), MIN_CAP_RESOLUTION)
        );
    }

    #[test]
    fn road_polygon_area() {
        let polygons = pl(vec![(0.0, 0.0), (100.0, 0.0)])
            .make_road_polygons(Distance::meters(6.0), 64, &GeoUnion)
            .unwrap();
        assert_eq!(polygons.len(), 1);
        assert!(polygons[0].holes().is_empty());
        // A 100x6 rectangle plus a nearly-full circle of radius 3
        let expected = 600.0 + std::f64::consts::PI * 9.0;
        assert_relative_eq!(polygons[0].area(), expected, max_relative = 0.01);

        assert!(pl(vec![(0.0, 0.0), (100.0, 0.0)])
            .make_road_polygons(Distance::ZERO, 16, &GeoUnion)
            .is_err());
    }
}
