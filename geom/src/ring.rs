use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Line, Pt2D};

/// Like a PolyLine, but closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    // first equals last
    pts: Vec<Pt2D>,
}

impl Ring {
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with < 3 distinct points");
        }
        if pts[0] != pts[pts.len() - 1] {
            bail!("Can't make a ring with mismatching first/last points");
        }

        // This checks no lines are too small. Could take the other approach and automatically
        // squish down points here. But callers usually know better what needs to be squished
        // and why; see deduping_new.
        if let Some(pair) = pts.windows(2).find(|pair| pair[0] == pair[1]) {
            bail!("Ring has duplicate adjacent points near {}", pair[0]);
        }

        Ok(Ring { pts })
    }

    /// First dedupes adjacent points, and closes the ring if the input didn't.
    pub fn deduping_new(mut pts: Vec<Pt2D>) -> Result<Self> {
        pts.dedup();
        if pts.len() >= 2 && pts[0] != pts[pts.len() - 1] {
            pts.push(pts[0]);
        }
        Self::new(pts)
    }

    /// Includes the closing point.
    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    /// Every edge, in order, including the one that closes the ring.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    /// Positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for pair in self.pts.windows(2) {
            sum += pair[0].x() * pair[1].y() - pair[1].x() * pair[0].y();
        }
        sum / 2.0
    }

    /// Does any pair of non-adjacent edges cross? This is quadratic, but rings here are the
    /// outline of one road or the result of a union, so they stay manageable.
    pub fn self_intersects(&self) -> bool {
        let lines: Vec<Line> = self.lines().collect();
        let n = lines.len();
        for i in 0..n {
            for j in (i + 2)..n {
                // The first and last edges share the closing point
                if i == 0 && j == n - 1 {
                    continue;
                }
                if lines[i].crosses(&lines[j]) {
                    return true;
                }
            }
        }
        false
    }
}

impl From<Ring> for geo::LineString<f64> {
    fn from(ring: Ring) -> Self {
        let coords = ring
            .pts
            .into_iter()
            .map(geo::Coordinate::from)
            .collect::<Vec<_>>();
        Self(coords)
    }
}

impl TryFrom<&geo::LineString<f64>> for Ring {
    type Error = anyhow::Error;

    fn try_from(line_string: &geo::LineString<f64>) -> Result<Self> {
        Ring::deduping_new(line_string.coords().map(|c| Pt2D::from(*c)).collect())
    }
}
