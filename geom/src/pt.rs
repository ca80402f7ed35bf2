use std::{fmt, ops};

use serde::{Deserialize, Serialize};

use crate::Distance;

/// This represents world-space in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D {}, {}", x, y);
        }

        Pt2D { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn offset(self, dx: f64, dy: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.y + dy)
    }

    /// The vector pointing from this point to `to`.
    pub fn vec_to(self, to: Pt2D) -> Vec2 {
        Vec2::new(to.x - self.x, to.y - self.y)
    }

    pub fn dist_to(self, to: Pt2D) -> Distance {
        Distance::meters(self.vec_to(to).length())
    }

    /// True if the two points are no further apart than `threshold`. A zero threshold means exact
    /// equality.
    pub fn approx_eq(self, other: Pt2D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x, self.y)
    }
}

impl ops::Add<Vec2> for Pt2D {
    type Output = Pt2D;

    fn add(self, v: Vec2) -> Pt2D {
        self.offset(v.x, v.y)
    }
}

impl From<Pt2D> for geo::Coordinate<f64> {
    fn from(pt: Pt2D) -> Self {
        geo::Coordinate { x: pt.x, y: pt.y }
    }
}

impl From<geo::Coordinate<f64>> for Pt2D {
    fn from(coord: geo::Coordinate<f64>) -> Self {
        Pt2D::new(coord.x, coord.y)
    }
}

/// A direction and magnitude in the local frame. Unlike `Pt2D`, nothing is anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Scales to the given length, keeping the direction. The zero vector has no direction, so it
    /// stays zero.
    pub fn scaled_to(self, size: f64) -> Vec2 {
        let norm = self.length();
        if norm == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / norm * size, self.y / norm * size)
    }

    pub fn normalized(self) -> Vec2 {
        self.scaled_to(1.0)
    }

    /// Counter-clockwise rotation
    pub fn rotate(self, radians: f64) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the 3D cross product. Positive when `other` turns left from `self`.
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl ops::Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}
