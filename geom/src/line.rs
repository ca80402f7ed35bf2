use crate::{Distance, Pt2D};

/// Segment, technically
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn length(&self) -> Distance {
        self.0.dist_to(self.1)
    }

    /// True if the two segments properly cross. Touching at an endpoint or overlapping while
    /// collinear doesn't count.
    pub fn crosses(&self, other: &Line) -> bool {
        // From http://bryceboe.com/2006/10/23/line-segment-intersection-algorithm/
        let o1 = orientation(self.0, self.1, other.0);
        let o2 = orientation(self.0, self.1, other.1);
        let o3 = orientation(other.0, other.1, self.0);
        let o4 = orientation(other.0, other.1, self.1);
        o1 * o2 < 0.0 && o3 * o4 < 0.0
    }
}

/// Positive when `c` is to the left of the ray from `a` through `b`, negative to the right, zero
/// if collinear.
fn orientation(a: Pt2D, b: Pt2D, c: Pt2D) -> f64 {
    a.vec_to(b).cross(a.vec_to(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let l1 = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 10.0));
        let l2 = Line::new(Pt2D::new(0.0, 10.0), Pt2D::new(10.0, 0.0));
        assert!(l1.crosses(&l2));
    }

    #[test]
    fn touching_and_parallel_dont_cross() {
        let l1 = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 0.0));
        let touching = Line::new(Pt2D::new(10.0, 0.0), Pt2D::new(10.0, 5.0));
        let parallel = Line::new(Pt2D::new(0.0, 1.0), Pt2D::new(10.0, 1.0));
        assert!(!l1.crosses(&touching));
        assert!(!l1.crosses(&parallel));
        assert_eq!(l1.length(), Distance::meters(10.0));
    }
}
