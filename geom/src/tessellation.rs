use anyhow::{bail, Result};

use crate::{Polygon, Pt2D, Ring};

/// Turns a polygon with holes into triangles.
pub trait Triangulator {
    /// `vertices` is the exterior followed by every hole, none of them closed. `hole_starts` has
    /// the index in `vertices` where each hole begins. Returns groups of three indices into
    /// `vertices`.
    fn triangulate(&self, vertices: &[Pt2D], hole_starts: &[usize]) -> Result<Vec<usize>>;
}

/// Ear clipping through `earcutr`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Earcut;

impl Triangulator for Earcut {
    fn triangulate(&self, vertices: &[Pt2D], hole_starts: &[usize]) -> Result<Vec<usize>> {
        let mut coords = Vec::with_capacity(vertices.len() * 2);
        for pt in vertices {
            coords.push(pt.x());
            coords.push(pt.y());
        }
        match earcutr::earcut(&coords, hole_starts, 2) {
            Ok(indices) => Ok(indices),
            Err(err) => bail!("earcut failed: {:?}", err),
        }
    }
}

/// Lays out the rings the way a `Triangulator` expects: the closing point of each ring is dropped,
/// the exterior comes first, then each hole in order. Returns the vertices and where each hole
/// starts.
pub fn flatten(exterior: &Ring, holes: &[Ring]) -> (Vec<Pt2D>, Vec<usize>) {
    let mut vertices = Vec::new();
    let mut hole_starts = Vec::new();
    push_open(&mut vertices, exterior);
    for hole in holes {
        hole_starts.push(vertices.len());
        push_open(&mut vertices, hole);
    }
    (vertices, hole_starts)
}

fn push_open(vertices: &mut Vec<Pt2D>, ring: &Ring) {
    let pts = ring.points();
    vertices.extend_from_slice(&pts[0..pts.len() - 1]);
}

/// A triangulated polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Tessellation {
    points: Vec<Pt2D>,
    /// Groups of three indices make up the triangles
    indices: Vec<usize>,
}

impl Tessellation {
    pub fn from_polygon(polygon: &Polygon, triangulator: &dyn Triangulator) -> Result<Self> {
        let (points, hole_starts) = flatten(polygon.exterior(), polygon.holes());
        let indices = triangulator.triangulate(&points, &hole_starts)?;
        Tessellation::new(points, indices)
    }

    /// Checks the indices describe whole triangles over `points`.
    pub fn new(points: Vec<Pt2D>, indices: Vec<usize>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            bail!(
                "{} triangle indices isn't a multiple of 3",
                indices.len()
            );
        }
        if let Some(idx) = indices.iter().find(|idx| **idx >= points.len()) {
            bail!(
                "Triangle index {} is out of range for {} points",
                idx,
                points.len()
            );
        }
        Ok(Tessellation { points, indices })
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.points
    }

    pub fn indices(&self) -> &Vec<usize> {
        &self.indices
    }

    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.indices
            .chunks_exact(3)
            .map(|slice| [slice[0], slice[1], slice[2]])
            .collect()
    }

    /// Sum of the triangle areas.
    pub fn area(&self) -> f64 {
        self.triangles()
            .into_iter()
            .map(|[a, b, c]| {
                let pt1 = self.points[a];
                pt1.vec_to(self.points[b])
                    .cross(pt1.vec_to(self.points[c]))
                    .abs()
                    / 2.0
            })
            .sum()
    }

    /// Returns (points, indices)
    pub fn consume(self) -> (Vec<Pt2D>, Vec<usize>) {
        (self.points, self.indices)
    }
}
