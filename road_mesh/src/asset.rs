use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use convert_osm::{MergedRoad, StreetGraph};
use geom::Pt2D;

use crate::{Error, Mesh, NetworkSurface, Result};

/// One merged road, as a pair of indices into the node table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoadSegment {
    pub oneway: bool,
    pub start: usize,
    pub end: usize,
}

/// Everything a renderer needs, in one text file:
///
/// ```text
/// <nodes> <roads>
/// <boundary lines> <mesh vertices> <mesh triangles>
/// <x> <y>                   per node
/// <T|O> <start> <end>       per road, T for two-way and O for one-way
/// <x1> <y1> <x2> <y2>       per boundary edge, exterior first, then each hole
/// <x> <y>                   per mesh vertex
/// <i0> <i1> <i2>            per triangle
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    /// The endpoints of every road, in node ID order. Through-points never show up here.
    pub nodes: Vec<Pt2D>,
    pub roads: Vec<RoadSegment>,
    pub boundary: Vec<(Pt2D, Pt2D)>,
    pub mesh: Mesh,
}

impl Asset {
    pub fn new(
        graph: &StreetGraph,
        roads: &[MergedRoad],
        surface: &NetworkSurface,
        mesh: Mesh,
    ) -> Asset {
        let endpoints: BTreeSet<_> = roads
            .iter()
            .flat_map(|r| [r.first_node(), r.last_node()])
            .collect();
        let index: BTreeMap<_, _> = endpoints
            .iter()
            .enumerate()
            .map(|(idx, node)| (*node, idx))
            .collect();

        Asset {
            nodes: endpoints.iter().map(|n| graph.pt(*n)).collect(),
            roads: roads
                .iter()
                .map(|r| RoadSegment {
                    oneway: r.oneway,
                    start: index[&r.first_node()],
                    end: index[&r.last_node()],
                })
                .collect(),
            boundary: surface.boundary_lines(),
            mesh,
        }
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Everything is formatted before the file is touched, so a failure can't leave a half-written
    /// asset behind from this call. The file is truncated and written in one go.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_text();
        fs_err::write(path, text).map_err(|source| Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Parses the text layout back, checking counts and that every index points somewhere.
    pub fn from_text(raw: &str) -> Result<Asset> {
        let mut lines = Lines::new(raw);

        let header = lines.fields(2, "header")?;
        let (num_nodes, num_roads) = (parse::<usize>(header[0])?, parse::<usize>(header[1])?);
        let header = lines.fields(3, "header")?;
        let (num_boundary, num_vertices, num_triangles) = (
            parse::<usize>(header[0])?,
            parse::<usize>(header[1])?,
            parse::<usize>(header[2])?,
        );

        let mut nodes = Vec::new();
        for _ in 0..num_nodes {
            let f = lines.fields(2, "node")?;
            nodes.push(parse_pt(f[0], f[1])?);
        }

        let mut roads = Vec::new();
        for _ in 0..num_roads {
            let f = lines.fields(3, "road")?;
            let oneway = match f[0] {
                "O" => true,
                "T" => false,
                x => {
                    return Err(Error::MalformedAsset(format!(
                        "road direction {} isn't T or O",
                        x
                    )))
                }
            };
            let road = RoadSegment {
                oneway,
                start: parse_index(f[1], num_nodes)?,
                end: parse_index(f[2], num_nodes)?,
            };
            roads.push(road);
        }

        let mut boundary = Vec::new();
        for _ in 0..num_boundary {
            let f = lines.fields(4, "boundary line")?;
            boundary.push((parse_pt(f[0], f[1])?, parse_pt(f[2], f[3])?));
        }

        let mut vertices = Vec::new();
        for _ in 0..num_vertices {
            let f = lines.fields(2, "mesh vertex")?;
            vertices.push(parse_pt(f[0], f[1])?);
        }

        let mut triangles = Vec::new();
        for _ in 0..num_triangles {
            let f = lines.fields(3, "triangle")?;
            triangles.push([
                parse_index(f[0], num_vertices)?,
                parse_index(f[1], num_vertices)?,
                parse_index(f[2], num_vertices)?,
            ]);
        }

        lines.finish()?;

        Ok(Asset {
            nodes,
            roads,
            boundary,
            mesh: Mesh {
                vertices,
                triangles,
            },
        })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {}", self.nodes.len(), self.roads.len())?;
        writeln!(
            f,
            "{} {} {}",
            self.boundary.len(),
            self.mesh.vertices.len(),
            self.mesh.triangles.len()
        )?;
        for pt in &self.nodes {
            writeln!(f, "{} {}", pt.x(), pt.y())?;
        }
        for road in &self.roads {
            let dir = if road.oneway { "O" } else { "T" };
            writeln!(f, "{} {} {}", dir, road.start, road.end)?;
        }
        for (pt1, pt2) in &self.boundary {
            writeln!(f, "{} {} {} {}", pt1.x(), pt1.y(), pt2.x(), pt2.y())?;
        }
        for pt in &self.mesh.vertices {
            writeln!(f, "{} {}", pt.x(), pt.y())?;
        }
        for [a, b, c] in &self.mesh.triangles {
            writeln!(f, "{} {} {}", a, b, c)?;
        }
        Ok(())
    }
}

struct Lines<'a> {
    iter: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(raw: &'a str) -> Lines<'a> {
        Lines {
            iter: raw.lines().enumerate(),
        }
    }

    fn fields(&mut self, expected: usize, what: &str) -> Result<Vec<&'a str>> {
        let (num, line) = self
            .iter
            .next()
            .ok_or_else(|| Error::MalformedAsset(format!("ran out of lines reading a {}", what)))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != expected {
            return Err(Error::MalformedAsset(format!(
                "line {} should be a {} with {} fields, but it's {:?}",
                num + 1,
                what,
                expected,
                line
            )));
        }
        Ok(fields)
    }

    fn finish(mut self) -> Result<()> {
        match self.iter.find(|(_, line)| !line.trim().is_empty()) {
            Some((num, _)) => Err(Error::MalformedAsset(format!(
                "unexpected content after the mesh at line {}",
                num + 1
            ))),
            None => Ok(()),
        }
    }
}

fn parse<T: FromStr>(raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| Error::MalformedAsset(format!("can't parse {:?}", raw)))
}

fn parse_index(raw: &str, len: usize) -> Result<usize> {
    let idx = parse::<usize>(raw)?;
    if idx >= len {
        return Err(Error::MalformedAsset(format!(
            "index {} is out of range for {} entries",
            idx, len
        )));
    }
    Ok(idx)
}

fn parse_pt(x: &str, y: &str) -> Result<Pt2D> {
    let (x, y) = (parse::<f64>(x)?, parse::<f64>(y)?);
    if !x.is_finite() || !y.is_finite() {
        return Err(Error::MalformedAsset(format!("bad point {}, {}", x, y)));
    }
    Ok(Pt2D::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset() -> Asset {
        Asset {
            nodes: vec![Pt2D::new(0.0, 0.0), Pt2D::new(12.5, 3.0)],
            roads: vec![RoadSegment {
                oneway: false,
                start: 0,
                end: 1,
            }],
            boundary: vec![
                (Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 0.0)),
                (Pt2D::new(1.0, 0.0), Pt2D::new(0.0, 1.0)),
                (Pt2D::new(0.0, 1.0), Pt2D::new(0.0, 0.0)),
            ],
            mesh: Mesh {
                vertices: vec![
                    Pt2D::new(0.0, 0.0),
                    Pt2D::new(1.0, 0.0),
                    Pt2D::new(0.0, 1.0),
                ],
                triangles: vec![[1, 2, 0]],
            },
        }
    }

    #[test]
    fn exact_layout() {
        assert_eq!(
            asset().to_text(),
            "2 1\n\
             3 3 1\n\
             0 0\n\
             12.5 3\n\
             T 0 1\n\
             0 0 1 0\n\
             1 0 0 1\n\
             0 1 0 0\n\
             0 0\n\
             1 0\n\
             0 1\n\
             1 2 0\n"
        );
    }

    #[test]
    fn parse_what_was_written() {
        let a = asset();
        assert_eq!(Asset::from_text(&a.to_text()).unwrap(), a);
    }

    #[test]
    fn parser_catches_mistakes() {
        // Truncated
        assert!(Asset::from_text("2 1\n3 3 1\n0 0\n").is_err());
        // Road pointing at a node that doesn't exist
        let text = asset().to_text().replace("T 0 1", "T 0 2");
        assert!(Asset::from_text(&text).is_err());
        // Unknown direction
        let text = asset().to_text().replace("T 0 1", "X 0 1");
        assert!(Asset::from_text(&text).is_err());
        // Leftovers
        let text = format!("{}5 5\n", asset().to_text());
        assert!(Asset::from_text(&text).is_err());
    }

    #[test]
    fn failed_write_reports_the_path() {
        let dir = std::env::temp_dir().join("road_mesh_no_such_dir");
        let path = dir.join("nested").join("asset.txt");
        match asset().write(&path) {
            Err(Error::WriteFailure { path: p, .. }) => assert_eq!(p, path),
            x => panic!("expected a WriteFailure, got {:?}", x),
        }
    }

    #[test]
    fn rewriting_truncates() {
        let path = std::env::temp_dir().join("road_mesh_truncate_test.txt");
        fs_err::write(&path, "x\n".repeat(1000)).unwrap();
        asset().write(&path).unwrap();
        let raw = fs_err::read_to_string(&path).unwrap();
        assert_eq!(Asset::from_text(&raw).unwrap(), asset());
        fs_err::remove_file(&path).unwrap();
    }
}
