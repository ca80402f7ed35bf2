use geom::{Pt2D, Tessellation, Triangulator};

use crate::{Error, NetworkSurface, Result};

/// The triangulated network surface. Vertices are the exterior ring, then each hole, without
/// closing points.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Pt2D>,
    pub triangles: Vec<[usize; 3]>,
}

pub fn build_mesh(surface: &NetworkSurface, triangulator: &dyn Triangulator) -> Result<Mesh> {
    let tessellation = Tessellation::from_polygon(surface.polygon(), triangulator)
        .map_err(|err| Error::Triangulation(err.to_string()))?;
    let triangles = tessellation.triangles();
    if triangles.is_empty() {
        return Err(Error::Triangulation(format!(
            "no triangles for a surface of {} m^2",
            surface.area()
        )));
    }
    debug!(
        "{} triangles cover {:.1} of {:.1} m^2",
        triangles.len(),
        tessellation.area(),
        surface.area()
    );
    let (vertices, _) = tessellation.consume();
    Ok(Mesh {
        vertices,
        triangles,
    })
}
