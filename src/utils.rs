use crate::triangulation::TriangulationError;
use crate::types::{Float, Vertex, Vertex2d};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Returns the orientation of an ordered triplet (p, q, r).
pub fn triplet_orientation(p: Vertex, q: Vertex, r: Vertex) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if val == 0. {
        Orientation::Colinear
    } else if val > 0. {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Checks if vertex `p` is strictly inside the circumcircle of the triangle formed by the first
/// three vertices in `triangle`
/// - `triangle` contains the vertices of the triangle.
///     - length of `triangle` **MUST** be >= 3.
///     - `triangle` vertices must be in a counter-clockwise order
/// - `p` vertex to check
///
/// Translates the three triangle vertices so that `p` becomes the origin, lifts them onto the
/// paraboloid `z = x² + y²` and returns the sign of the resulting 3x3 determinant. The sign is
/// only meaningful for counter-clockwise triangles, which the triangulation guarantees by
/// construction.
///
/// A vertex exactly on the circumcircle yields a null determinant and is reported as outside.
#[inline(always)]
pub fn is_vertex_in_triangle_circumcircle(triangle: &[Vertex], p: Vertex) -> bool {
    let ax = triangle[0].x - p.x;
    let ay = triangle[0].y - p.y;
    let az = ax * ax + ay * ay;
    let bx = triangle[1].x - p.x;
    let by = triangle[1].y - p.y;
    let bz = bx * bx + by * by;
    let cx = triangle[2].x - p.x;
    let cy = triangle[2].y - p.y;
    let cz = cx * cx + cy * cy;

    let det = ax * (by * cz - bz * cy) - ay * (bx * cz - bz * cx) + az * (bx * cy - by * cx);
    det > 0.
}

/// Twice the signed area of the triangle (v1, v2, v3), positive when the vertices are in a
/// counter-clockwise order.
#[inline]
pub fn triangle_area_determinant(v1: Vertex, v2: Vertex, v3: Vertex) -> Float {
    v1.x * (v2.y - v3.y) + v2.x * (v3.y - v1.y) + v3.x * (v1.y - v2.y)
}

/// `true` when the three vertices are collinear within floating point tolerance, i.e. when the
/// triangle they form has no area.
#[inline]
pub fn is_flat_triangle(v1: Vertex, v2: Vertex, v3: Vertex) -> bool {
    triangle_area_determinant(v1, v2, v3).abs() < Float::EPSILON
}

/// Checks the input vertices for coordinates that the triangulation cannot process (NaN or
/// infinity). Returns the first offending vertex.
pub fn validate_vertices<T: Vertex2d>(vertices: &[T]) -> Result<(), TriangulationError> {
    for (index, vertex) in vertices.iter().enumerate() {
        if !vertex.x().is_finite() || !vertex.y().is_finite() {
            return Err(TriangulationError::NonFiniteCoordinate {
                index,
                x: vertex.x(),
                y: vertex.y(),
            });
        }
    }
    Ok(())
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
