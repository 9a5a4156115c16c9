use hashbrown::HashMap;
use thiserror::Error;

use crate::types::{Edge, Float, TriangleData, TriangleId, Triangles, Vertex, Vertex2d, VertexId};
use crate::utils::{
    is_flat_triangle, is_vertex_in_triangle_circumcircle, triplet_orientation, validate_vertices,
    Orientation,
};

#[cfg(feature = "progress_log")]
use tracing::info;

/// Vertices closer than this distance on both axes (in normalized coordinates) are considered
/// to be the same vertex by default.
pub const DEFAULT_VERTEX_MERGE_TOLERANCE: Float = Float::EPSILON;

pub const CONTAINER_TRIANGLE_COORDINATE: Float = 5.;

/// Vertices of the container triangle, in a counter-clockwise order.
///
/// Input vertices are normalized to the unit square beforehand, so these coordinates always put
/// the container corners at a considerable distance from the vertices to triangulate.
pub const CONTAINER_TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(
        -CONTAINER_TRIANGLE_COORDINATE,
        -CONTAINER_TRIANGLE_COORDINATE,
    ),
    Vertex::new(
        CONTAINER_TRIANGLE_COORDINATE,
        -CONTAINER_TRIANGLE_COORDINATE,
    ),
    Vertex::new(0., CONTAINER_TRIANGLE_COORDINATE),
];

#[derive(Clone, Debug)]
pub struct TriangulationConfiguration {
    /// Vertices closer than this distance on both axes (in normalized coordinates) are merged:
    /// only the first of them takes part in the triangulation.
    pub vertex_merge_tolerance: Float,
    /// When enabled, triangles with a null area are filtered out of the triangulation output.
    pub filter_collinear_triangles: bool,
}
impl Default for TriangulationConfiguration {
    fn default() -> Self {
        Self {
            vertex_merge_tolerance: DEFAULT_VERTEX_MERGE_TOLERANCE,
            filter_collinear_triangles: true,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TriangulationError {
    #[error("vertex {index} has a non-finite coordinate: ({x}, {y})")]
    NonFiniteCoordinate { index: usize, x: Float, y: Float },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Triangulation {
    /// Indices of the original vertices by groups of 3 to form triangles, in mesh order.
    pub triangles: Vec<[VertexId; 3]>,
}

/// Creates a Delaunay triangulation with the input vertices, using the incremental
/// Bowyer-Watson algorithm.
///
/// Vertices are inserted in their input order. Vertices that are identical (or closer than
/// [TriangulationConfiguration::vertex_merge_tolerance]) will be "merged" together: only the
/// first of them will appear in the triangulation.
///
/// Vertices are expected to be finite floating point values. NaN or infinite coordinates are
/// rejected with [TriangulationError::NonFiniteCoordinate].
///
/// Inputs with fewer than 3 vertices, or whose vertices are all coincident, produce an empty
/// triangulation.
pub fn triangulation_from_2d_vertices<T: Vertex2d>(
    vertices: &[T],
    config: TriangulationConfiguration,
) -> Result<Triangulation, TriangulationError> {
    validate_vertices(vertices)?;

    if vertices.len() < 3 {
        return Ok(Triangulation::default());
    }

    // Uniformly scale the coordinates of the points so that they all lie between 0 and 1.
    let (mut normalized_vertices, scale_factor, _x_min, _y_min) =
        normalize_vertices_coordinates(vertices);
    if scale_factor <= 0. {
        // All the input vertices coincide
        return Ok(Triangulation::default());
    }

    let (triangles, min_container_vertex_id) =
        wrap_and_triangulate_2d_normalized_vertices(&mut normalized_vertices, &config);

    let vert_indices = remove_wrapping(
        &triangles,
        &normalized_vertices,
        min_container_vertex_id,
        &config,
    );

    Ok(Triangulation {
        triangles: vert_indices,
    })
}

/// This scaling ensures that all of the coordinates are between 0 and 1 but does not modify the
/// relative positions of the points in the x-y plane.
/// The use of normalized coordinates, although not essential, reduces the effects of roundoff
/// error and allows the container triangle to be derived from the actual input extent instead
/// of a fixed absolute size.
pub(crate) fn normalize_vertices_coordinates<T: Vertex2d>(
    vertices: &[T],
) -> (Vec<Vertex>, Float, Float, Float) {
    let mut normalized_vertices = Vec::with_capacity(vertices.len());
    let (mut x_min, mut y_min, mut x_max, mut y_max) =
        (Float::MAX, Float::MAX, Float::MIN, Float::MIN);

    for vertex in vertices.iter() {
        if vertex.x() < x_min {
            x_min = vertex.x();
        }
        if vertex.x() > x_max {
            x_max = vertex.x();
        }
        if vertex.y() < y_min {
            y_min = vertex.y();
        }
        if vertex.y() > y_max {
            y_max = vertex.y();
        }
    }

    let scale_factor = (x_max - x_min).max(y_max - y_min);

    for vertex in vertices.iter() {
        normalized_vertices.push(Vertex {
            x: (vertex.x() - x_min) / scale_factor,
            y: (vertex.y() - y_min) / scale_factor,
        });
    }

    (normalized_vertices, scale_factor, x_min, y_min)
}

/// Selects three dummy points to form a container triangle that completely encompasses all of
/// the points to be triangulated. This container triangle initially defines a Delaunay
/// triangulation which is comprised of a single triangle.
pub(crate) fn add_container_triangle_vertices(
    vertices: &mut Vec<Vertex>,
) -> (TriangleData, VertexId) {
    let min_container_vertex_id = vertices.len() as VertexId;
    let container_triangle = TriangleData::new([
        min_container_vertex_id,
        min_container_vertex_id + 1,
        min_container_vertex_id + 2,
    ]);
    vertices.extend(CONTAINER_TRIANGLE_VERTICES);
    (container_triangle, min_container_vertex_id)
}

pub(crate) fn find_existing_close_vertex(
    triangle: &TriangleData,
    triangle_verts: &[Vertex; 3],
    vertex: Vertex,
    tolerance: Float,
) -> Option<VertexId> {
    for (vertex_index, triangle_vertex) in triangle_verts.iter().enumerate() {
        let dist = *triangle_vertex - vertex;
        if dist.x.abs() < tolerance && dist.y.abs() < tolerance {
            return Some(triangle.verts[vertex_index]);
        }
    }
    None
}

/// - `vertices` should be normalized with their coordinates in [0,1]
pub(crate) fn wrap_and_triangulate_2d_normalized_vertices(
    vertices: &mut Vec<Vertex>,
    config: &TriangulationConfiguration,
) -> (Triangles, VertexId) {
    let (container_triangle, min_container_vertex_id) = add_container_triangle_vertices(vertices);

    let mut triangles = Triangles::with_capacity(2 * min_container_vertex_id as usize + 1);
    triangles.push(container_triangle);

    // Those buffers are used by all the insertion steps. We create them here to share the
    // allocations between all those steps as an optimization.
    let mut bad_triangles: Vec<TriangleId> = Vec::new();
    let mut edge_counts: HashMap<Edge, u32> = HashMap::new();
    let mut boundary_edges: Vec<Edge> = Vec::new();

    // Loop over all the input vertices, in input order
    for vertex_id in 0..min_container_vertex_id {
        let vertex = vertices[vertex_id as usize];

        bad_triangles.clear();
        edge_counts.clear();
        boundary_edges.clear();

        // Triangles whose circumcircle strictly contains the new vertex do not satisfy the
        // Delaunay property anymore and delimit the cavity to retriangulate.
        for (triangle_id, triangle) in triangles.buffer().iter().enumerate() {
            if is_vertex_in_triangle_circumcircle(&triangle.to_vertices_array(vertices), vertex) {
                bad_triangles.push(triangle_id as TriangleId);
            }
        }

        // A vertex coinciding exactly with an already inserted vertex lies *on* the
        // circumcircles of its twin's triangles, never strictly inside: no triangle is bad.
        if bad_triangles.is_empty() {
            continue;
        }

        // Compare to the vertices of the bad triangles, if too close to one, merge
        if bad_triangles.iter().any(|&triangle_id| {
            let triangle = triangles.get(triangle_id);
            find_existing_close_vertex(
                triangle,
                &triangle.to_vertices_array(vertices),
                vertex,
                config.vertex_merge_tolerance,
            )
            .is_some()
        }) {
            continue;
        }

        // The cavity boundary is made of the edges belonging to an odd number of bad triangles.
        // An edge shared by two adjacent bad triangles appears once per triangle under its
        // canonical undirected key and cancels out.
        for &triangle_id in bad_triangles.iter() {
            for edge in triangles.get(triangle_id).edges() {
                *edge_counts.entry(edge.undirected()).or_insert(0) += 1;
            }
        }
        boundary_edges.extend(
            edge_counts
                .iter()
                .filter_map(|(&edge, &count)| (count % 2 == 1).then_some(edge)),
        );
        // Hash map iteration order is not deterministic. Sorting the boundary makes identical
        // inputs produce identical meshes.
        boundary_edges.sort_unstable();

        // Carve the cavity out of the mesh. `bad_triangles` ids are in ascending order.
        let mut next_bad = 0;
        let mut triangle_id: TriangleId = 0;
        triangles.buffer_mut().retain(|_| {
            let bad = next_bad < bad_triangles.len() && bad_triangles[next_bad] == triangle_id;
            if bad {
                next_bad += 1;
            }
            triangle_id += 1;
            !bad
        });

        // Refill the cavity by connecting each boundary edge to the new vertex, in a
        // counter-clockwise order
        for edge in boundary_edges.iter() {
            let (from, to) = edge.to_vertices(vertices);
            let verts = match triplet_orientation(from, to, vertex) {
                Orientation::Clockwise => [edge.to, edge.from, vertex_id],
                _ => [edge.from, edge.to, vertex_id],
            };
            triangles.push(TriangleData::new(verts));
        }

        #[cfg(feature = "progress_log")]
        {
            let inserted = vertex_id as usize + 1;
            let total = min_container_vertex_id as usize;
            if inserted % ((total / 50) + 1) == 0 {
                info!(
                    "Triangulation progress, {}%: {}/{} vertices, {} triangles in the mesh",
                    100 * inserted / total,
                    inserted,
                    total,
                    triangles.count()
                );
            }
        }
    }

    (triangles, min_container_vertex_id)
}

pub(crate) fn remove_wrapping(
    triangles: &Triangles,
    vertices: &[Vertex],
    min_container_vertex_id: VertexId,
    config: &TriangulationConfiguration,
) -> Vec<[VertexId; 3]> {
    let mut indices = Vec::with_capacity(triangles.count());
    for t in triangles.buffer().iter() {
        // A triangle is attached to the container when any of its three vertices is any of the
        // three container vertices
        if t.verts.iter().any(|&vert| vert >= min_container_vertex_id) {
            continue;
        }
        if config.filter_collinear_triangles {
            let (v1, v2, v3) = t.to_vertices(vertices);
            if is_flat_triangle(v1, v2, v3) {
                continue;
            }
        }
        indices.push(t.verts);
    }
    indices
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::{
        triangulation::{
            normalize_vertices_coordinates, triangulation_from_2d_vertices,
            wrap_and_triangulate_2d_normalized_vertices, TriangulationConfiguration,
            TriangulationError, CONTAINER_TRIANGLE_VERTICES,
        },
        types::{Float, Vertex},
        utils::{is_vertex_in_triangle_circumcircle, triplet_orientation, Orientation},
    };

    #[test]
    fn normalize_set_of_vertices() {
        let vertices = vec![
            Vertex::new(3.0, 2.0),
            Vertex::new(-1.0, 2.0),
            Vertex::new(-1.0, -2.0),
            Vertex::new(3.0, -2.0),
        ];

        let (normalized_vertices, scale_factor, x_min, y_min) =
            normalize_vertices_coordinates(&vertices);

        assert_eq!(
            Vec::from([
                Vertex::new(1., 1.),
                Vertex::new(0., 1.),
                Vertex::new(0., 0.),
                Vertex::new(1., 0.)
            ]),
            normalized_vertices
        );
        assert_eq!(4., scale_factor);
        assert_eq!(-1., x_min);
        assert_eq!(-2., y_min);
    }

    #[test]
    fn container_triangle_is_counter_clockwise() {
        assert_eq!(
            Orientation::CounterClockwise,
            triplet_orientation(
                CONTAINER_TRIANGLE_VERTICES[0],
                CONTAINER_TRIANGLE_VERTICES[1],
                CONTAINER_TRIANGLE_VERTICES[2],
            )
        );
    }

    #[test]
    fn container_triangle_encloses_normalized_vertices() {
        // Normalized vertices all lie in the unit square
        for corner in [
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(1., 1.),
            Vertex::new(0., 1.),
        ] {
            assert!(is_vertex_in_triangle_circumcircle(
                &CONTAINER_TRIANGLE_VERTICES,
                corner
            ));
        }
    }

    #[test]
    fn mesh_triangles_are_counter_clockwise() {
        let vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(1., 1.),
            Vertex::new(0., 1.),
            Vertex::new(0.4, 0.6),
        ];

        let mut normalized_vertices = vertices.clone();
        let (triangles, _min_container_vertex_id) = wrap_and_triangulate_2d_normalized_vertices(
            &mut normalized_vertices,
            &TriangulationConfiguration::default(),
        );

        for triangle in triangles.buffer().iter() {
            let (v1, v2, v3) = triangle.to_vertices(&normalized_vertices);
            assert_ne!(Orientation::Clockwise, triplet_orientation(v1, v2, v3));
        }
    }

    #[test]
    fn identical_vertices_are_merged() {
        let vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(5., 0.),
            Vertex::new(5., 5.),
            Vertex::new(0., 5.),
            // Strict duplicate of vertex 0
            Vertex::new(0., 0.),
        ];

        let triangulation =
            triangulation_from_2d_vertices(&vertices, TriangulationConfiguration::default())
                .expect("Triangulation should succeed");

        assert_eq!(2, triangulation.triangles.len());
        for verts in triangulation.triangles.iter() {
            assert!(!verts.contains(&4));
        }
    }

    #[test]
    fn close_vertices_are_merged_within_tolerance() {
        let vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(5., 0.),
            Vertex::new(5., 5.),
            Vertex::new(0., 5.),
            Vertex::new(0.01, 0.01),
        ];

        let config = TriangulationConfiguration {
            vertex_merge_tolerance: 0.05,
            ..Default::default()
        };
        let triangulation =
            triangulation_from_2d_vertices(&vertices, config).expect("Triangulation should succeed");

        assert_eq!(2, triangulation.triangles.len());
        for verts in triangulation.triangles.iter() {
            assert!(!verts.contains(&4));
        }
    }

    #[test]
    fn non_finite_vertex_is_rejected() {
        let vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(1., Float::NAN),
            Vertex::new(0., 1.),
        ];

        let result =
            triangulation_from_2d_vertices(&vertices, TriangulationConfiguration::default());

        assert!(matches!(
            result,
            Err(TriangulationError::NonFiniteCoordinate { index: 1, .. })
        ));
    }

    #[test]
    fn coincident_vertices_yield_empty_triangulation() {
        let vertices = vec![
            Vertex::new(2., 3.),
            Vertex::new(2., 3.),
            Vertex::new(2., 3.),
        ];

        let triangulation =
            triangulation_from_2d_vertices(&vertices, TriangulationConfiguration::default())
                .expect("Triangulation should succeed");

        assert!(triangulation.triangles.is_empty());
    }
}
