pub mod vertex;
pub use vertex::Vertex2d;

#[cfg(not(feature = "f32"))]
pub mod f64;
#[cfg(not(feature = "f32"))]
pub use f64::*;

#[cfg(feature = "f32")]
pub mod f32;
#[cfg(feature = "f32")]
pub use f32::*;

#[cfg(not(feature = "u64_indexes"))]
pub mod u32;
#[cfg(not(feature = "u64_indexes"))]
pub use u32::IndexType;

#[cfg(feature = "u64_indexes")]
pub mod u64;
#[cfg(feature = "u64_indexes")]
pub use u64::IndexType;

pub type VertexId = IndexType;
pub type TriangleId = IndexType;

pub type EdgeVertices = (Vertex, Vertex);
pub type TriangleVertices = (Vertex, Vertex, Vertex);

/// A directed edge between two vertices of the triangulation.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}
impl Edge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// Canonical key for this edge, ignoring its direction.
    ///
    /// An edge shared by two adjacent triangles is traversed in opposite directions by each of
    /// them. Keying the cavity boundary counters by the undirected form makes such shared edges
    /// collide and cancel regardless of traversal order.
    #[inline]
    pub fn undirected(&self) -> Edge {
        if self.from <= self.to {
            *self
        } else {
            Edge::new(self.to, self.from)
        }
    }

    #[inline]
    pub fn undirected_equals(&self, other: &Edge) -> bool {
        self == other || (self.from == other.to && self.to == other.from)
    }

    #[inline]
    pub fn to_vertices(&self, vertices: &[Vertex]) -> EdgeVertices {
        (vertices[self.from as usize], vertices[self.to as usize])
    }

    #[inline]
    pub fn contains(&self, vert: VertexId) -> bool {
        self.from == vert || self.to == vert
    }
}
impl From<(VertexId, VertexId)> for Edge {
    fn from(vertices: (VertexId, VertexId)) -> Edge {
        Edge::new(vertices.0, vertices.1)
    }
}

/// A triangle of the mesh, represented by three vertex indexes in a counter-clockwise order.
///
/// The mesh stores no adjacency information. Each insertion step recovers the cavity boundary
/// from the triangle edges alone.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TriangleData {
    /// Triangle vertices indexes
    pub verts: [VertexId; 3],
}

impl TriangleData {
    #[inline]
    pub fn new(verts: [VertexId; 3]) -> Self {
        Self { verts }
    }

    #[inline]
    pub fn v1(&self) -> VertexId {
        self.verts[0]
    }
    #[inline]
    pub fn v2(&self) -> VertexId {
        self.verts[1]
    }
    #[inline]
    pub fn v3(&self) -> VertexId {
        self.verts[2]
    }

    #[inline]
    pub fn edge12(&self) -> Edge {
        Edge::new(self.verts[0], self.verts[1])
    }
    #[inline]
    pub fn edge23(&self) -> Edge {
        Edge::new(self.verts[1], self.verts[2])
    }
    #[inline]
    pub fn edge31(&self) -> Edge {
        Edge::new(self.verts[2], self.verts[0])
    }

    #[inline]
    pub fn edges(&self) -> [Edge; 3] {
        [self.edge12(), self.edge23(), self.edge31()]
    }

    #[inline]
    pub fn to_vertices(&self, vertices: &[Vertex]) -> TriangleVertices {
        (
            vertices[self.verts[0] as usize],
            vertices[self.verts[1] as usize],
            vertices[self.verts[2] as usize],
        )
    }

    #[inline]
    pub fn to_vertices_array(&self, vertices: &[Vertex]) -> [Vertex; 3] {
        [
            vertices[self.verts[0] as usize],
            vertices[self.verts[1] as usize],
            vertices[self.verts[2] as usize],
        ]
    }

    #[inline]
    pub fn contains_vertex(&self, vert: VertexId) -> bool {
        self.verts.contains(&vert)
    }

    /// The vertex indexes in ascending order, the canonical form of the triangle when its
    /// winding does not matter.
    #[inline]
    pub fn sorted_verts(&self) -> [VertexId; 3] {
        let mut verts = self.verts;
        verts.sort_unstable();
        verts
    }

    /// `true` when both triangles connect the same three vertices, in any winding.
    #[inline]
    pub fn same_vertices(&self, other: &TriangleData) -> bool {
        self.sorted_verts() == other.sorted_verts()
    }
}

/// The working mesh: a growable arena of triangles referenced by index.
#[derive(Clone, Default)]
pub struct Triangles {
    pub buffer: Vec<TriangleData>,
}
impl Triangles {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn get(&self, id: TriangleId) -> &TriangleData {
        &self.buffer[id as usize]
    }

    #[inline]
    pub fn buffer(&self) -> &Vec<TriangleData> {
        &self.buffer
    }
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Vec<TriangleData> {
        &mut self.buffer
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn push(&mut self, triangle: TriangleData) {
        self.buffer.push(triangle)
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::types::{Edge, TriangleData};

    #[test]
    fn edge_undirected_canonical_key() {
        let edge = Edge::new(4, 1);
        let reversed = Edge::new(1, 4);

        assert_ne!(edge, reversed);
        assert_eq!(edge.undirected(), reversed.undirected());
        assert_eq!(Edge::new(1, 4), edge.undirected());
        assert!(edge.undirected_equals(&reversed));
    }

    #[test]
    fn triangle_multiset_equality() {
        let triangle = TriangleData::new([2, 0, 5]);

        assert!(triangle.same_vertices(&TriangleData::new([5, 2, 0])));
        assert!(triangle.same_vertices(&TriangleData::new([0, 2, 5])));
        // Sharing only two vertices is not enough
        assert!(!triangle.same_vertices(&TriangleData::new([2, 2, 5])));
        assert!(!triangle.same_vertices(&TriangleData::new([2, 0, 4])));
    }

    #[test]
    fn triangle_edges_are_directed() {
        let triangle = TriangleData::new([0, 1, 2]);

        assert_eq!(
            [Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 0)],
            triangle.edges()
        );
    }
}
