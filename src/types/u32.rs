/// The index type used for the vertices and the triangles
pub type IndexType = u32;
