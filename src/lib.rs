pub mod triangulation;
pub mod types;
pub mod utils;

pub use glam;
pub use hashbrown;

pub use triangulation::{
    triangulation_from_2d_vertices, Triangulation, TriangulationConfiguration, TriangulationError,
};

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
