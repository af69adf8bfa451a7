//! WebGPU rendering module
//!
//! Scenes are tessellated on the CPU into one alpha-blended triangle list
//! per frame and drawn with a single flat-color pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build;
pub use vertex::Vertex;
