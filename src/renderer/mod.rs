//! WebGPU rendering

pub mod pipeline;
pub mod scene_draw;
pub mod shapes;
pub mod starfield;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene_draw::SceneDrawer;
pub use starfield::Starfield;
pub use vertex::Vertex;
