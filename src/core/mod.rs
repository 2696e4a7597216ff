pub mod gpu_context;
pub mod surface_renderer;
pub mod window;
pub mod window_host;

pub use gpu_context::{GpuContext, WgpuEngine};
pub use surface_renderer::{mesh_uniform, MeshSurfaceRenderer};
pub use window::Dimensions;
pub use window_host::{HandleRegistry, WindowContainer, WindowHost};
