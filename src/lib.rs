pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod material;
pub mod math;
pub mod mount;
pub mod scene;
pub mod session;
pub mod traits;
pub mod types;

pub use config::SceneConfig;
pub use error::{Result, SceneError};
pub use geometry::GeometryKind;
pub use material::{Material, MaterialKind};
pub use mount::{SceneMount, SessionState};
pub use session::SceneSession;
