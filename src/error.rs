use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised while configuring or drawing a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// Material name that does not map to any known material kind
    #[error("unknown material kind: {0}")]
    UnknownMaterial(String),

    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("size must be a positive number, got {0}")]
    InvalidSize(f32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Render surface or GPU context could not be created
    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Render error: {0}")]
    Render(String),
}
