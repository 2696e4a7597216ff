//! Material kinds for the backdrop mesh.
//!
//! Names coming from the host map onto a closed set of kinds with an
//! exhaustive match. Anything else is reported as
//! [`SceneError::UnknownMaterial`] and the caller substitutes
//! [`Material::fallback`].

use std::str::FromStr;

use crate::error::{Result, SceneError};
use crate::math::Color;

/// Enumeration of supported material kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialKind {
    /// Flat color, ignores lights
    #[default]
    Basic,
    /// Diffuse only
    Lambert,
    /// Diffuse plus specular highlight
    Phong,
    /// Diffuse plus a softer, broader highlight
    Standard,
    /// Colors each fragment by its surface normal
    Normal,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Basic,
        MaterialKind::Lambert,
        MaterialKind::Phong,
        MaterialKind::Standard,
        MaterialKind::Normal,
    ];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "meshbasicmaterial" | "basic" => Ok(MaterialKind::Basic),
            "meshlambertmaterial" | "lambert" => Ok(MaterialKind::Lambert),
            "meshphongmaterial" | "phong" => Ok(MaterialKind::Phong),
            "meshstandardmaterial" | "standard" => Ok(MaterialKind::Standard),
            "meshnormalmaterial" | "normal" => Ok(MaterialKind::Normal),
            _ => Err(SceneError::UnknownMaterial(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MaterialKind::Basic => "MeshBasicMaterial",
            MaterialKind::Lambert => "MeshLambertMaterial",
            MaterialKind::Phong => "MeshPhongMaterial",
            MaterialKind::Standard => "MeshStandardMaterial",
            MaterialKind::Normal => "MeshNormalMaterial",
        }
    }

    /// Whether the scene lights affect this material
    pub fn is_lit(&self) -> bool {
        matches!(
            self,
            MaterialKind::Lambert | MaterialKind::Phong | MaterialKind::Standard
        )
    }

    /// Shading model index understood by `mesh.wgsl`
    pub fn shading_model(&self) -> u32 {
        match self {
            MaterialKind::Basic => 0,
            MaterialKind::Lambert => 1,
            MaterialKind::Phong => 2,
            MaterialKind::Standard => 3,
            MaterialKind::Normal => 4,
        }
    }
}

impl FromStr for MaterialKind {
    type Err = SceneError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Appearance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub wireframe: bool,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Color, wireframe: bool) -> Self {
        Self {
            kind,
            color,
            wireframe,
        }
    }

    /// Flat black wireframe shown when the requested material is unusable
    pub fn fallback() -> Self {
        Self::new(MaterialKind::Basic, Color::BLACK, true)
    }

    pub fn from_config(name: &str, color: Color, wireframe: bool) -> Result<Self> {
        let kind = MaterialKind::from_name(name)?;
        Ok(Self::new(kind, color, wireframe))
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_round_trips_by_name() {
        for kind in MaterialKind::ALL {
            assert_eq!(MaterialKind::from_name(kind.name()).unwrap(), kind);
            assert_eq!(kind.name().parse::<MaterialKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_short_names() {
        assert_eq!(MaterialKind::from_name("phong").unwrap(), MaterialKind::Phong);
        assert_eq!(MaterialKind::from_name(" Standard ").unwrap(), MaterialKind::Standard);
    }

    #[test]
    fn test_unknown_material_is_error() {
        let err = MaterialKind::from_name("NonExistentMaterial").unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial(ref name) if name == "NonExistentMaterial"));
        assert!(Material::from_config("", Color::WHITE, false).is_err());
    }

    #[test]
    fn test_fallback_is_black_wireframe_basic() {
        let fallback = Material::fallback();
        assert_eq!(fallback.kind, MaterialKind::Basic);
        assert_eq!(fallback.color, Color::BLACK);
        assert!(fallback.wireframe);
        assert!(fallback.is_fallback());
    }

    #[test]
    fn test_from_config_keeps_color_and_wireframe() {
        let color = Color::from_u32(0x336699);
        let material = Material::from_config("MeshLambertMaterial", color, true).unwrap();
        assert_eq!(material.kind, MaterialKind::Lambert);
        assert_eq!(material.color, color);
        assert!(material.wireframe);
        assert!(!material.is_fallback());
    }

    #[test]
    fn test_shading_models_are_distinct() {
        let mut models: Vec<u32> = MaterialKind::ALL.iter().map(|k| k.shading_model()).collect();
        models.dedup();
        assert_eq!(models.len(), MaterialKind::ALL.len());
        assert!(!MaterialKind::Basic.is_lit());
        assert!(MaterialKind::Phong.is_lit());
    }
}
