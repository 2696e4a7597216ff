use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::{GeometryKind, MeshData};
use crate::material::Material;
use crate::math::Color;

pub const AMBIENT_INTENSITY: f32 = 0.7;
pub const DIRECTIONAL_INTENSITY: f32 = 0.7;
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Shines from `position` towards the scene origin
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn directional(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            position,
        }
    }
}

/// Position, Euler rotation (XYZ, radians) and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.scale = Vec3::splat(factor);
    }
}

/// Geometry and material drawn as one object
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryKind,
    pub data: MeshData,
    pub material: Material,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: GeometryKind, material: Material) -> Self {
        Self {
            geometry,
            data: geometry.build(),
            material,
            transform: Transform::default(),
        }
    }
}

/// Scene graph root: lights and meshes drawn around the origin
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub position: Vec3,
    lights: Vec<Light>,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Sum of ambient contributions as linear rgb
    pub fn ambient_light(&self) -> [f32; 3] {
        self.lights.iter().fold([0.0; 3], |acc, light| match light {
            Light::Ambient { color, intensity } => {
                let c = color.to_linear();
                [
                    acc[0] + c[0] * intensity,
                    acc[1] + c[1] * intensity,
                    acc[2] + c[2] * intensity,
                ]
            }
            Light::Directional { .. } => acc,
        })
    }

    /// First directional light as (direction towards light, linear rgb * intensity)
    pub fn key_light(&self) -> Option<(Vec3, [f32; 3])> {
        self.lights.iter().find_map(|light| match light {
            Light::Directional {
                color,
                intensity,
                position,
            } => {
                let c = color.to_linear();
                Some((
                    (*position - self.position).normalize_or_zero(),
                    [c[0] * intensity, c[1] * intensity, c[2] * intensity],
                ))
            }
            Light::Ambient { .. } => None,
        })
    }
}
