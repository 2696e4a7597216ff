use glam::{Mat4, Vec3};

pub const CAMERA_FOV_DEGREES: f32 = 70.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_DISTANCE: f32 = 3.0;

/// Perspective camera looking at a target point
///
/// The projection is cached: after changing `aspect` (or any other lens
/// parameter) call [`PerspectiveCamera::update_projection_matrix`].
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    target: Vec3,
    up: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            fov_degrees,
            aspect,
            near,
            far,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Backdrop camera: 70° lens, three units out on +Z, facing the origin
    pub fn backdrop(aspect: f32) -> Self {
        let mut camera = Self::new(CAMERA_FOV_DEGREES, aspect, CAMERA_NEAR, CAMERA_FAR);
        camera.position = Vec3::new(0.0, 0.0, CAMERA_DISTANCE);
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Aim at a world-space point from the current position
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_camera_defaults() {
        let camera = PerspectiveCamera::backdrop(4.0 / 3.0);
        assert_eq!(camera.fov_degrees, 70.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = PerspectiveCamera::backdrop(16.0 / 9.0);
        let clip = camera.view_projection_matrix() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_projection_cached_until_update() {
        let mut camera = PerspectiveCamera::backdrop(1.0);
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        let after = camera.projection_matrix();
        assert_ne!(after, before);
        // x scale is f / aspect
        assert!((after.x_axis.x * 2.0 - before.x_axis.x).abs() < 1e-6);
    }

    #[test]
    fn test_look_at_after_move() {
        let mut camera = PerspectiveCamera::backdrop(1.0);
        camera.position = Vec3::new(2.0, -2.0, 3.0);
        camera.look_at(Vec3::ZERO);
        let expected = (Vec3::ZERO - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-6);
    }
}
