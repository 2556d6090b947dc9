//! Camera and viewport: view/projection matrices and resize handling.

use glam::{Mat4, Quat, Vec3, Vec4Swizzles};
use nightsky_config::{CameraConfig, WindowConfig};

/// A perspective camera that frames the sky from a fixed position.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Build the camera described by the config, looking down -Z from `initial_z`.
    pub fn from_config(camera: &CameraConfig, window: &WindowConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, camera.initial_z),
            rotation: Quat::IDENTITY,
            fov_y: camera.fov_degrees.to_radians(),
            aspect_ratio: window.width.max(1) as f32 / window.height.max(1) as f32,
            near: camera.near,
            far: camera.far,
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation);
        let translation_matrix = Mat4::from_translation(self.position);
        (translation_matrix * rotation_matrix).inverse()
    }

    /// Compute the projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        // Near maps to z=1, far maps to z=0.
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Update the aspect ratio for the perspective projection.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
    }

    /// Whether a world-space point lands inside the view volume.
    pub fn contains(&self, view_projection: &Mat4, point: Vec3) -> bool {
        let clip = *view_projection * point.extend(1.0);
        if clip.w <= 0.0 {
            return false;
        }
        let ndc = clip.xyz() / clip.w;
        ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), &WindowConfig::default())
    }
}

/// Surface size tracking. Resizes update the camera aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels, never zero.
    pub width: u32,
    /// Height in pixels, never zero.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, clamping zero dimensions to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Apply a window resize. Returns `true` if the size actually changed.
    pub fn resize(&mut self, width: u32, height: u32, camera: &mut Camera) -> bool {
        let resized = Self::new(width, height);
        if resized == *self {
            return false;
        }
        *self = resized;
        camera.set_aspect_ratio(self.width as f32, self.height as f32);
        log::debug!("Viewport resized to {}x{}", self.width, self.height);
        true
    }
}
