//! Scene host boundary: the retained scene graph that field generators register
//! their geometry with.
//!
//! Generators only ever hold opaque [`ObjectHandle`]s. They never read geometry
//! back from the host.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::texture::SpriteTexture;

/// Opaque handle to an object owned by a [`SceneHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Opaque handle to a texture uploaded to a [`SceneHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// How a translucent primitive composites onto what is behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Blending {
    /// Standard alpha blending.
    #[default]
    Normal,
    /// Overlapping primitives sum their color contributions.
    Additive,
}

/// GPU vertex for point clouds.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    /// World-space position relative to the owning object.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

/// Description of a point cloud to create.
#[derive(Clone, Debug)]
pub struct PointCloudDesc<'a> {
    /// One vertex per point.
    pub vertices: &'a [PointVertex],
    /// Rendered point size in world units.
    pub point_size: f32,
    /// Optional sprite applied to each point.
    pub texture: Option<TextureHandle>,
    /// Compositing mode.
    pub blending: Blending,
    /// Material opacity in `[0, 1]`.
    pub opacity: f32,
    /// Whether the points write to the depth buffer.
    pub depth_write: bool,
}

/// Description of a single line segment to create.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegmentDesc {
    /// First endpoint.
    pub start: Vec3,
    /// Second endpoint.
    pub end: Vec3,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Material opacity in `[0, 1]`.
    pub opacity: f32,
    /// Compositing mode.
    pub blending: Blending,
}

/// Description of a sphere mesh to create.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereDesc {
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Material opacity in `[0, 1]`.
    pub opacity: f32,
}

/// A retained-mode scene graph supplied by the host environment.
///
/// Creating an object does not make it visible; it must be attached with
/// [`add_object`](Self::add_object). Removing an object detaches it, and
/// [`release`](Self::release) frees its geometry and material.
pub trait SceneHost {
    /// Create an empty group node whose transform applies to its children.
    fn create_group(&mut self) -> ObjectHandle;

    /// Create a point cloud.
    fn create_point_cloud(&mut self, desc: &PointCloudDesc<'_>) -> ObjectHandle;

    /// Create a line segment.
    fn create_line_segment(&mut self, desc: &LineSegmentDesc) -> ObjectHandle;

    /// Create a sphere mesh.
    fn create_sphere(&mut self, desc: &SphereDesc) -> ObjectHandle;

    /// Upload a texture shared by any number of objects.
    fn create_texture(&mut self, texture: &SpriteTexture) -> TextureHandle;

    /// Attach an object to `parent`, or to the scene root when `parent` is `None`.
    fn add_object(&mut self, object: ObjectHandle, parent: Option<ObjectHandle>);

    /// Detach an object from the scene graph.
    fn remove_object(&mut self, object: ObjectHandle);

    /// Set the object's rotation about the vertical axis, in radians.
    fn set_rotation_y(&mut self, object: ObjectHandle, angle: f32);

    /// Set the object's translation relative to its parent.
    fn set_translation(&mut self, object: ObjectHandle, offset: Vec3);

    /// Free an object's geometry and material. The handle is invalid afterwards.
    fn release(&mut self, object: ObjectHandle);

    /// Free an uploaded texture. Objects still sampling it must be released first.
    fn release_texture(&mut self, texture: TextureHandle);
}
