//! In-memory scene graph implementing [`SceneHost`] without a GPU.
//!
//! Used by the `nightsky` binary and by tests: it keeps every created object,
//! tracks which ones are attached and released, and can "render" a frame by
//! walking the graph and counting what the camera sees.

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};

use crate::camera::Camera;
use crate::scene::{
    Blending, LineSegmentDesc, ObjectHandle, PointCloudDesc, PointVertex, SceneHost, SphereDesc,
    TextureHandle,
};
use crate::texture::SpriteTexture;

/// Geometry and material of a scene object.
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Transform-only node.
    Group,
    /// Point cloud with per-point colors.
    PointCloud {
        vertices: Vec<PointVertex>,
        point_size: f32,
        texture: Option<TextureHandle>,
        blending: Blending,
        opacity: f32,
        depth_write: bool,
    },
    /// Single line segment.
    LineSegment(LineSegmentDesc),
    /// Sphere mesh.
    Sphere(SphereDesc),
}

/// A node of the headless scene graph.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Geometry and material.
    pub kind: ObjectKind,
    /// Parent node, `None` when attached to the root or detached.
    pub parent: Option<ObjectHandle>,
    /// Whether the object is currently part of the scene graph.
    pub attached: bool,
    /// Rotation about the vertical axis, in radians.
    pub rotation_y: f32,
    /// Translation relative to the parent.
    pub translation: Vec3,
}

impl SceneObject {
    fn local_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.rotation_y), self.translation)
    }
}

/// Counts gathered while rendering one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Attached, reachable objects of any kind.
    pub objects: usize,
    /// Points across all visible point clouds.
    pub points: usize,
    /// Points inside the camera's view volume.
    pub points_in_view: usize,
    /// Line segments.
    pub lines: usize,
    /// Sphere meshes.
    pub spheres: usize,
}

/// Headless retained scene.
#[derive(Debug)]
pub struct HeadlessScene {
    objects: BTreeMap<ObjectHandle, SceneObject>,
    textures: BTreeMap<u64, SpriteTexture>,
    next_id: u64,
    released: u64,
    background: [f32; 3],
    frames_rendered: u64,
}

impl HeadlessScene {
    /// Create an empty scene cleared to `background` (`0xRRGGBB`).
    pub fn new(background: u32) -> Self {
        Self {
            objects: BTreeMap::new(),
            textures: BTreeMap::new(),
            next_id: 1,
            released: 0,
            background: hex_to_rgb(background),
            frames_rendered: 0,
        }
    }

    fn insert(&mut self, kind: ObjectKind) -> ObjectHandle {
        let handle = ObjectHandle(self.next_id);
        self.next_id += 1;
        self.objects.insert(
            handle,
            SceneObject {
                kind,
                parent: None,
                attached: false,
                rotation_y: 0.0,
                translation: Vec3::ZERO,
            },
        );
        handle
    }

    /// Look up an object that has not been released.
    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    /// Objects created and not yet released.
    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    /// Objects currently attached to the scene graph.
    pub fn attached_objects(&self) -> usize {
        self.objects.values().filter(|o| o.attached).count()
    }

    /// Total number of objects released so far.
    pub fn released_objects(&self) -> u64 {
        self.released
    }

    /// Number of uploaded textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Handles of attached objects whose parent is `parent` (`None` = root).
    pub fn children(&self, parent: Option<ObjectHandle>) -> Vec<ObjectHandle> {
        self.objects
            .iter()
            .filter(|(_, o)| o.attached && o.parent == parent)
            .map(|(h, _)| *h)
            .collect()
    }

    /// Clear color as RGB floats.
    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    /// Number of frames rendered.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// World transform of an object, or `None` if it or an ancestor is detached.
    pub fn world_transform(&self, handle: ObjectHandle) -> Option<Mat4> {
        let object = self.objects.get(&handle)?;
        if !object.attached {
            return None;
        }
        let local = object.local_transform();
        match object.parent {
            Some(parent) => Some(self.world_transform(parent)? * local),
            None => Some(local),
        }
    }

    /// Walk every reachable object and gather [`RenderStats`] for this camera.
    pub fn render(&mut self, camera: &Camera) -> RenderStats {
        let view_projection = camera.view_projection_matrix();
        let mut stats = RenderStats::default();

        for (handle, object) in &self.objects {
            let Some(transform) = self.world_transform(*handle) else {
                continue;
            };
            stats.objects += 1;
            match &object.kind {
                ObjectKind::Group => {}
                ObjectKind::PointCloud { vertices, .. } => {
                    stats.points += vertices.len();
                    stats.points_in_view += vertices
                        .iter()
                        .filter(|v| {
                            let p = transform.transform_point3(Vec3::from_array(v.position));
                            camera.contains(&view_projection, p)
                        })
                        .count();
                }
                ObjectKind::LineSegment(_) => stats.lines += 1,
                ObjectKind::Sphere(_) => stats.spheres += 1,
            }
        }

        self.frames_rendered += 1;
        stats
    }

    fn object_mut(&mut self, handle: ObjectHandle, action: &str) -> Option<&mut SceneObject> {
        let object = self.objects.get_mut(&handle);
        if object.is_none() {
            log::warn!("{action} on unknown or released object {handle:?}");
        }
        object
    }
}

impl SceneHost for HeadlessScene {
    fn create_group(&mut self) -> ObjectHandle {
        self.insert(ObjectKind::Group)
    }

    fn create_point_cloud(&mut self, desc: &PointCloudDesc<'_>) -> ObjectHandle {
        self.insert(ObjectKind::PointCloud {
            vertices: desc.vertices.to_vec(),
            point_size: desc.point_size,
            texture: desc.texture,
            blending: desc.blending,
            opacity: desc.opacity,
            depth_write: desc.depth_write,
        })
    }

    fn create_line_segment(&mut self, desc: &LineSegmentDesc) -> ObjectHandle {
        self.insert(ObjectKind::LineSegment(desc.clone()))
    }

    fn create_sphere(&mut self, desc: &SphereDesc) -> ObjectHandle {
        self.insert(ObjectKind::Sphere(desc.clone()))
    }

    fn create_texture(&mut self, texture: &SpriteTexture) -> TextureHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.textures.insert(id, texture.clone());
        TextureHandle(id)
    }

    fn add_object(&mut self, object: ObjectHandle, parent: Option<ObjectHandle>) {
        if let Some(node) = self.object_mut(object, "add_object") {
            node.parent = parent;
            node.attached = true;
        }
    }

    fn remove_object(&mut self, object: ObjectHandle) {
        if let Some(node) = self.object_mut(object, "remove_object") {
            node.parent = None;
            node.attached = false;
        }
    }

    fn set_rotation_y(&mut self, object: ObjectHandle, angle: f32) {
        if let Some(node) = self.object_mut(object, "set_rotation_y") {
            node.rotation_y = angle;
        }
    }

    fn set_translation(&mut self, object: ObjectHandle, offset: Vec3) {
        if let Some(node) = self.object_mut(object, "set_translation") {
            node.translation = offset;
        }
    }

    fn release(&mut self, object: ObjectHandle) {
        if self.objects.remove(&object).is_some() {
            self.released += 1;
        } else {
            log::warn!("release on unknown or released object {object:?}");
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture.0).is_none() {
            log::warn!("release_texture on unknown or released texture {texture:?}");
        }
    }
}

/// Convert `0xRRGGBB` to RGB floats in `[0, 1]`.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(scene: &mut HeadlessScene, points: &[[f32; 3]]) -> ObjectHandle {
        let vertices: Vec<PointVertex> = points
            .iter()
            .map(|&position| PointVertex {
                position,
                color: [1.0, 1.0, 1.0],
            })
            .collect();
        scene.create_point_cloud(&PointCloudDesc {
            vertices: &vertices,
            point_size: 1.0,
            texture: None,
            blending: Blending::Normal,
            opacity: 1.0,
            depth_write: true,
        })
    }

    #[test]
    fn test_created_objects_are_not_attached() {
        let mut scene = HeadlessScene::new(0);
        let group = scene.create_group();
        assert_eq!(scene.live_objects(), 1);
        assert_eq!(scene.attached_objects(), 0);
        assert!(scene.world_transform(group).is_none());
    }

    #[test]
    fn test_add_and_remove_object() {
        let mut scene = HeadlessScene::new(0);
        let group = scene.create_group();
        scene.add_object(group, None);
        assert_eq!(scene.children(None), vec![group]);
        scene.remove_object(group);
        assert!(scene.children(None).is_empty());
        assert_eq!(scene.live_objects(), 1);
    }

    #[test]
    fn test_release_frees_object() {
        let mut scene = HeadlessScene::new(0);
        let group = scene.create_group();
        scene.add_object(group, None);
        scene.remove_object(group);
        scene.release(group);
        assert_eq!(scene.live_objects(), 0);
        assert_eq!(scene.released_objects(), 1);
        assert!(scene.object(group).is_none());
    }

    #[test]
    fn test_double_release_is_counted_once() {
        let mut scene = HeadlessScene::new(0);
        let group = scene.create_group();
        scene.release(group);
        scene.release(group);
        assert_eq!(scene.released_objects(), 1);
    }

    #[test]
    fn test_group_rotation_applies_to_children() {
        let mut scene = HeadlessScene::new(0);
        let group = scene.create_group();
        let child = cloud(&mut scene, &[[1.0, 0.0, 0.0]]);
        scene.add_object(group, None);
        scene.add_object(child, Some(group));
        scene.set_rotation_y(group, std::f32::consts::FRAC_PI_2);

        let world = scene.world_transform(child).unwrap();
        let p = world.transform_point3(Vec3::X);
        // Rotating +X by 90 degrees about Y lands on -Z.
        assert!((p - Vec3::NEG_Z).length() < 1e-5, "got {p}");
    }

    #[test]
    fn test_detached_parent_hides_child() {
        let mut scene = HeadlessScene::new(0);
        let group = scene.create_group();
        let child = cloud(&mut scene, &[[0.0, 0.0, 0.0]]);
        scene.add_object(child, Some(group));
        assert!(scene.world_transform(child).is_none());
    }

    #[test]
    fn test_render_counts_visible_points() {
        let mut scene = HeadlessScene::new(0x000011);
        let points = cloud(&mut scene, &[[0.0, 0.0, 0.0], [0.0, 0.0, 500.0]]);
        scene.add_object(points, None);
        let line = scene.create_line_segment(&LineSegmentDesc {
            start: Vec3::ZERO,
            end: Vec3::X,
            color: [1.0, 1.0, 1.0],
            opacity: 0.8,
            blending: Blending::Additive,
        });
        scene.add_object(line, None);

        let stats = scene.render(&Camera::default());
        assert_eq!(stats.objects, 2);
        assert_eq!(stats.points, 2);
        assert_eq!(stats.points_in_view, 1);
        assert_eq!(stats.lines, 1);
        assert_eq!(scene.frames_rendered(), 1);
    }

    #[test]
    fn test_translation_moves_object() {
        let mut scene = HeadlessScene::new(0);
        let line = scene.create_group();
        scene.add_object(line, None);
        scene.set_translation(line, Vec3::new(1.0, 2.0, 3.0));
        let world = scene.world_transform(line).unwrap();
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_textures_are_shared() {
        let mut scene = HeadlessScene::new(0);
        let handle = scene.create_texture(&SpriteTexture::radial_glow(8));
        assert_eq!(scene.texture_count(), 1);
        assert_ne!(handle, TextureHandle(0));
    }

    #[test]
    fn test_release_texture_frees_it() {
        let mut scene = HeadlessScene::new(0);
        let a = scene.create_texture(&SpriteTexture::radial_glow(4));
        let b = scene.create_texture(&SpriteTexture::radial_glow(4));
        scene.release_texture(a);
        assert_eq!(scene.texture_count(), 1);
        scene.release_texture(a);
        scene.release_texture(b);
        assert_eq!(scene.texture_count(), 0);
    }

    #[test]
    fn test_hex_to_rgb() {
        let rgb = hex_to_rgb(0x000011);
        assert_eq!(rgb[0], 0.0);
        assert_eq!(rgb[1], 0.0);
        assert!((rgb[2] - 17.0 / 255.0).abs() < 1e-6);
    }
}
