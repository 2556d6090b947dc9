//! Host side of the night sky: camera framing, the scene-host boundary that
//! generators register geometry with, a headless scene graph, and sprite textures.

pub mod camera;
pub mod headless;
pub mod scene;
pub mod texture;

pub use camera::{Camera, Viewport};
pub use headless::{HeadlessScene, ObjectKind, RenderStats, SceneObject, hex_to_rgb};
pub use scene::{
    Blending, LineSegmentDesc, ObjectHandle, PointCloudDesc, PointVertex, SceneHost, SphereDesc,
    TextureHandle,
};
pub use texture::{SpriteTexture, TextureError};
