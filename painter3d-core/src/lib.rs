//! Painter3D Core Library - software 3D transform-and-render pipeline
//!
//! This library provides the model -> world -> camera -> screen math, the
//! scene store, painter's-algorithm depth ordering and the raster stage that
//! issues path commands to an abstract 2D draw surface.

pub mod controls;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod linalg;
pub mod projection;
pub mod render;
pub mod scene;
pub mod stl;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use controls::{CameraAction, ControlSettings};
pub use depth::{CameraDepth, DepthMetric, WorldDepth};
pub use error::{SceneError, Slot, StlError};
pub use geometry::{Color, Model, ScreenPoint, Triangle, Vertex};
pub use projection::{BehindCameraPolicy, Camera, DirectProjection, MirrorBehind, Viewport};
pub use render::{Frame, RenderContext, RenderOptions};
pub use scene::{apply_entity_transform, Entity, EntityId, ModelId, Scene, WorldBuffers};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use transform::{Placement, PlacementDelta, RotationState, Transform};
