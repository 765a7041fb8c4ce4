/// Per-frame orchestration: expand, project, depth-sort and draw
use log::{debug, trace};

use crate::controls::{CameraAction, ControlSettings};
use crate::depth::{sort_by_depth, DepthEntry, DepthMetric, WorldDepth};
use crate::error::SceneError;
use crate::geometry::{ScreenPoint, Triangle};
use crate::projection::{BehindCameraPolicy, Camera, MirrorBehind, Viewport};
use crate::scene::{Scene, WorldBuffers};
use crate::surface::Surface;

/// Raster stage configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Fill each triangle with its color after stroking the outline
    pub fill_triangles: bool,
}

/// Transient buffers rebuilt on every tick.
///
/// `screen[i]` is the projection of `world.vertices[i]`, and `order` lists
/// world triangle indices in draw order.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub world: WorldBuffers,
    pub screen: Vec<ScreenPoint>,
    pub order: Vec<DepthEntry>,
}

impl Frame {
    fn clear(&mut self) {
        self.world.clear();
        self.screen.clear();
        self.order.clear();
    }
}

/// Owns the scene, the camera and the frame buffers of one renderer.
///
/// Every tick runs to completion on the caller's thread; callers that trigger
/// ticks from several sources must serialize them.
pub struct RenderContext {
    pub scene: Scene,
    pub camera: Camera,
    pub options: RenderOptions,
    viewport: Viewport,
    depth_metric: Box<dyn DepthMetric>,
    behind_policy: Box<dyn BehindCameraPolicy>,
    frame: Frame,
}

impl RenderContext {
    pub fn new(viewport: Viewport, camera: Camera) -> Self {
        Self {
            scene: Scene::new(),
            camera,
            options: RenderOptions::default(),
            viewport,
            depth_metric: Box::new(WorldDepth),
            behind_policy: Box::new(MirrorBehind),
            frame: Frame::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_depth_metric(mut self, metric: impl DepthMetric + 'static) -> Self {
        self.set_depth_metric(metric);
        self
    }

    pub fn with_behind_policy(mut self, policy: impl BehindCameraPolicy + 'static) -> Self {
        self.set_behind_policy(policy);
        self
    }

    pub fn set_depth_metric(&mut self, metric: impl DepthMetric + 'static) {
        self.depth_metric = Box::new(metric);
    }

    pub fn set_behind_policy(&mut self, policy: impl BehindCameraPolicy + 'static) {
        self.behind_policy = Box::new(policy);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Buffers of the last tick
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Rebuild world geometry from the scene and draw it.
    ///
    /// On an expansion error the frame is left empty and nothing is drawn.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), SceneError> {
        self.frame.clear();
        if let Err(err) = self.scene.expand_into(&mut self.frame.world) {
            self.frame.clear();
            return Err(err);
        }
        debug!(
            "tick: {} entities, {} vertices, {} triangles",
            self.scene.entities().len(),
            self.frame.world.vertices.len(),
            self.frame.world.triangles.len()
        );
        self.present(surface);
        Ok(())
    }

    /// Draw caller-built world buffers directly, bypassing the entity store
    pub fn tick_world<S: Surface + ?Sized>(
        &mut self,
        world: WorldBuffers,
        surface: &mut S,
    ) -> Result<(), SceneError> {
        self.frame.clear();
        world.validate()?;
        self.frame.world = world;
        debug!(
            "tick: {} world vertices, {} world triangles",
            self.frame.world.vertices.len(),
            self.frame.world.triangles.len()
        );
        self.present(surface);
        Ok(())
    }

    /// Apply the camera action bound to `key` and tick.
    ///
    /// Returns `Ok(false)` without ticking when the key is unbound.
    pub fn handle_key<S: Surface + ?Sized>(
        &mut self,
        key: &str,
        settings: &ControlSettings,
        surface: &mut S,
    ) -> Result<bool, SceneError> {
        let Some(action) = CameraAction::from_key(key) else {
            return Ok(false);
        };
        action.apply(&mut self.camera, settings);
        trace!("{:?} -> camera {:?}", action, self.camera);
        self.tick(surface)?;
        Ok(true)
    }

    fn present<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let camera = &self.camera;
        let viewport = &self.viewport;
        let policy = self.behind_policy.as_ref();

        self.frame.screen.extend(
            self.frame
                .world
                .vertices
                .iter()
                .map(|v| camera.process_vertex(v, viewport, policy)),
        );
        trace!(
            "{} of {} projected points are non-finite",
            self.frame.screen.iter().filter(|p| !p.is_finite()).count(),
            self.frame.screen.len()
        );

        self.frame.order = sort_by_depth(
            &self.frame.world.triangles,
            &self.frame.world.vertices,
            camera,
            self.depth_metric.as_ref(),
        );

        surface.clear(viewport.width, viewport.height);
        for entry in &self.frame.order {
            draw_triangle(
                surface,
                &self.frame.world.triangles[entry.triangle],
                &self.frame.screen,
                &self.options,
            );
        }
    }
}

/// Outline (and optionally fill) one triangle as a closed path 0 -> 1 -> 2
fn draw_triangle<S: Surface + ?Sized>(
    surface: &mut S,
    triangle: &Triangle,
    screen: &[ScreenPoint],
    options: &RenderOptions,
) {
    let [a, b, c] = triangle.indices.map(|i| screen[i]);

    surface.begin_path();
    surface.move_to(a.x, a.y);
    surface.line_to(b.x, b.y);
    surface.line_to(c.x, c.y);
    surface.close_path();
    surface.set_fill_color(&triangle.color);
    surface.set_stroke_color(&triangle.color);
    surface.stroke();
    if options.fill_triangles {
        surface.fill();
    }
}
