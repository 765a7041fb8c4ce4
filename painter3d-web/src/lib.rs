/// Painter3D Web - canvas 2D renderer exported to JavaScript
///
/// Wraps a render context and draws through `CanvasRenderingContext2d`.
/// Scene data is supplied from JavaScript as flat arrays.
use painter3d_core::{
    Camera, CameraDepth, Color, ControlSettings, DirectProjection, EntityId, MirrorBehind, Model,
    ModelId, Placement, PlacementDelta, RenderContext, RenderOptions, Surface, Triangle, Vertex,
    Viewport, WorldBuffers, WorldDepth,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Draw surface backed by a browser canvas
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ctx.set_stroke_style_str(color.as_str());
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ctx.set_fill_style_str(color.as_str());
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Build a model from flat `[x, y, z, ...]` vertices, `[a, b, c, ...]`
/// indices and one color per triangle
fn model_from_arrays(
    vertices: &[f64],
    indices: &[u32],
    colors: Vec<String>,
) -> Result<Model, JsValue> {
    if vertices.len() % 3 != 0 || indices.len() % 3 != 0 || indices.len() / 3 != colors.len() {
        return Err(JsValue::from_str(
            "expected 3 coordinates per vertex, 3 indices and one color per triangle",
        ));
    }
    let vertices = vertices
        .chunks_exact(3)
        .map(|v| Vertex::new(v[0], v[1], v[2]))
        .collect();
    let triangles = indices
        .chunks_exact(3)
        .zip(colors)
        .map(|(t, color)| Triangle::new(t[0] as usize, t[1] as usize, t[2] as usize, color))
        .collect();
    Ok(Model::new(vertices, triangles))
}

/// Same layout as [`model_from_arrays`], taken as already-placed world geometry
fn world_from_arrays(
    vertices: &[f64],
    indices: &[u32],
    colors: Vec<String>,
) -> Result<WorldBuffers, JsValue> {
    let model = model_from_arrays(vertices, indices, colors)?;
    Ok(WorldBuffers {
        vertices: model.vertices,
        triangles: model.triangles,
    })
}

/// Route `log` records to the browser console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_log::init_with_level(log::Level::Info).map_err(to_js)
}

#[wasm_bindgen]
pub struct WebRenderer {
    ctx: RenderContext,
    surface: CanvasSurface,
    controls: ControlSettings,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with `canvas_id`, sizing it to `width` x `height`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, width: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {}", canvas_id)))?
            .dyn_into()?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        log::info!("new scene on #{} ({}x{})", canvas_id, width, height);

        Ok(WebRenderer {
            ctx: RenderContext::new(Viewport::new(width as f64, height as f64), Camera::default()),
            surface: CanvasSurface { ctx },
            controls: ControlSettings::default(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_camera(&mut self, x: f64, y: f64, z: f64, fov: f64, rx: f64, ry: f64, rz: f64) {
        self.ctx.camera = Camera::new(x, y, z, fov, rx, ry, rz);
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.ctx.options = RenderOptions {
            fill_triangles: fill,
        };
    }

    /// Sort by camera-space depth instead of world z
    pub fn set_camera_depth(&mut self, enabled: bool) {
        if enabled {
            self.ctx.set_depth_metric(CameraDepth);
        } else {
            self.ctx.set_depth_metric(WorldDepth);
        }
    }

    /// Disable the behind-camera mirroring heuristic
    pub fn set_direct_projection(&mut self, enabled: bool) {
        if enabled {
            self.ctx.set_behind_policy(DirectProjection);
        } else {
            self.ctx.set_behind_policy(MirrorBehind);
        }
    }

    pub fn set_speeds(&mut self, move_speed: f64, turn_speed: f64) {
        self.controls = ControlSettings {
            move_speed,
            turn_speed,
        };
    }

    pub fn add_model(
        &mut self,
        vertices: &[f64],
        indices: &[u32],
        colors: Vec<String>,
    ) -> Result<usize, JsValue> {
        let model = model_from_arrays(vertices, indices, colors)?;
        Ok(self.ctx.scene.add_model(model).0)
    }

    pub fn set_model(
        &mut self,
        id: usize,
        vertices: &[f64],
        indices: &[u32],
        colors: Vec<String>,
    ) -> Result<(), JsValue> {
        let model = model_from_arrays(vertices, indices, colors)?;
        self.ctx.scene.set_model(ModelId(id), model).map_err(to_js)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_entity(
        &mut self,
        model: usize,
        x: f64,
        y: f64,
        z: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        sx: f64,
        sy: f64,
        sz: f64,
    ) -> Result<usize, JsValue> {
        let placement = Placement::at(x, y, z)
            .with_rotation(rx, ry, rz)
            .with_scale(sx, sy, sz);
        self.ctx
            .scene
            .add_entity(ModelId(model), placement)
            .map(|id| id.0)
            .map_err(to_js)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_entity(
        &mut self,
        id: usize,
        x: f64,
        y: f64,
        z: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        sx: f64,
        sy: f64,
        sz: f64,
    ) -> Result<(), JsValue> {
        let placement = Placement::at(x, y, z)
            .with_rotation(rx, ry, rz)
            .with_scale(sx, sy, sz);
        self.ctx
            .scene
            .set_entity(EntityId(id), placement)
            .map_err(to_js)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn change_entity(
        &mut self,
        id: usize,
        dx: f64,
        dy: f64,
        dz: f64,
        drx: f64,
        dry: f64,
        drz: f64,
        dsx: f64,
        dsy: f64,
        dsz: f64,
    ) -> Result<(), JsValue> {
        let delta = PlacementDelta::translate(dx, dy, dz)
            .with_rotation(drx, dry, drz)
            .with_scale(dsx, dsy, dsz);
        self.ctx
            .scene
            .change_entity(EntityId(id), &delta)
            .map_err(to_js)
    }

    /// Render a frame
    pub fn tick(&mut self) -> Result<(), JsValue> {
        self.ctx.tick(&mut self.surface).map_err(to_js)
    }

    /// Render caller-supplied world geometry, bypassing the scene
    pub fn tick_world(
        &mut self,
        vertices: &[f64],
        indices: &[u32],
        colors: Vec<String>,
    ) -> Result<(), JsValue> {
        let world = world_from_arrays(vertices, indices, colors)?;
        self.ctx.tick_world(world, &mut self.surface).map_err(to_js)
    }

    /// Forward a `KeyboardEvent.key`; returns whether it moved the camera
    pub fn key_down(&mut self, key: &str) -> Result<bool, JsValue> {
        self.ctx
            .handle_key(key, &self.controls, &mut self.surface)
            .map_err(to_js)
    }
}
