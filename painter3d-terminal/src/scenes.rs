/// Demo scenes and the animated strand
use std::f64::consts::FRAC_PI_4;
use std::time::Duration;

use clap::ValueEnum;
use log::info;
use painter3d_core::{
    Camera, Model, ModelId, Placement, RenderContext, SceneError, Triangle, Vertex,
};

/// Edge length of the demo cubes
const CUBE_SIZE: f64 = 50.0;

/// Number of joints in the strand
const STRAND_LEN: usize = 16;

/// How often the strand animation advances
pub const STRAND_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Six cubes around the origin
    Cubes,
    /// A single cube at the origin
    Cube,
    /// A swaying, animated strand of triangles
    Strand,
}

/// Populate `ctx` with `scene`, returning the animation that drives it, if any
pub fn load(scene: DemoScene, ctx: &mut RenderContext) -> Result<Option<Strand>, SceneError> {
    info!("loading {:?} scene", scene);
    match scene {
        DemoScene::Cubes => {
            ctx.camera = Camera::new(0.0, 2.0, -10.0, FRAC_PI_4, 0.0, 0.0, 0.0);
            let cube = ctx.scene.add_model(Model::cube(CUBE_SIZE));
            for (x, y, z) in [
                (0.0, 0.0, 0.0),
                (100.0, 0.0, 0.0),
                (50.0, -50.0, 0.0),
                (50.0, 50.0, 0.0),
                (50.0, 0.0, 50.0),
                (50.0, 0.0, -50.0),
            ] {
                ctx.scene.add_entity(cube, Placement::at(x, y, z))?;
            }
            Ok(None)
        }
        DemoScene::Cube => {
            ctx.camera = Camera::new(0.0, 2.0, -10.0, FRAC_PI_4, 0.0, 0.0, 0.0);
            let cube = ctx.scene.add_model(Model::cube(CUBE_SIZE));
            ctx.scene.add_entity(cube, Placement::default())?;
            Ok(None)
        }
        DemoScene::Strand => {
            ctx.camera = Camera::new(0.0, 2.0, 10.0, FRAC_PI_4, 0.0, 0.0, 0.0);
            let model = ctx.scene.add_model(Model::default());
            let strand = Strand::new(model);
            ctx.scene.set_model(model, strand.model())?;
            ctx.scene.add_entity(model, Placement::default())?;
            Ok(Some(strand))
        }
    }
}

fn strand_triangles() -> Vec<Triangle> {
    vec![
        Triangle::new(0, 1, 2, "#e00"),
        Triangle::new(2, 1, 3, "#e55"),
        Triangle::new(2, 3, 1, "#ee0"),
        Triangle::new(4, 3, 2, "#5e5"),
        Triangle::new(4, 5, 2, "#0ee"),
        Triangle::new(6, 5, 2, "#05e"),
        Triangle::new(6, 7, 2, "#50e"),
        Triangle::new(8, 7, 2, "#e00"),
        Triangle::new(8, 9, 2, "#e55"),
        Triangle::new(10, 9, 2, "#ee0"),
        Triangle::new(10, 11, 2, "#5e5"),
        Triangle::new(12, 11, 2, "#0ee"),
        Triangle::new(12, 13, 2, "#05e"),
        Triangle::new(14, 13, 2, "#50e"),
        Triangle::new(14, 15, 2, "#e00"),
    ]
}

/// A vertical chain of joints whose tip sways and whose other joints ease
/// toward their successor, sagging slightly each step.
#[derive(Debug, Clone)]
pub struct Strand {
    model: ModelId,
    joints: Vec<Vertex>,
    time: f64,
}

impl Strand {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            joints: (0..STRAND_LEN)
                .map(|i| Vertex::new(0.0, i as f64, 0.0))
                .collect(),
            time: 0.0,
        }
    }

    pub fn joints(&self) -> &[Vertex] {
        &self.joints
    }

    pub fn model(&self) -> Model {
        Model::new(self.joints.clone(), strand_triangles())
    }

    /// Advance the simulation by one timer interval
    pub fn advance(&mut self) {
        self.time += 0.01;
        let t = self.time;
        let sway = ((t * 10.0).sin() + (t * 3.0).cos() - (t * 2.0).sin()) / 3.0;

        let tip = self.joints.len() - 1;
        for i in 0..self.joints.len() {
            if i == tip {
                self.joints[i].x = sway;
                self.joints[i].z = sway;
            } else {
                let next = self.joints[i + 1];
                let joint = &mut self.joints[i];
                joint.x += (next.x - joint.x) / 5.0;
                joint.y += (next.y - joint.y - 1.0) / 5.0;
                joint.z += (next.z - joint.z) / 5.0;
            }
        }
    }

    /// Advance and push the new geometry into the scene
    pub fn step(&mut self, ctx: &mut RenderContext) -> Result<(), SceneError> {
        self.advance();
        ctx.scene.set_model(self.model, self.model())
    }
}
