/// Command-line configuration for the terminal renderer
use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use painter3d_core::{
    stl, Camera, CameraDepth, Color, ControlSettings, DirectProjection, MirrorBehind, Placement,
    RenderContext, RenderOptions, Viewport, WorldDepth,
};

use crate::scenes::{self, DemoScene, Strand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DepthMode {
    /// Mean world-space z (legacy)
    World,
    /// Mean camera-space z
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BehindMode {
    /// Mirror points the facing test puts behind the camera (legacy)
    Mirror,
    /// Always use the plain perspective projection
    Direct,
}

#[derive(Debug, Parser)]
#[command(
    name = "painter3d-terminal",
    about = "Painter's-algorithm 3D renderer for the terminal"
)]
pub struct Args {
    /// Demo scene to load
    #[arg(long, value_enum, default_value_t = DemoScene::Cubes)]
    pub scene: DemoScene,

    /// Render an STL file instead of a demo scene
    #[arg(long)]
    pub stl: Option<PathBuf>,

    /// Uniform scale applied to the STL model
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Color token for STL triangles
    #[arg(long, default_value = "#ccc")]
    pub color: String,

    /// Fill triangles as well as outlining them
    #[arg(long)]
    pub fill: bool,

    #[arg(long, value_enum, default_value_t = DepthMode::World)]
    pub depth: DepthMode,

    #[arg(long, value_enum, default_value_t = BehindMode::Mirror)]
    pub behind: BehindMode,

    /// World units moved per key press
    #[arg(long, default_value_t = 1.0)]
    pub move_speed: f64,

    /// Radians turned per key press
    #[arg(long, default_value_t = 0.05)]
    pub turn_speed: f64,

    /// Field of view in degrees, overriding the scene camera
    #[arg(long)]
    pub fov: Option<f64>,

    /// Write log records to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn controls(&self) -> ControlSettings {
        ControlSettings {
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
        }
    }

    /// Install the logger, filtered by `RUST_LOG`.
    ///
    /// Records go to `--log-file` when given. Otherwise they go to stderr, but
    /// only when stderr is redirected: writing into the terminal would tear
    /// the rendered frame.
    pub fn init_logging(&self) -> Result<()> {
        let mut builder = env_logger::Builder::from_default_env();
        match &self.log_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create log file {}", path.display()))?;
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None if io::stderr().is_terminal() => return Ok(()),
            None => {}
        }
        builder.try_init().context("failed to install logger")
    }

    /// Build the render context and scene described by the arguments
    pub fn build_context(&self) -> Result<(RenderContext, Option<Strand>)> {
        let mut ctx = RenderContext::new(Viewport::default(), Camera::default()).with_options(
            RenderOptions {
                fill_triangles: self.fill,
            },
        );
        match self.depth {
            DepthMode::World => ctx.set_depth_metric(WorldDepth),
            DepthMode::Camera => ctx.set_depth_metric(CameraDepth),
        }
        match self.behind {
            BehindMode::Mirror => ctx.set_behind_policy(MirrorBehind),
            BehindMode::Direct => ctx.set_behind_policy(DirectProjection),
        }

        let strand = match &self.stl {
            Some(path) => {
                let data = fs::read(path)
                    .with_context(|| format!("failed to read STL file {}", path.display()))?;
                let model = stl::parse_stl(&data, &Color::new(self.color.as_str()))
                    .with_context(|| format!("failed to parse STL file {}", path.display()))?;
                info!(
                    "loaded {} triangles from {}",
                    model.triangles.len(),
                    path.display()
                );
                ctx.camera =
                    Camera::new(0.0, 2.0, -10.0, std::f64::consts::FRAC_PI_4, 0.0, 0.0, 0.0);
                let id = ctx.scene.add_model(model);
                ctx.scene.add_entity(
                    id,
                    Placement::default().with_scale(self.scale, self.scale, self.scale),
                )?;
                None
            }
            None => scenes::load(self.scene, &mut ctx)?,
        };

        if let Some(degrees) = self.fov {
            ctx.camera.fov = degrees.to_radians();
        }
        Ok((ctx, strand))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use painter3d_core::{DrawCommand, RecordingSurface};

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["painter3d-terminal"]).unwrap();
        assert_eq!(args.scene, DemoScene::Cubes);
        assert_eq!(args.depth, DepthMode::World);
        assert_eq!(args.behind, BehindMode::Mirror);
        assert!(!args.fill);
        assert_eq!(args.controls(), ControlSettings::default());
    }

    #[test]
    fn test_fill_and_fov() {
        let args = Args::try_parse_from([
            "painter3d-terminal",
            "--scene",
            "cube",
            "--fill",
            "--fov",
            "90",
        ])
        .unwrap();
        let (mut ctx, strand) = args.build_context().unwrap();
        assert!(strand.is_none());
        assert!((ctx.camera.fov - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let mut surface = RecordingSurface::new();
        ctx.tick(&mut surface).unwrap();
        assert_eq!(surface.count(&DrawCommand::Fill), 12);
    }

    #[test]
    fn test_strand_scene_is_animated() {
        let args = Args::try_parse_from(["painter3d-terminal", "--scene", "strand"]).unwrap();
        let (_, strand) = args.build_context().unwrap();
        assert!(strand.is_some());
    }

    #[test]
    fn test_missing_stl_file() {
        let args = Args::try_parse_from([
            "painter3d-terminal",
            "--stl",
            "/nonexistent/painter3d/model.stl",
        ])
        .unwrap();
        let err = args.build_context().err().unwrap();
        assert!(err.to_string().contains("failed to read STL file"));
    }

    #[test]
    fn test_log_file_receives_records() {
        let path = std::env::temp_dir().join(format!("painter3d-{}.log", std::process::id()));
        let path_arg = path.to_string_lossy().into_owned();
        let args =
            Args::try_parse_from(["painter3d-terminal", "--log-file", path_arg.as_str()]).unwrap();
        assert_eq!(args.log_file.as_deref(), Some(path.as_path()));

        args.init_logging().unwrap();
        log::error!("log file check");
        let contents = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert!(contents.contains("log file check"));
    }

    #[test]
    fn test_unwritable_log_file() {
        let args = Args::try_parse_from([
            "painter3d-terminal",
            "--log-file",
            "/nonexistent/painter3d/run.log",
        ])
        .unwrap();
        let err = args.init_logging().unwrap_err();
        assert!(err.to_string().contains("failed to create log file"));
    }

    #[test]
    fn test_rejects_unknown_depth_mode() {
        assert!(Args::try_parse_from(["painter3d-terminal", "--depth", "zbuffer"]).is_err());
    }
}
