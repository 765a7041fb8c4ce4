/// Abstract 2D draw surface the raster stage issues commands to
use crate::geometry::Color;

/// Path-based 2D canvas. Coordinates are pixels, origin top-left, y down.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn set_stroke_color(&mut self, color: &Color);
    fn set_fill_color(&mut self, color: &Color);
    fn stroke(&mut self);
    fn fill(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
    SetStrokeColor(Color),
    SetFillColor(Color),
    Stroke,
    Fill,
}

/// Surface that keeps every command it receives, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stroke colors in the order triangles were outlined
    pub fn stroke_colors(&self) -> Vec<&str> {
        let mut current = None;
        let mut colors = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::SetStrokeColor(color) => current = Some(color.as_str()),
                DrawCommand::Stroke => colors.extend(current),
                _ => {}
            }
        }
        colors
    }

    pub fn count(&self, wanted: &DrawCommand) -> usize {
        self.commands.iter().filter(|c| *c == wanted).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.commands.push(DrawCommand::SetStrokeColor(color.clone()));
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.commands.push(DrawCommand::SetFillColor(color.clone()));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
}
