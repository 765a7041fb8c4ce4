/// Character-cell draw surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use log::warn;
use painter3d_core::{Color as ColorToken, Surface};
use std::io::Write;

/// Glyph left behind by `stroke`
const STROKE_GLYPH: char = '*';
/// Glyph left behind by `fill`
const FILL_GLYPH: char = '#';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// Map `#rgb` / `#rrggbb` tokens to a 24-bit terminal color
pub fn parse_color(token: &str) -> Option<Color> {
    let hex = token.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some(Color::Rgb {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            })
        }
        6 => Some(Color::Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}

/// Grid of colored glyphs that accepts path commands.
///
/// One subpath at a time: `move_to` restarts the path. Segments touching a
/// non-finite point are skipped, everything else is clipped to the grid.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    path: Vec<(f64, f64)>,
    closed: bool,
    stroke_color: Color,
    fill_color: Color,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
            path: Vec::new(),
            closed: false,
            stroke_color: Color::White,
            fill_color: Color::White,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    fn plot(&mut self, x: f64, y: f64, cell: Cell) {
        let (x, y) = (x.floor(), y.floor());
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), cell: Cell) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        if !(dx.is_finite() && dy.is_finite()) {
            // finite endpoints whose difference overflows
            let mid = (from.0 * 0.5 + to.0 * 0.5, from.1 * 0.5 + to.1 * 0.5);
            if mid.0.is_finite() && mid.1.is_finite() && mid != from && mid != to {
                self.draw_line(from, mid, cell);
                self.draw_line(mid, to, cell);
            }
            return;
        }
        let Some(((x0, y0), (x1, y1))) =
            clip_segment(from, to, self.width as f64, self.height as f64)
        else {
            return;
        };

        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, cell);
        }
    }

    fn fill_triangle(&mut self, v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), cell: Cell) {
        // Bounding box, clipped to screen bounds
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0);
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0);
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y as usize..=max_y as usize {
            for x in min_x as usize..=max_x as usize {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.cells[y * self.width + x] = cell;
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn resolve(token: &ColorToken) -> Color {
    parse_color(token.as_str()).unwrap_or_else(|| {
        warn!("unsupported color token {:?}, drawing white", token.as_str());
        Color::White
    })
}

impl Surface for TerminalSurface {
    fn clear(&mut self, _width: f64, _height: f64) {
        self.cells.fill(Cell::EMPTY);
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.closed = false;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.clear();
        self.closed = false;
        self.path.push((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push((x, y));
    }

    fn close_path(&mut self) {
        self.closed = true;
    }

    fn set_stroke_color(&mut self, color: &ColorToken) {
        self.stroke_color = resolve(color);
    }

    fn set_fill_color(&mut self, color: &ColorToken) {
        self.fill_color = resolve(color);
    }

    fn stroke(&mut self) {
        let cell = Cell {
            glyph: STROKE_GLYPH,
            color: self.stroke_color,
        };
        let mut segments: Vec<_> = self.path.windows(2).map(|w| (w[0], w[1])).collect();
        if self.closed && self.path.len() > 2 {
            segments.push((self.path[self.path.len() - 1], self.path[0]));
        }
        for (from, to) in segments {
            if is_finite(from) && is_finite(to) {
                self.draw_line(from, to, cell);
            }
        }
    }

    fn fill(&mut self) {
        if self.path.len() < 3 {
            return;
        }
        if !self.path.iter().all(|&p| is_finite(p)) {
            warn!("skipping fill of path with non-finite points");
            return;
        }
        let cell = Cell {
            glyph: FILL_GLYPH,
            color: self.fill_color,
        };
        let first = self.path[0];
        let fan: Vec<_> = self.path[1..].windows(2).map(|w| (w[0], w[1])).collect();
        for (b, c) in fan {
            self.fill_triangle(first, b, c, cell);
        }
    }
}

fn is_finite(p: (f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

/// Clip a segment to `[0, width] x [0, height]` (Liang-Barsky)
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    height: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    if !(dx.is_finite() && dy.is_finite()) {
        return None;
    }
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, from.0),
        (dx, width - from.0),
        (-dy, from.1),
        (dy, height - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(surface: &mut TerminalSurface, points: [(f64, f64); 3], color: &str) {
        let token = ColorToken::from(color);
        surface.begin_path();
        surface.move_to(points[0].0, points[0].1);
        surface.line_to(points[1].0, points[1].1);
        surface.line_to(points[2].0, points[2].1);
        surface.close_path();
        surface.set_fill_color(&token);
        surface.set_stroke_color(&token);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#f00"), Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(
            parse_color("#0a0B10"),
            Some(Color::Rgb {
                r: 10,
                g: 11,
                b: 16
            })
        );
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#zzz"), None);
    }

    #[test]
    fn test_stroke_outlines_closed_path() {
        let mut surface = TerminalSurface::new(20, 10);
        triangle(&mut surface, [(1.0, 1.0), (15.0, 1.0), (1.0, 8.0)], "#0f0");
        surface.stroke();

        let green = Color::Rgb { r: 0, g: 255, b: 0 };
        for (x, y) in [(1, 1), (15, 1), (1, 8), (8, 1), (1, 5)] {
            assert_eq!(
                surface.cell(x, y),
                Some(Cell {
                    glyph: STROKE_GLYPH,
                    color: green
                })
            );
        }
        // interior untouched without fill
        assert_eq!(surface.cell(3, 3), Some(Cell::EMPTY));
    }

    #[test]
    fn test_fill_covers_interior() {
        let mut surface = TerminalSurface::new(20, 10);
        triangle(&mut surface, [(1.0, 1.0), (15.0, 1.0), (1.0, 8.0)], "#00f");
        surface.stroke();
        surface.fill();
        assert_eq!(surface.cell(3, 3).map(|c| c.glyph), Some(FILL_GLYPH));
        assert_eq!(surface.cell(18, 8), Some(Cell::EMPTY));
    }

    #[test]
    fn test_offscreen_segments_are_clipped() {
        let mut surface = TerminalSurface::new(10, 10);
        triangle(&mut surface, [(-1e12, 5.0), (1e12, 5.0), (0.0, -1e12)], "#fff");
        surface.stroke();
        assert_eq!(surface.cell(5, 5).map(|c| c.glyph), Some(STROKE_GLYPH));
    }

    #[test]
    fn test_extreme_span_is_split_before_clipping() {
        let mut surface = TerminalSurface::new(10, 10);
        surface.set_stroke_color(&ColorToken::from("#fff"));
        surface.begin_path();
        surface.move_to(-1e308, 5.0);
        surface.line_to(1e308, 5.0);
        surface.stroke();
        for x in [0, 3, 8, 9] {
            assert_eq!(surface.cell(x, 5).map(|c| c.glyph), Some(STROKE_GLYPH));
        }
        assert_eq!(surface.cell(3, 4), Some(Cell::EMPTY));
    }

    #[test]
    fn test_clip_rejects_overflowing_delta() {
        assert_eq!(clip_segment((-1e308, 5.0), (1e308, 5.0), 10.0, 10.0), None);
        assert_eq!(
            clip_segment((-5.0, 5.0), (15.0, 5.0), 10.0, 10.0),
            Some(((0.0, 5.0), (10.0, 5.0)))
        );
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let mut surface = TerminalSurface::new(10, 10);
        triangle(&mut surface, [(1.0, 1.0), (f64::INFINITY, 1.0), (f64::NAN, 5.0)], "#fff");
        surface.stroke();
        surface.fill();
        assert!((0..10).all(|y| (0..10).all(|x| surface.cell(x, y) == Some(Cell::EMPTY))));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut surface = TerminalSurface::new(10, 10);
        triangle(&mut surface, [(1.0, 1.0), (8.0, 1.0), (1.0, 8.0)], "#fff");
        surface.fill();
        surface.clear(10.0, 10.0);
        assert_eq!(surface.cell(2, 2), Some(Cell::EMPTY));
    }

    #[test]
    fn test_unknown_token_draws_white() {
        let mut surface = TerminalSurface::new(4, 4);
        surface.set_stroke_color(&ColorToken::from("papayawhip"));
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(3.0, 0.0);
        surface.stroke();
        assert_eq!(surface.cell(2, 0).map(|c| c.color), Some(Color::White));
    }
}
