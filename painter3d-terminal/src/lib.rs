/// Terminal front end: character-cell surface, demo scenes and the event loop
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::debug;
use painter3d_core::{ControlSettings, RenderContext};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod scenes;
pub mod surface;

pub use scenes::{DemoScene, Strand};
pub use surface::TerminalSurface;

/// Poll interval when nothing is animating
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Map a terminal key to the browser-style key name the camera controls use
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        // Terminals never report a bare Shift press
        KeyCode::Char('c') => "Shift",
        KeyCode::Char(c) => return Some(c.to_string()),
        _ => return None,
    };
    Some(name.to_string())
}

/// Main application struct for terminal 3D rendering.
///
/// Ticks happen once at startup, on every strand timer step and after every
/// bound key press, always one at a time on this thread.
pub struct TerminalApp {
    ctx: RenderContext,
    surface: TerminalSurface,
    controls: ControlSettings,
    strand: Option<Strand>,
    running: bool,
    last_step: Instant,
    ticks: u64,
    tick_time: Duration,
}

impl TerminalApp {
    pub fn new(
        mut ctx: RenderContext,
        controls: ControlSettings,
        strand: Option<Strand>,
    ) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        ctx.resize(width as f64, height as f64);

        Ok(Self {
            ctx,
            surface: TerminalSurface::new(width as usize, height as usize),
            controls,
            strand,
            running: true,
            last_step: Instant::now(),
            ticks: 0,
            tick_time: Duration::ZERO,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        self.tick()?;

        while self.running {
            let timeout = if self.strand.is_some() {
                scenes::STRAND_INTERVAL.saturating_sub(self.last_step.elapsed())
            } else {
                IDLE_POLL
            };

            if event::poll(timeout)? {
                self.handle_event(event::read()?)?;
            }

            if self.running && self.last_step.elapsed() >= scenes::STRAND_INTERVAL {
                if let Some(strand) = self.strand.as_mut() {
                    self.last_step = Instant::now();
                    strand.step(&mut self.ctx)?;
                    self.tick()?;
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                code => {
                    if let Some(key) = key_name(code) {
                        let started = Instant::now();
                        if self.ctx.handle_key(&key, &self.controls, &mut self.surface)? {
                            self.tick_time = started.elapsed();
                            self.ticks += 1;
                            self.present()?;
                        }
                    }
                }
            },
            Event::Resize(width, height) => {
                debug!("resized to {}x{}", width, height);
                self.surface = TerminalSurface::new(width as usize, height as usize);
                self.ctx.resize(width as f64, height as f64);
                self.tick()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        let started = Instant::now();
        self.ctx.tick(&mut self.surface)?;
        self.tick_time = started.elapsed();
        self.ticks += 1;
        self.present()
    }

    fn present(&mut self) -> Result<()> {
        let mut stdout = stdout();
        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = &self.ctx.camera;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Painter3D | tick {} ({:.1} ms) | cam ({:.1}, {:.1}, {:.1}) | \
                 WASD/Space/C=Move Arrows=Turn Q=Quit",
                self.ticks,
                self.tick_time.as_secs_f64() * 1000.0,
                camera.position.x,
                camera.position.y,
                camera.position.z,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
