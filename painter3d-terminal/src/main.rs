/// Painter3D Terminal Demo
///
/// Renders a demo scene or an STL model with the painter's-algorithm
/// pipeline.
/// Controls:
///   - W/S: Move along z
///   - A/D: Move along x
///   - Space/C: Move up/down
///   - Arrow Keys: Turn the camera
///   - Q/ESC: Quit
///
/// Logging follows `RUST_LOG`. Records go to `--log-file <PATH>`, or to
/// stderr when it is redirected (`2>painter3d.log`). Nothing is logged into
/// the terminal the frame is drawn on.
use anyhow::Result;
use clap::Parser;
use painter3d_terminal::{cli::Args, TerminalApp};

fn main() -> Result<()> {
    let args = Args::parse();
    args.init_logging()?;

    let (ctx, strand) = args.build_context()?;

    let mut app = TerminalApp::new(ctx, args.controls(), strand)?;
    app.run()
}
