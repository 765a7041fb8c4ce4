use painter3d_core::{
    Camera, DrawCommand, Model, Placement, RecordingSurface, RenderContext, RenderOptions,
    Viewport,
};
use std::f64::consts::FRAC_PI_4;

fn cube_scene() -> RenderContext {
    let mut ctx = RenderContext::new(
        Viewport::new(1000.0, 1000.0),
        Camera::new(0.0, 2.0, -10.0, FRAC_PI_4, 0.0, 0.0, 0.0),
    );
    let cube = ctx.scene.add_model(Model::cube(50.0));
    ctx.scene.add_entity(cube, Placement::default()).unwrap();
    ctx
}

#[test]
fn test_single_cube_tick() {
    let mut ctx = cube_scene();
    let mut surface = RecordingSurface::new();
    ctx.tick(&mut surface).unwrap();

    let frame = ctx.frame();
    assert_eq!(frame.screen.len(), 8);
    assert_eq!(frame.world.triangles.len(), 12);

    let reference = Model::cube(50.0);
    for (world, model) in frame.world.triangles.iter().zip(&reference.triangles) {
        assert_eq!(world.color, model.color);
        assert_eq!(world.indices, model.indices);
    }

    // Mean world z: back face (-50), then the four -100/3 sides, the four
    // -50/3 sides, and the front face (0); ties keep buffer order.
    let order: Vec<usize> = frame.order.iter().map(|e| e.triangle).collect();
    assert_eq!(order, vec![2, 3, 5, 6, 8, 11, 4, 7, 9, 10, 0, 1]);
    assert!(frame.order.windows(2).all(|w| w[0].depth <= w[1].depth));

    assert_eq!(
        surface.stroke_colors(),
        vec![
            "#00f", "#00f", "#0f0", "#0ff", "#0f0", "#ff0", "#0f0", "#0ff", "#0f0", "#ff0", "#f00",
            "#f00"
        ]
    );
}

#[test]
fn test_draw_commands_use_projected_points() {
    let mut ctx = cube_scene();
    let mut surface = RecordingSurface::new();
    ctx.tick(&mut surface).unwrap();

    let frame = ctx.frame();
    let first = &frame.world.triangles[frame.order[0].triangle];
    let start = frame.screen[first.indices[0]];
    assert_eq!(
        surface.commands[2],
        DrawCommand::MoveTo {
            x: start.x,
            y: start.y
        }
    );
}

#[test]
fn test_ticks_are_repeatable() {
    let mut ctx = cube_scene().with_options(RenderOptions {
        fill_triangles: true,
    });
    let mut first = RecordingSurface::new();
    let mut second = RecordingSurface::new();
    ctx.tick(&mut first).unwrap();
    ctx.tick(&mut second).unwrap();
    assert_eq!(first.commands, second.commands);
}

#[test]
fn test_world_expansion_totals() {
    let mut ctx = cube_scene();
    let cube = painter3d_core::ModelId(0);
    for (x, y, z) in [
        (100.0, 0.0, 0.0),
        (50.0, -50.0, 0.0),
        (50.0, 50.0, 0.0),
        (50.0, 0.0, 50.0),
        (50.0, 0.0, -50.0),
    ] {
        ctx.scene.add_entity(cube, Placement::at(x, y, z)).unwrap();
    }
    ctx.tick(&mut RecordingSurface::new()).unwrap();

    let frame = ctx.frame();
    assert_eq!(frame.world.vertices.len(), 6 * 8);
    assert_eq!(frame.world.triangles.len(), 6 * 12);
    assert_eq!(frame.screen.len(), frame.world.vertices.len());
    assert!(frame
        .world
        .triangles
        .iter()
        .flat_map(|t| t.indices)
        .all(|i| i < 48));
}
