use snake_core::{Command, Direction, Rgb};
use snake_system_motion::{interpolate, Palette, RibbonPiece, SnakeFrame};
use snake_world::{self as world, query, World};

const UNIT: f32 = 40.0;

fn tick(world: &mut World) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
}

fn frame(world: &World, fraction: f32) -> SnakeFrame {
    interpolate(&query::snake(world), fraction, UNIT, &Palette::default())
}

fn assert_frames_match(end: &SnakeFrame, start: &SnakeFrame) {
    assert!(
        end.head.center.distance(start.head.center) < 1e-3,
        "head moved from {:?} to {:?}",
        end.head.center,
        start.head.center
    );
    assert!((end.head.angle_degrees - start.head.angle_degrees).abs() < 1e-3);
    assert!(end.tail.center.distance(start.tail.center) < 1e-3);
    assert!((end.tail.radius - start.tail.radius).abs() < 1e-4);
    assert_eq!(end.tail.color, start.tail.color);

    let head_end = |frame: &SnakeFrame| {
        frame
            .pieces
            .last()
            .map(|piece| piece.point_at(1.0))
            .expect("ribbon")
    };
    assert!(head_end(end).distance(head_end(start)) < 1e-3);

    let total = |frame: &SnakeFrame| frame.pieces.iter().map(RibbonPiece::length).sum::<f32>();
    assert!((total(end) - total(start)).abs() < 1e-2);
}

#[test]
fn straight_travel_is_continuous_across_ticks() {
    let mut world = World::new();
    let end = frame(&world, 1.0);
    tick(&mut world);
    let start = frame(&world, 0.0);

    assert_frames_match(&end, &start);
    assert_eq!(start.pieces.len(), 1);
}

#[test]
fn turns_are_continuous_across_ticks() {
    let mut world = World::new();
    tick(&mut world);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ChangeDirection {
            direction: Direction::Up,
            requested_at: 0.4,
        },
        &mut events,
    );
    let end = frame(&world, 1.0);
    tick(&mut world);
    let start = frame(&world, 0.0);

    assert_frames_match(&end, &start);
    assert!(start
        .pieces
        .iter()
        .any(|piece| matches!(piece, RibbonPiece::Arc { .. })));
}

#[test]
fn head_rotates_through_the_requested_turn() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ChangeDirection {
            direction: Direction::Down,
            requested_at: 0.5,
        },
        &mut events,
    );

    assert_eq!(frame(&world, 0.5).head.angle_degrees, 90.0);
    assert_eq!(frame(&world, 0.75).head.angle_degrees, 135.0);
    assert_eq!(frame(&world, 1.0).head.angle_degrees, 180.0);
}

#[test]
fn palette_reads_from_toml() {
    let palette: Palette = toml::from_str(
        r#"
            [head]
            red = 194
            green = 68
            blue = 189
        "#,
    )
    .expect("palette");

    assert_eq!(palette.head, Rgb::from_rgb(194, 68, 189));
    assert_eq!(palette.tail, Palette::default().tail);
}
