use snake_core::{
    AppleCount, AppleSlot, CellCoord, Command, Direction, Event, GridGeometry, Outcome, Viewport,
};
use snake_world::{self as world, query, World};

const UNIT: u32 = 10;

fn new_game(world: &mut World, viewport: Viewport, apples: AppleCount) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::NewGame {
            geometry: GridGeometry::new(UNIT, viewport),
            apples,
        },
        &mut events,
    );
    events
}

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    events
}

fn steer(world: &mut World, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    if query::direction(world) != direction {
        world::apply(
            world,
            Command::ChangeDirection {
                direction,
                requested_at: 0.0,
            },
            &mut events,
        );
    }
    events
}

#[test]
fn three_plain_ticks_then_an_apple() {
    let mut world = World::new();
    // 13 playable columns by 10 playable rows.
    let _ = new_game(&mut world, Viewport::new(150, 110), AppleCount::One);
    let start = query::head(&world);
    assert_eq!(start, CellCoord::new(6, 5));

    for _ in 0..3 {
        let events = tick(&mut world);
        assert_eq!(events.len(), 1, "unexpected events {events:?}");
    }
    assert_eq!(query::head(&world), CellCoord::new(start.column() + 3, 5));
    assert_eq!(query::snake_length(&world), 4);

    let events = tick(&mut world);
    assert!(events.contains(&Event::AppleEaten {
        slot: AppleSlot::new(1),
        cell: CellCoord::new(10, 5),
    }));
    assert!(events.contains(&Event::SnakeGrew { length: 5 }));
    assert_eq!(query::snake_length(&world), 5);
    assert_eq!(query::buffer_len(&world), 7);
}

/// Next heading along a closed tour of an 8 by 6 interior.
///
/// Odd rows run right, even rows run left, column eight climbs back to the
/// top and row zero runs home to column one.
fn tour(head: CellCoord) -> Direction {
    let (column, row) = (head.column(), head.row());
    if column == 8 {
        return if row > 0 {
            Direction::Up
        } else {
            Direction::Left
        };
    }
    if row == 0 {
        return if column > 1 {
            Direction::Left
        } else {
            Direction::Down
        };
    }
    if row % 2 == 1 {
        if column < 7 || row == 5 {
            Direction::Right
        } else {
            Direction::Down
        }
    } else if column > 1 {
        Direction::Left
    } else {
        Direction::Down
    }
}

fn play_tour(world: &mut World, apples: AppleCount) -> Vec<Event> {
    // 8 playable columns by 6 playable rows.
    let _ = new_game(world, Viewport::new(100, 70), apples);
    assert_eq!(query::head(world), CellCoord::new(4, 3));

    let mut log = Vec::new();
    for _ in 0..5_000 {
        let head = query::head(world);
        log.extend(steer(world, tour(head)));
        let events = tick(world);
        log.extend(events.iter().cloned());

        assert_eq!(query::buffer_len(world), query::snake_length(world) + 2);
        let body = query::body(world).to_vec();
        let view = query::apple_view(world);
        for event in &events {
            if let Event::AppleRelocated { slot, to } = *event {
                assert!(!body.contains(&to), "apple {slot:?} relocated onto the snake");
                assert!(
                    view.iter()
                        .filter(|apple| apple.slot != slot)
                        .all(|apple| apple.cell != to),
                    "apple {slot:?} relocated onto another apple at {to:?}"
                );
            }
        }
        for apple in query::apple_view(world).iter() {
            assert!(
                !body.contains(&apple.cell),
                "apple {:?} placed on the snake",
                apple.slot
            );
            assert!(query::geometry(world).is_playable(apple.cell));
        }

        if query::outcome(world).is_some() {
            break;
        }
    }
    log
}

#[test]
fn touring_the_board_fills_it_and_wins() {
    let mut world = World::with_seed(3);
    let log = play_tour(&mut world, AppleCount::One);

    assert_eq!(query::outcome(&world), Some(Outcome::Won));
    assert_eq!(query::snake_length(&world), 48);
    assert!(query::apple_view(&world).is_empty());
    assert_eq!(query::empty_cell_count(&world), 0);
    assert_eq!(
        &log[log.len() - 3..],
        &[
            Event::AppleRemoved {
                slot: AppleSlot::new(1)
            },
            Event::SnakeGrew { length: 48 },
            Event::GameOver {
                outcome: Outcome::Won
            },
        ]
    );
}

#[test]
fn every_apple_is_removed_before_the_win() {
    let mut world = World::with_seed(19);
    let log = play_tour(&mut world, AppleCount::Five);

    assert_eq!(query::outcome(&world), Some(Outcome::Won));
    let removed = log
        .iter()
        .filter(|event| matches!(event, Event::AppleRemoved { .. }))
        .count();
    assert_eq!(removed, 5);
    assert_eq!(
        log.iter()
            .filter(|event| matches!(event, Event::GameOver { .. }))
            .count(),
        1
    );
}

#[test]
fn five_apples_never_share_a_cell_across_seeds() {
    for seed in 0..8 {
        let mut world = World::with_seed(seed);
        let log = play_tour(&mut world, AppleCount::Five);

        let relocations = log
            .iter()
            .filter(|event| matches!(event, Event::AppleRelocated { .. }))
            .count();
        assert!(relocations > 30, "seed {seed}: only {relocations} relocations");
        assert_eq!(query::outcome(&world), Some(Outcome::Won));
    }
}

#[test]
fn replays_with_the_same_seed_match() {
    let first = {
        let mut world = World::with_seed(0xfeed);
        let log = play_tour(&mut world, AppleCount::Three);
        (log, query::snake(&world))
    };
    let second = {
        let mut world = World::with_seed(0xfeed);
        let log = play_tour(&mut world, AppleCount::Three);
        (log, query::snake(&world))
    };

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn restarting_keeps_the_world_consistent() {
    let mut world = World::with_seed(5);
    let _ = new_game(&mut world, Viewport::new(100, 70), AppleCount::One);
    let _ = steer(&mut world, Direction::Down);
    for _ in 0..4 {
        let _ = tick(&mut world);
    }
    assert_eq!(query::outcome(&world), Some(Outcome::Lost));

    let events = new_game(&mut world, Viewport::new(150, 110), AppleCount::Three);

    assert_eq!(events.len(), 1);
    assert_eq!(query::outcome(&world), None);
    assert_eq!(query::tick_index(&world), 0);
    assert_eq!(query::apple_view(&world).len(), 3);
    assert!(!query::snake(&world).failed);
    assert_eq!(query::head(&world), CellCoord::new(6, 5));
}
