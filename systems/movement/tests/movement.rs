use maze_chase_core::{Actor, Command, Direction, Event, Motion, PixelPosition, WRAP_LEFT_TARGET};
use maze_chase_system_movement::{advance, Movement};
use maze_chase_world::{self as world, query, World};

const TUNNEL_Y: i32 = 117;

#[test]
fn player_leaves_spawn_along_the_top_corridor() {
    let mut world = World::default();
    let movement = Movement;

    step_player(&mut world, &movement);
    let player = query::player(&world);
    assert_eq!(player.motion.position, PixelPosition::new(17, 13));
    assert!(!player.motion.mouth_open);

    for _ in 0..4 {
        step_player(&mut world, &movement);
    }
    let player = query::player(&world);
    assert_eq!(player.motion.position, PixelPosition::new(25, 13));
    assert_eq!(player.motion.orientation, Some(Direction::Right));
    assert!(!player.motion.mouth_open);
}

#[test]
fn mouth_alternates_even_while_stalled() {
    let world = World::default();
    let board = query::board(&world);
    // Tile (1,1) forbids Up, so the actor stalls at its centre.
    let mut motion = Motion::spawn(PixelPosition::new(15, 13), Direction::Up);

    for tick in 1..=6 {
        motion = advance(motion, board);
        assert_eq!(motion.position, PixelPosition::new(15, 13));
        assert_eq!(motion.mouth_open, tick % 2 == 0, "tick {tick}");
    }
}

#[test]
fn tunnel_wraps_in_both_directions() {
    let world = World::default();
    let board = query::board(&world);

    let east = advance(
        Motion::spawn(PixelPosition::new(224, TUNNEL_Y), Direction::Right),
        board,
    );
    assert_eq!(east.position, PixelPosition::new(-1, TUNNEL_Y));

    let west = advance(
        Motion::spawn(PixelPosition::new(0, TUNNEL_Y), Direction::Left),
        board,
    );
    assert_eq!(west.position, PixelPosition::new(WRAP_LEFT_TARGET, TUNNEL_Y));
}

#[test]
fn crossing_the_tunnel_returns_to_the_maze() {
    let world = World::default();
    let board = query::board(&world);
    let mut motion = Motion::spawn(PixelPosition::new(199, TUNNEL_Y), Direction::Right);

    let mut wrapped = false;
    for _ in 0..40 {
        let before = motion.position.x();
        motion = advance(motion, board);
        wrapped |= motion.position.x() < before;
    }

    assert!(wrapped, "actor never wrapped through the tunnel");
    assert_eq!(motion.position.y(), TUNNEL_Y);
    assert_eq!(motion.orientation, Some(Direction::Right));
}

#[test]
fn aligned_departures_respect_tile_exits() {
    let world = World::default();
    let board = query::board(&world);
    let script = [
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Left,
    ];
    let mut motion = Motion::spawn(PixelPosition::new(15, 13), Direction::Right);

    for tick in 0..4000_usize {
        motion.next_turn = Some(script[(tick / 90) % script.len()]);
        let before = motion;
        motion = advance(motion, board);

        let cell = board.clamp(motion.position.tile());
        let tile = board.tile(cell).expect("clamped tile lies on the board");
        assert!(tile.is_open(), "entered closed tile {cell:?} on tick {tick}");

        if before.position.is_tile_aligned() && before.position != motion.position {
            let departure = board
                .tile(board.clamp(before.position.tile()))
                .expect("departure tile lies on the board");
            let heading = before.orientation.expect("moving actor has a heading");
            assert!(
                departure.can_go(heading),
                "left {:?} through a forbidden {heading:?} exit",
                before.position
            );
        }
    }
}

fn step_player(world: &mut World, movement: &Movement) {
    let motion = query::player(world).motion;
    let mut commands = Vec::new();
    movement.handle(Actor::Player, motion, query::board(world), &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    assert!(events.iter().all(|event| matches!(
        event,
        Event::ActorMoved { .. } | Event::ActorTurned { .. }
    )));
}

#[test]
fn steer_command_is_picked_up_at_next_centre() {
    let mut world = World::default();
    let movement = Movement;
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetIntent {
            direction: Direction::Down,
        },
        &mut events,
    );

    // The next centre is (1,2), which forbids Down.
    step_player(&mut world, &movement);
    step_player(&mut world, &movement);
    step_player(&mut world, &movement);
    step_player(&mut world, &movement);
    let player = query::player(&world);
    assert_eq!(player.motion.position, PixelPosition::new(23, 13));
    assert_eq!(player.motion.next_turn, Some(Direction::Down));
    assert_eq!(player.motion.orientation, Some(Direction::Right));
}
