use maze_chase_core::{
    Actor, BoardView, Command, Direction, ExitMask, GhostKind, Motion, PixelPosition,
    ReflectionAnchor, Tile, TileCoord,
};
use maze_chase_system_pursuit::{decide, Pursuit, PursuitContext, Strategy};
use maze_chase_world::{self as world, query, World};

#[test]
fn open_tile_prefers_down_for_a_goal_due_south() {
    let tiles = vec![Tile::new(ExitMask::OPEN); 25];
    let board = BoardView::new(&tiles, 5, 5);
    let centre = PixelPosition::new(31, 29);
    assert_eq!(centre.tile(), TileCoord::new(3, 3));

    for orientation in [Some(Direction::Left), Some(Direction::Right), None] {
        let mut motion = Motion::spawn(centre, Direction::Left);
        motion.orientation = orientation;
        assert_eq!(
            decide(&motion, TileCoord::new(4, 3), board),
            Some(Direction::Down),
            "orientation {orientation:?}"
        );
    }
}

#[test]
fn scatter_corners_ignore_the_player() {
    let world = World::default();
    let board = query::board(&world);

    for player_position in [PixelPosition::new(15, 13), PixelPosition::new(207, 237)] {
        let context = PursuitContext {
            board,
            player: Motion::spawn(player_position, Direction::Left),
            blinky: Some(PixelPosition::new(111, 93)),
            anchor: ReflectionAnchor::Tile,
        };
        assert_eq!(
            Strategy::Blinky.goal(true, &context),
            Some(TileCoord::new(0, 27))
        );
        assert_eq!(
            Strategy::Pinky.goal(true, &context),
            Some(TileCoord::new(0, 0))
        );
        assert_eq!(
            Strategy::Inky.goal(true, &context),
            Some(TileCoord::new(30, 0))
        );
    }
}

#[test]
fn chase_steering_from_spawn() {
    let world = World::default();
    let commands = steer_all(&world);

    assert_eq!(
        commands,
        vec![
            steer(GhostKind::Blinky, Some(Direction::Left)),
            steer(GhostKind::Pinky, Some(Direction::Up)),
            steer(GhostKind::Inky, Some(Direction::Left)),
        ]
    );
}

#[test]
fn default_inky_goal_reflects_through_blinky_pixels() {
    let world = World::default();
    let context = PursuitContext {
        board: query::board(&world),
        player: query::player(&world).motion,
        blinky: query::ghost(&world, GhostKind::Blinky).map(|ghost| ghost.motion.position),
        anchor: query::config(&world).inky_anchor,
    };
    assert_eq!(context.anchor, ReflectionAnchor::Pixel);

    // Two tiles ahead of the player is (1,3); Blinky stands at pixel (111,93).
    assert_eq!(
        Strategy::Inky.goal(false, &context),
        Some(TileCoord::new(2 - 93, 6 - 111))
    );

    let tile_anchored = PursuitContext {
        anchor: ReflectionAnchor::Tile,
        ..context
    };
    assert_eq!(
        Strategy::Inky.goal(false, &tile_anchored),
        Some(TileCoord::new(-9, -7))
    );
}

#[test]
fn scatter_steering_from_spawn() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetScatterMode { active: true },
        &mut events,
    );

    let commands = steer_all(&world);
    assert_eq!(
        commands,
        vec![
            steer(GhostKind::Blinky, Some(Direction::Right)),
            steer(GhostKind::Pinky, Some(Direction::Up)),
            steer(GhostKind::Inky, Some(Direction::Left)),
        ]
    );
}

#[test]
fn flee_mode_leaves_goals_unchanged() {
    let mut world = World::default();
    let before = steer_all(&world);

    let mut events = Vec::new();
    world::apply(&mut world, Command::SetFleeMode { active: true }, &mut events);

    assert_eq!(steer_all(&world), before);
}

fn steer_all(world: &World) -> Vec<Command> {
    let board = query::board(world);
    let context = PursuitContext {
        board,
        player: query::player(world).motion,
        blinky: query::ghost(world, GhostKind::Blinky).map(|ghost| ghost.motion.position),
        anchor: query::config(world).inky_anchor,
    };

    let mut commands = Vec::new();
    for ghost in query::ghosts(world).iter() {
        Pursuit.handle(ghost, &context, &mut commands);
    }
    commands
}

fn steer(kind: GhostKind, next_turn: Option<Direction>) -> Command {
    Command::SteerActor {
        actor: Actor::Ghost(kind),
        next_turn,
    }
}
