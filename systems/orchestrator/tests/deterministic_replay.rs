use maze_chase_core::{
    ClydeMode, Command, Direction, Event, GhostSnapshot, PlayerSnapshot, ReflectionAnchor,
    SessionConfig,
};
use maze_chase_system_orchestrator::{Orchestrator, SessionStatus, TickOutcome};
use maze_chase_world::{self as world, query, World};

const TICKS: u64 = 2400;

#[test]
fn deterministic_replay_produces_identical_sessions() {
    for config in configs() {
        let first = replay(config, &scripted_intents());
        let second = replay(config, &scripted_intents());

        assert_eq!(first, second, "replay diverged for {config:?}");
        assert!(
            first.events.iter().any(|event| matches!(event, Event::ActorMoved { .. })),
            "nothing moved for {config:?}"
        );
        assert!(first.ticks > 0);
    }
}

#[test]
fn intents_change_the_outcome() {
    let config = SessionConfig::default();
    let scripted = replay(config, &scripted_intents());
    let idle = replay(config, &[]);

    assert_ne!(scripted.player, idle.player);
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    ticks: u64,
    status: SessionStatus,
    player: PlayerSnapshot,
    ghosts: Vec<GhostSnapshot>,
    visited: usize,
    events: Vec<Event>,
}

fn replay(config: SessionConfig, intents: &[(u64, Direction)]) -> ReplayOutcome {
    let mut world = World::new(config);
    let mut orchestrator = Orchestrator::new(config.timing);
    let mut log = Vec::new();

    while orchestrator.tick() < TICKS {
        for (_, direction) in intents
            .iter()
            .filter(|(tick, _)| *tick == orchestrator.tick())
        {
            world::apply(
                &mut world,
                Command::SetIntent {
                    direction: *direction,
                },
                &mut log,
            );
        }
        if orchestrator.step(&mut world, &mut log) == TickOutcome::Ended {
            break;
        }
    }

    let visited = query::board(&world)
        .iter()
        .filter(|(_, tile)| tile.is_visited())
        .count();

    ReplayOutcome {
        ticks: orchestrator.tick(),
        status: orchestrator.status(),
        player: query::player(&world),
        ghosts: query::ghosts(&world).into_vec(),
        visited,
        events: log,
    }
}

fn configs() -> [SessionConfig; 2] {
    let reference = SessionConfig::default();
    let variant = SessionConfig {
        clyde: ClydeMode::Idle,
        inky_anchor: ReflectionAnchor::Tile,
        ..SessionConfig::default()
    };
    [reference, variant]
}

fn scripted_intents() -> Vec<(u64, Direction)> {
    vec![
        (0, Direction::Down),
        (30, Direction::Right),
        (120, Direction::Down),
        (240, Direction::Left),
        (360, Direction::Up),
        (480, Direction::Right),
        (700, Direction::Down),
        (900, Direction::Left),
    ]
}
