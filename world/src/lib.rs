#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

pub mod layout;

use maze_chase_core::{
    Actor, BoardView, ClydeMode, Command, Direction, Event, GhostKind, Motion, PixelPosition,
    SessionConfig, Tile, TileCoord, BOARD_COLUMNS, BOARD_ROWS, DEATH_SEQUENCE_LENGTH,
};

pub use layout::{Layout, LayoutError};

const PLAYER_SPAWN: PixelPosition = PixelPosition::new(15, 13);
const PLAYER_HEADING: Direction = Direction::Right;
const GHOST_HEADING: Direction = Direction::Up;

const GHOST_SPAWNS: [(GhostKind, PixelPosition); 4] = [
    (GhostKind::Blinky, PixelPosition::new(111, 93)),
    (GhostKind::Pinky, PixelPosition::new(127, 93)),
    (GhostKind::Inky, PixelPosition::new(143, 93)),
    (GhostKind::Clyde, PixelPosition::new(159, 93)),
];

/// The fixed 31x28 tile graph the session is played on.
///
/// Exit permissions never change after construction; only the per-tile
/// `visited` marker is mutated, through [`Board::mark_visited`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Builds the reference maze.
    #[must_use]
    pub fn build() -> Self {
        Self::from_layout(&Layout::classic())
    }

    /// Builds a board from a loaded layout.
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        let tiles: Vec<Tile> = layout.cells().iter().copied().map(Tile::new).collect();
        log::debug!(
            "built board with {} open tiles",
            tiles.iter().filter(|tile| tile.is_open()).count()
        );
        Self { tiles }
    }

    /// Returns the tile at `(row, column)`, or `None` outside the board.
    #[must_use]
    pub fn tile(&self, row: i32, column: i32) -> Option<&Tile> {
        self.view().tile(TileCoord::new(row, column))
    }

    /// Marks the tile at `(row, column)` as visited.
    ///
    /// Returns `true` only the first time a tile is marked. Out-of-range
    /// indices are ignored.
    pub fn mark_visited(&mut self, row: i32, column: i32) -> bool {
        let Some(index) = index(TileCoord::new(row, column)) else {
            return false;
        };
        self.tiles
            .get_mut(index)
            .map_or(false, |tile| tile.mark_visited())
    }

    /// Number of tiles marked as visited.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_visited()).count()
    }

    /// Read-only view of the tiles for systems and adapters.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.tiles, BOARD_ROWS, BOARD_COLUMNS)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::build()
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    board: Board,
    player: Player,
    ghosts: Vec<Ghost>,
    config: SessionConfig,
}

impl World {
    /// Creates a world on the reference maze.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_board(Board::build(), config)
    }

    /// Creates a world on a custom board.
    #[must_use]
    pub fn with_board(board: Board, config: SessionConfig) -> Self {
        let ghosts = GHOST_SPAWNS
            .iter()
            .filter(|(kind, _)| *kind != GhostKind::Clyde || config.clyde == ClydeMode::Idle)
            .map(|&(kind, position)| Ghost {
                kind,
                motion: Motion::spawn(position, GHOST_HEADING),
                scatter_mode: false,
                flee_mode: false,
            })
            .collect();

        Self {
            board,
            player: Player {
                motion: Motion::spawn(PLAYER_SPAWN, PLAYER_HEADING),
                death_count: 0,
            },
            ghosts,
            config,
        }
    }

    fn ghost_mut(&mut self, kind: GhostKind) -> Option<&mut Ghost> {
        self.ghosts.iter_mut().find(|ghost| ghost.kind == kind)
    }

    fn motion_mut(&mut self, actor: Actor) -> Option<&mut Motion> {
        match actor {
            Actor::Player => Some(&mut self.player.motion),
            Actor::Ghost(kind) => self.ghost_mut(kind).map(|ghost| &mut ghost.motion),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    motion: Motion,
    death_count: u8,
}

#[derive(Clone, Copy, Debug)]
struct Ghost {
    kind: GhostKind,
    motion: Motion,
    scatter_mode: bool,
    flee_mode: bool,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetIntent { direction } => {
            world.player.motion.next_turn = Some(direction);
            out_events.push(Event::IntentQueued { direction });
        }
        Command::MarkVisited { cell } => {
            if world.board.mark_visited(cell.row(), cell.column()) {
                out_events.push(Event::TileVisited { cell });
            }
        }
        Command::SetScatterMode { active } => {
            let mut changed = false;
            for ghost in &mut world.ghosts {
                changed |= ghost.scatter_mode != active;
                ghost.scatter_mode = active;
            }
            if changed {
                out_events.push(Event::ScatterModeChanged { active });
            }
        }
        Command::SetFleeMode { active } => {
            let mut changed = false;
            for ghost in &mut world.ghosts {
                changed |= ghost.flee_mode != active;
                ghost.flee_mode = active;
            }
            if changed {
                out_events.push(Event::FleeModeChanged { active });
            }
        }
        Command::CatchPlayer => {
            if world.player.death_count < DEATH_SEQUENCE_LENGTH {
                world.player.death_count += 1;
                out_events.push(Event::PlayerCaught {
                    death_count: world.player.death_count,
                });
            }
        }
        Command::SteerActor { actor, next_turn } => {
            if let Some(motion) = world.motion_mut(actor) {
                motion.next_turn = next_turn;
            }
        }
        Command::MoveActor { actor, motion } => {
            let Some(current) = world.motion_mut(actor) else {
                return;
            };
            let before = *current;
            *current = motion;

            if before.orientation != motion.orientation {
                out_events.push(Event::ActorTurned {
                    actor,
                    orientation: motion.orientation,
                });
            }
            if before.position != motion.position {
                out_events.push(Event::ActorMoved {
                    actor,
                    from: before.position,
                    to: motion.position,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_chase_core::{
        BoardView, GhostKind, GhostSnapshot, PlayerSnapshot, SessionConfig, TileCoord,
    };

    /// Exposes a read-only view of the maze tiles.
    #[must_use]
    pub fn board(world: &World) -> BoardView<'_> {
        world.board.view()
    }

    /// Reports whether the player has crossed the tile at `cell`.
    #[must_use]
    pub fn is_visited(world: &World, cell: TileCoord) -> bool {
        world
            .board
            .view()
            .tile(cell)
            .map_or(false, |tile| tile.is_visited())
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            motion: world.player.motion,
            death_count: world.player.death_count,
        }
    }

    /// Captures the state of a single pursuit agent, if it takes part in the session.
    #[must_use]
    pub fn ghost(world: &World, kind: GhostKind) -> Option<GhostSnapshot> {
        world
            .ghosts
            .iter()
            .find(|ghost| ghost.kind == kind)
            .map(|ghost| GhostSnapshot {
                kind: ghost.kind,
                motion: ghost.motion,
                scatter_mode: ghost.scatter_mode,
                flee_mode: ghost.flee_mode,
            })
    }

    /// Captures a read-only view of every pursuit agent in scheduling order.
    #[must_use]
    pub fn ghosts(world: &World) -> GhostView {
        let snapshots = world
            .ghosts
            .iter()
            .map(|ghost| GhostSnapshot {
                kind: ghost.kind,
                motion: ghost.motion,
                scatter_mode: ghost.scatter_mode,
                flee_mode: ghost.flee_mode,
            })
            .collect();
        GhostView { snapshots }
    }

    /// Pursuit agents taking part in the session, in scheduling order.
    #[must_use]
    pub fn roster(world: &World) -> Vec<GhostKind> {
        world.ghosts.iter().map(|ghost| ghost.kind).collect()
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }

    /// Read-only snapshot describing all pursuit agents.
    #[derive(Clone, Debug)]
    pub struct GhostView {
        snapshots: Vec<GhostSnapshot>,
    }

    impl GhostView {
        /// Iterator over the captured snapshots in scheduling order.
        pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<GhostSnapshot> {
            self.snapshots
        }
    }
}

fn index(cell: TileCoord) -> Option<usize> {
    let row = u32::try_from(cell.row()).ok()?;
    let column = u32::try_from(cell.column()).ok()?;
    if row >= BOARD_ROWS || column >= BOARD_COLUMNS {
        return None;
    }
    let row = usize::try_from(row).ok()?;
    let column = usize::try_from(column).ok()?;
    let width = usize::try_from(BOARD_COLUMNS).ok()?;
    Some(row * width + column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::ExitMask;

    #[test]
    fn mark_visited_reports_first_visit_only() {
        let mut board = Board::build();
        assert!(board.mark_visited(1, 1));
        assert!(!board.mark_visited(1, 1));
        assert_eq!(board.visited_count(), 1);
        assert!(!board.mark_visited(31, 0));
        assert!(!board.mark_visited(0, -1));
    }

    #[test]
    fn default_roster_omits_clyde() {
        let world = World::default();
        assert_eq!(
            query::roster(&world),
            vec![GhostKind::Blinky, GhostKind::Pinky, GhostKind::Inky]
        );
    }

    #[test]
    fn idle_clyde_joins_the_roster() {
        let config = SessionConfig {
            clyde: ClydeMode::Idle,
            ..SessionConfig::default()
        };
        let world = World::new(config);
        let clyde = query::ghost(&world, GhostKind::Clyde).expect("clyde spawned");
        assert_eq!(clyde.motion.position, PixelPosition::new(159, 93));
        assert_eq!(clyde.motion.orientation, Some(Direction::Up));
    }

    #[test]
    fn spawn_state_matches_reference() {
        let world = World::default();
        let player = query::player(&world);
        assert_eq!(player.motion.position, PixelPosition::new(15, 13));
        assert_eq!(player.motion.orientation, Some(Direction::Right));
        assert_eq!(player.motion.next_turn, None);
        assert!(player.motion.mouth_open);
        assert_eq!(player.death_count, 0);

        for ghost in query::ghosts(&world).iter() {
            assert_eq!(ghost.motion.orientation, Some(Direction::Up));
            assert_eq!(ghost.motion.position.y(), 93);
            assert!(!ghost.scatter_mode);
            assert!(!ghost.flee_mode);
        }
    }

    #[test]
    fn catch_player_saturates_at_sequence_end() {
        let mut world = World::default();
        let mut events = Vec::new();
        for _ in 0..20 {
            apply(&mut world, Command::CatchPlayer, &mut events);
        }
        assert_eq!(query::player(&world).death_count, DEATH_SEQUENCE_LENGTH);
        assert_eq!(events.len(), usize::from(DEATH_SEQUENCE_LENGTH));
        assert_eq!(
            events.last(),
            Some(&Event::PlayerCaught {
                death_count: DEATH_SEQUENCE_LENGTH
            })
        );
    }

    #[test]
    fn mode_commands_broadcast_only_on_change() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::SetScatterMode { active: true }, &mut events);
        apply(&mut world, Command::SetScatterMode { active: true }, &mut events);
        apply(&mut world, Command::SetFleeMode { active: true }, &mut events);
        assert_eq!(
            events,
            vec![
                Event::ScatterModeChanged { active: true },
                Event::FleeModeChanged { active: true },
            ]
        );
        assert!(query::ghosts(&world)
            .iter()
            .all(|ghost| ghost.scatter_mode && ghost.flee_mode));
    }

    #[test]
    fn move_actor_reports_turns_and_moves() {
        let mut world = World::default();
        let mut events = Vec::new();
        let mut motion = query::player(&world).motion;
        motion.position = PixelPosition::new(15, 14);
        motion.orientation = Some(Direction::Down);
        apply(
            &mut world,
            Command::MoveActor {
                actor: Actor::Player,
                motion,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::ActorTurned {
                    actor: Actor::Player,
                    orientation: Some(Direction::Down),
                },
                Event::ActorMoved {
                    actor: Actor::Player,
                    from: PixelPosition::new(15, 13),
                    to: PixelPosition::new(15, 14),
                },
            ]
        );
    }

    #[test]
    fn commands_for_absent_actors_are_ignored() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SteerActor {
                actor: Actor::Ghost(GhostKind::Clyde),
                next_turn: Some(Direction::Left),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::ghost(&world, GhostKind::Clyde).is_none());
    }

    #[test]
    fn custom_layouts_drive_the_board() {
        let mut text = String::from("maze-chase:v1:28x31\n");
        for _ in 0..31 {
            text.push_str(&"F".repeat(28));
            text.push('\n');
        }
        let layout = Layout::parse(&text).expect("open layout parses");
        let board = Board::from_layout(&layout);
        assert_eq!(
            board.tile(30, 27).map(|tile| tile.exits()),
            Some(ExitMask::OPEN)
        );
    }
}
