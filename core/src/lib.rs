#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots
//! and a [`BoardView`], then answer with [`Command`] values. The world
//! executes those commands through its `apply` entry point and broadcasts
//! [`Event`] values describing what actually changed.

use serde::{Deserialize, Serialize};

/// Number of tile rows in the maze.
pub const BOARD_ROWS: u32 = 31;

/// Number of tile columns in the maze.
pub const BOARD_COLUMNS: u32 = 28;

/// Edge length of a single tile measured in pixels.
pub const TILE_SIZE: i32 = 8;

/// Pixel offset subtracted from a coordinate before dividing by [`TILE_SIZE`].
pub const TILE_ORIGIN: i32 = 4;

/// Horizontal pixel offset of a tile centre.
pub const CENTER_OFFSET_X: i32 = 15;

/// Vertical pixel offset of a tile centre.
pub const CENTER_OFFSET_Y: i32 = 13;

/// Right-hand wraparound threshold; positions beyond it re-enter on the left.
pub const WRAP_RIGHT_EDGE: i32 = 224;

/// Horizontal position assigned after wrapping off the right edge.
pub const WRAP_RIGHT_TARGET: i32 = -1;

/// Horizontal position assigned after wrapping off the left edge.
pub const WRAP_LEFT_TARGET: i32 = 221;

/// Final value of the player's death sequence; reaching it ends the session.
pub const DEATH_SEQUENCE_LENGTH: u8 = 11;

/// Tiles holding power pellets that trigger flee mode when the player enters them.
pub const POWER_PELLETS: [TileCoord; 4] = [
    TileCoord::new(3, 1),
    TileCoord::new(3, 26),
    TileCoord::new(23, 1),
    TileCoord::new(23, 26),
];

/// Cardinal movement directions available to every actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Order in which pursuit agents evaluate candidate directions.
    pub const DECISION_ORDER: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Row and column deltas of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    const fn exit_bit(self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Down => 0b0010,
            Self::Left => 0b0100,
            Self::Right => 0b1000,
        }
    }
}

/// Location of a tile expressed as row and column indices.
///
/// Coordinates are signed because goal tiles computed by pursuit agents may
/// lie outside the board. Only board lookups require in-range values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    row: i32,
    column: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index (vertical axis).
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index (horizontal axis).
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Tile reached by travelling `tiles` steps in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction, tiles: i32) -> Self {
        let (rows, columns) = direction.delta();
        Self {
            row: self.row + rows * tiles,
            column: self.column + columns * tiles,
        }
    }

    /// Adjacent tile in `direction`.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }
}

/// Position of an actor measured in pixels on the 8-pixel tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPosition {
    x: i32,
    y: i32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Tile containing the position, using truncating integer division.
    ///
    /// The result is not clamped; callers that index the board clamp it first
    /// through [`BoardView::clamp`].
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        TileCoord::new(
            (self.y - TILE_ORIGIN) / TILE_SIZE,
            (self.x - TILE_ORIGIN) / TILE_SIZE,
        )
    }

    /// Reports whether the position sits exactly on a tile centre.
    #[must_use]
    pub const fn is_tile_aligned(&self) -> bool {
        (self.x - CENTER_OFFSET_X) % TILE_SIZE == 0 && (self.y - CENTER_OFFSET_Y) % TILE_SIZE == 0
    }

    /// Position shifted by a single pixel in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dy, dx) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Position with the horizontal coordinate replaced.
    #[must_use]
    pub const fn with_x(self, x: i32) -> Self {
        Self { x, y: self.y }
    }
}

/// Four-bit set of permitted tile exits (bit order: up, down, left, right).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitMask(u8);

impl ExitMask {
    /// Mask that forbids every exit.
    pub const CLOSED: Self = Self(0);

    /// Mask that permits every exit.
    pub const OPEN: Self = Self(0b1111);

    /// Creates a mask from raw bits; bits above the low nibble are discarded.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Raw bit representation of the mask.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Reports whether leaving in `direction` is permitted.
    #[must_use]
    pub const fn allows(&self, direction: Direction) -> bool {
        self.0 & direction.exit_bit() != 0
    }

    /// Returns a copy of the mask that also permits `direction`.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.exit_bit())
    }

    /// Number of permitted exits.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

/// Single maze cell: directional exit permissions and a coverage marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    exits: ExitMask,
    visited: bool,
}

impl Tile {
    /// Creates an unvisited tile with the provided exits.
    #[must_use]
    pub const fn new(exits: ExitMask) -> Self {
        Self {
            exits,
            visited: false,
        }
    }

    /// Exit permissions of the tile.
    #[must_use]
    pub const fn exits(&self) -> ExitMask {
        self.exits
    }

    /// Reports whether an actor may leave the tile in `direction`.
    #[must_use]
    pub const fn can_go(&self, direction: Direction) -> bool {
        self.exits.allows(direction)
    }

    /// Reports whether the upward exit is permitted.
    #[must_use]
    pub const fn can_go_up(&self) -> bool {
        self.can_go(Direction::Up)
    }

    /// Reports whether the downward exit is permitted.
    #[must_use]
    pub const fn can_go_down(&self) -> bool {
        self.can_go(Direction::Down)
    }

    /// Reports whether the leftward exit is permitted.
    #[must_use]
    pub const fn can_go_left(&self) -> bool {
        self.can_go(Direction::Left)
    }

    /// Reports whether the rightward exit is permitted.
    #[must_use]
    pub const fn can_go_right(&self) -> bool {
        self.can_go(Direction::Right)
    }

    /// Reports whether the tile has any exit at all.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exits.count() > 0
    }

    /// Reports whether the player has crossed the tile.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Marks the tile as crossed, returning `true` if it was not already.
    pub fn mark_visited(&mut self) -> bool {
        let newly = !self.visited;
        self.visited = true;
        newly
    }
}

/// Read-only view into the row-major tile grid.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    tiles: &'a [Tile],
    rows: u32,
    columns: u32,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided tile slice.
    #[must_use]
    pub fn new(tiles: &'a [Tile], rows: u32, columns: u32) -> Self {
        Self {
            tiles,
            rows,
            columns,
        }
    }

    /// Returns the tile at `cell`, or `None` when it lies outside the board.
    #[must_use]
    pub fn tile(&self, cell: TileCoord) -> Option<&'a Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    /// Clamps `cell` into the board bounds.
    #[must_use]
    pub fn clamp(&self, cell: TileCoord) -> TileCoord {
        let max_row = i32::try_from(self.rows.saturating_sub(1)).unwrap_or(i32::MAX);
        let max_column = i32::try_from(self.columns.saturating_sub(1)).unwrap_or(i32::MAX);
        TileCoord::new(
            cell.row().clamp(0, max_row),
            cell.column().clamp(0, max_column),
        )
    }

    /// Reports whether `cell` lies within the board.
    #[must_use]
    pub fn contains(&self, cell: TileCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Iterator over all tiles paired with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &'a Tile)> + 'a {
        let columns = usize::try_from(self.columns).unwrap_or(1).max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let row = i32::try_from(index / columns).unwrap_or(i32::MAX);
            let column = i32::try_from(index % columns).unwrap_or(i32::MAX);
            (TileCoord::new(row, column), tile)
        })
    }

    /// Provides the dimensions of the board as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    fn index(&self, cell: TileCoord) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let column = u32::try_from(cell.column()).ok()?;
        if row < self.rows && column < self.columns {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Identifies a pursuit agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GhostKind {
    /// Red agent that heads straight for the player.
    Blinky,
    /// Pink agent that aims four tiles ahead of the player.
    Pinky,
    /// Cyan agent that flanks the player relative to Blinky.
    Inky,
    /// Orange agent without a pursuit heuristic of its own.
    Clyde,
}

impl GhostKind {
    /// All agents in the fixed scheduling order.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];
}

/// Identifies any actor living in the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Actor {
    /// The player-controlled actor.
    Player,
    /// A pursuit agent.
    Ghost(GhostKind),
}

/// Movement state shared by the player and every pursuit agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Motion {
    /// Current pixel position.
    pub position: PixelPosition,
    /// Direction of travel, or `None` when the actor has no heading.
    pub orientation: Option<Direction>,
    /// Direction committed at the next tile-aligned instant, if permitted.
    pub next_turn: Option<Direction>,
    /// Animation flag toggled on every movement tick.
    pub mouth_open: bool,
}

impl Motion {
    /// Creates the motion state of a freshly spawned actor.
    #[must_use]
    pub const fn spawn(position: PixelPosition, orientation: Direction) -> Self {
        Self {
            position,
            orientation: Some(orientation),
            next_turn: None,
            mouth_open: true,
        }
    }

    /// Tile currently containing the actor, unclamped.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.position.tile()
    }
}

/// Immutable representation of a pursuit agent used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostSnapshot {
    /// Agent the snapshot describes.
    pub kind: GhostKind,
    /// Movement state of the agent.
    pub motion: Motion,
    /// Whether the agent currently targets its scatter corner.
    pub scatter_mode: bool,
    /// Whether the agent is currently fleeing (harmless on contact).
    pub flee_mode: bool,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Movement state of the player.
    pub motion: Motion,
    /// Progress through the death sequence; zero while alive.
    pub death_count: u8,
}

impl PlayerSnapshot {
    /// Reports whether the death sequence has started.
    #[must_use]
    pub const fn is_dying(&self) -> bool {
        self.death_count > 0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Records the direction the player wishes to take at the next tile centre.
    SetIntent {
        /// Requested direction.
        direction: Direction,
    },
    /// Marks a tile as crossed by the player.
    MarkVisited {
        /// Tile to mark.
        cell: TileCoord,
    },
    /// Switches every pursuit agent between scatter and chase.
    SetScatterMode {
        /// `true` to target scatter corners, `false` to chase.
        active: bool,
    },
    /// Switches flee mode on or off for every pursuit agent.
    SetFleeMode {
        /// `true` while agents are harmless on contact.
        active: bool,
    },
    /// Advances the player's death sequence by one frame.
    CatchPlayer,
    /// Replaces the pending turn of an actor.
    SteerActor {
        /// Actor being steered.
        actor: Actor,
        /// Direction to commit at the next tile centre, if any.
        next_turn: Option<Direction>,
    },
    /// Replaces the movement state of an actor with the result of a movement tick.
    MoveActor {
        /// Actor that moved.
        actor: Actor,
        /// Movement state after the tick.
        motion: Motion,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player's pending turn was updated.
    IntentQueued {
        /// Direction now pending.
        direction: Direction,
    },
    /// Announces that the player crossed a tile for the first time.
    TileVisited {
        /// Newly visited tile.
        cell: TileCoord,
    },
    /// Announces a switch between scatter and chase.
    ScatterModeChanged {
        /// `true` when scatter became active.
        active: bool,
    },
    /// Announces that flee mode started or ended.
    FleeModeChanged {
        /// `true` when flee became active.
        active: bool,
    },
    /// Confirms that the player's death sequence advanced.
    PlayerCaught {
        /// Death sequence frame after the catch.
        death_count: u8,
    },
    /// Confirms that an actor committed a new orientation.
    ActorTurned {
        /// Actor that turned.
        actor: Actor,
        /// New orientation.
        orientation: Option<Direction>,
    },
    /// Confirms that an actor changed position.
    ActorMoved {
        /// Actor that moved.
        actor: Actor,
        /// Position before the tick.
        from: PixelPosition,
        /// Position after the tick.
        to: PixelPosition,
    },
}

/// Decides whether Clyde takes part in the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClydeMode {
    /// Clyde is not spawned.
    #[default]
    Absent,
    /// Clyde is spawned with a strategy that never chooses a turn.
    Idle,
}

/// Anchor Inky reflects its aim point through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReflectionAnchor {
    /// Reflect through Blinky's raw pixel coordinates, read as `(row, column) = (y, x)`.
    #[default]
    Pixel,
    /// Reflect through the tile Blinky occupies.
    Tile,
}

/// Tick intervals and durations driving the orchestrator schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ScheduleTiming {
    /// The player moves on ticks divisible by this interval.
    pub player_interval: u64,
    /// Pursuit agents decide and move on ticks divisible by this interval.
    pub ghost_interval: u64,
    /// Length of one scatter/chase cycle; scatter starts when the tick is divisible by it.
    pub scatter_period: u64,
    /// Chase resumes when `tick + chase_offset` is divisible by the period.
    pub chase_offset: u64,
    /// Number of ticks a power pellet keeps agents fleeing.
    pub flee_duration: u64,
    /// Ticks after the flee start at which agents begin flashing.
    pub flee_warning: u64,
}

impl Default for ScheduleTiming {
    fn default() -> Self {
        Self {
            player_interval: 3,
            ghost_interval: 4,
            scatter_period: 1620,
            chase_offset: 1200,
            flee_duration: 600,
            flee_warning: 420,
        }
    }
}

/// Session-wide configuration resolved before the world is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SessionConfig {
    /// Whether Clyde is spawned.
    pub clyde: ClydeMode,
    /// Anchor used by Inky's reflection.
    pub inky_anchor: ReflectionAnchor,
    /// Schedule intervals and durations.
    pub timing: ScheduleTiming,
}
