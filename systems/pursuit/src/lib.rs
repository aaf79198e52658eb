#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit strategies that steer agents toward goal tiles one step at a time.
//!
//! Each agent computes a goal tile from the global mode and the player's
//! state, then picks the exit of its current tile that brings it strictly
//! closer to that goal. Agents never reverse direction on their own.

use maze_chase_core::{
    Actor, BoardView, Command, Direction, GhostKind, GhostSnapshot, Motion, PixelPosition,
    ReflectionAnchor, TileCoord,
};

/// Distance an exit must beat before an agent commits to it.
pub const DECISION_BIAS: u32 = 20;

const PINKY_LOOKAHEAD: i32 = 4;
const INKY_LOOKAHEAD: i32 = 2;

/// Goal-selection heuristic attached to a pursuit agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Heads for the player's tile.
    Blinky,
    /// Heads for the tile four steps ahead of the player.
    Pinky,
    /// Flanks the player by reflecting a look-ahead point through Blinky.
    Inky,
    /// Never chooses a turn.
    Idle,
}

impl Strategy {
    /// Strategy used by the provided agent.
    #[must_use]
    pub const fn for_ghost(kind: GhostKind) -> Self {
        match kind {
            GhostKind::Blinky => Self::Blinky,
            GhostKind::Pinky => Self::Pinky,
            GhostKind::Inky => Self::Inky,
            GhostKind::Clyde => Self::Idle,
        }
    }

    /// Corner targeted while scatter mode is active.
    #[must_use]
    pub const fn scatter_corner(self) -> Option<TileCoord> {
        match self {
            Self::Blinky => Some(TileCoord::new(0, 27)),
            Self::Pinky => Some(TileCoord::new(0, 0)),
            Self::Inky => Some(TileCoord::new(30, 0)),
            Self::Idle => None,
        }
    }

    /// Goal tile for an agent in the given scatter state.
    ///
    /// Returns `None` for strategies that never steer.
    #[must_use]
    pub fn goal(self, scatter_mode: bool, context: &PursuitContext<'_>) -> Option<TileCoord> {
        if scatter_mode {
            return self.scatter_corner();
        }

        let player = context.player.tile();
        match self {
            Self::Blinky => Some(player),
            Self::Pinky => Some(ahead_of(&context.player, PINKY_LOOKAHEAD)),
            Self::Inky => {
                let ahead = ahead_of(&context.player, INKY_LOOKAHEAD);
                let Some(blinky) = context.blinky else {
                    return Some(ahead);
                };
                let anchor = match context.anchor {
                    ReflectionAnchor::Tile => blinky.tile(),
                    ReflectionAnchor::Pixel => TileCoord::new(blinky.y(), blinky.x()),
                };
                Some(TileCoord::new(
                    2 * ahead.row() - anchor.row(),
                    2 * ahead.column() - anchor.column(),
                ))
            }
            Self::Idle => None,
        }
    }
}

/// Read-only inputs shared by every strategy during a decision tick.
#[derive(Clone, Copy, Debug)]
pub struct PursuitContext<'a> {
    /// Maze connectivity.
    pub board: BoardView<'a>,
    /// Player movement state.
    pub player: Motion,
    /// Blinky's current position, when Blinky takes part in the session.
    pub blinky: Option<PixelPosition>,
    /// Point Inky reflects its aim through.
    pub anchor: ReflectionAnchor,
}

/// Picks the next turn for an agent at `motion` heading for `goal`.
///
/// Candidates are evaluated in [`Direction::DECISION_ORDER`]. A candidate is
/// taken only if its neighbour tile is strictly closer to the goal than the
/// best seen so far, starting from the current distance plus
/// [`DECISION_BIAS`].
#[must_use]
pub fn decide(motion: &Motion, goal: TileCoord, board: BoardView<'_>) -> Option<Direction> {
    let current = board.clamp(motion.tile());
    let tile = board.tile(current).copied().unwrap_or_default();
    let reverse = motion.orientation.map(Direction::reverse);

    let mut best = None;
    let mut best_distance = current.manhattan_distance(goal) + DECISION_BIAS;

    for candidate in Direction::DECISION_ORDER {
        if !tile.can_go(candidate) || Some(candidate) == reverse {
            continue;
        }
        let distance = current.neighbor(candidate).manhattan_distance(goal);
        if distance < best_distance {
            best = Some(candidate);
            best_distance = distance;
        }
    }

    best
}

/// Pure system that emits steering commands for pursuit agents.
#[derive(Debug, Default)]
pub struct Pursuit;

impl Pursuit {
    /// Decides the next turn of `ghost` and emits a `SteerActor` command.
    ///
    /// Agents without a goal emit nothing, leaving their pending turn untouched.
    pub fn handle(
        &self,
        ghost: &GhostSnapshot,
        context: &PursuitContext<'_>,
        out: &mut Vec<Command>,
    ) {
        let strategy = Strategy::for_ghost(ghost.kind);
        let Some(goal) = strategy.goal(ghost.scatter_mode, context) else {
            return;
        };

        out.push(Command::SteerActor {
            actor: Actor::Ghost(ghost.kind),
            next_turn: decide(&ghost.motion, goal, context.board),
        });
    }
}

fn ahead_of(player: &Motion, tiles: i32) -> TileCoord {
    let tile = player.tile();
    match player.orientation {
        Some(direction) => tile.offset(direction, tiles),
        None => tile,
    }
}
