#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances actors through the maze.
//!
//! Every movement tick is two one-pixel sub-steps. An actor keeps moving while
//! it is between tile centres or while its current tile permits the exit in its
//! direction of travel. Horizontal wraparound is applied after both sub-steps,
//! and pending turns are only committed at tile centres.

use maze_chase_core::{
    Actor, BoardView, Command, Direction, Motion, PixelPosition, Tile, TileCoord,
    WRAP_LEFT_TARGET, WRAP_RIGHT_EDGE, WRAP_RIGHT_TARGET,
};

/// Number of one-pixel sub-steps performed by a single movement tick.
pub const SUB_STEPS: usize = 2;

/// Pure system that turns an actor's motion into a `MoveActor` command.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Computes one movement tick for `actor` and emits the resulting command.
    pub fn handle(
        &self,
        actor: Actor,
        motion: Motion,
        board: BoardView<'_>,
        out: &mut Vec<Command>,
    ) {
        out.push(Command::MoveActor {
            actor,
            motion: advance(motion, board),
        });
    }
}

/// Advances `motion` by exactly one movement tick.
#[must_use]
pub fn advance(motion: Motion, board: BoardView<'_>) -> Motion {
    let mut next = motion;

    if let Some(orientation) = motion.orientation {
        for _ in 0..SUB_STEPS {
            next.position = sub_step(next.position, orientation, board);
        }
    }

    next.position = wrap(next.position);

    if next.position.is_tile_aligned() {
        if let Some(turn) = next.next_turn {
            if tile_at(board, next.position.tile()).can_go(turn) {
                next.orientation = Some(turn);
            }
        }
    }

    next.mouth_open = !next.mouth_open;
    next
}

fn sub_step(position: PixelPosition, orientation: Direction, board: BoardView<'_>) -> PixelPosition {
    let mid_tile = !position.is_tile_aligned();
    if mid_tile || tile_at(board, position.tile()).can_go(orientation) {
        position.step(orientation)
    } else {
        position
    }
}

fn wrap(position: PixelPosition) -> PixelPosition {
    if position.x() > WRAP_RIGHT_EDGE {
        position.with_x(WRAP_RIGHT_TARGET)
    } else if position.x() < 0 {
        position.with_x(WRAP_LEFT_TARGET)
    } else {
        position
    }
}

fn tile_at(board: BoardView<'_>, cell: TileCoord) -> Tile {
    board.tile(board.clamp(cell)).copied().unwrap_or_default()
}
