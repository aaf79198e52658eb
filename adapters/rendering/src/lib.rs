#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.
//!
//! Backends never touch the world directly. The driver pulls read-only
//! snapshots from the world and the orchestrator into a [`Scene`], and the
//! backend draws whatever the scene describes.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{
    Direction, ExitMask, GhostKind, PixelPosition, TileCoord, BOARD_COLUMNS, BOARD_ROWS,
    POWER_PELLETS, TILE_SIZE,
};
use maze_chase_system_orchestrator::{FleePhase, Orchestrator, SessionStatus};
use maze_chase_world::{query, World};
use std::time::Duration;

/// Horizontal distance between an actor's logical position and its sprite centre.
const SPRITE_SHIFT_X: f32 = -2.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }
}

/// Colors used to draw the maze and its inhabitants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Background behind the maze.
    pub background: Color,
    /// Corridor walls.
    pub wall: Color,
    /// Small dots on tiles the player has not crossed yet.
    pub dot: Color,
    /// Power pellets.
    pub pellet: Color,
    /// The player.
    pub player: Color,
    /// Agents while flee mode is active.
    pub frightened: Color,
    /// Agents while flee mode is about to end.
    pub flashing: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0, 0, 0),
            wall: Color::from_rgb_u8(33, 33, 222),
            dot: Color::from_rgb_u8(255, 184, 151),
            pellet: Color::from_rgb_u8(255, 184, 151),
            player: Color::from_rgb_u8(255, 255, 0),
            frightened: Color::from_rgb_u8(33, 33, 255),
            flashing: Color::from_rgb_u8(222, 222, 255),
        }
    }
}

/// Body color of a pursuit agent in its normal state.
#[must_use]
pub const fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::from_rgb_u8(255, 0, 0),
        GhostKind::Pinky => Color::from_rgb_u8(255, 184, 255),
        GhostKind::Inky => Color::from_rgb_u8(0, 255, 255),
        GhostKind::Clyde => Color::from_rgb_u8(255, 184, 82),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction requested by the player on this frame, if any.
    pub intent: Option<Direction>,
    /// Whether the adapter detected a quit request on this frame.
    pub quit_requested: bool,
}

/// Single maze tile as presented to backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePresentation {
    /// Tile coordinate.
    pub cell: TileCoord,
    /// Permitted exits; closed tiles are drawn as walls.
    pub exits: ExitMask,
    /// Whether the player has crossed the tile.
    pub visited: bool,
}

/// Static description of the maze plus per-tile coverage.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub columns: u32,
    /// Edge length of a tile in maze pixels.
    pub tile_size: f32,
    /// Tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Tiles holding power pellets.
    pub pellets: Vec<TileCoord>,
}

impl MazePresentation {
    /// Width of the maze in maze pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Height of the maze in maze pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Top-left corner of `cell` in maze pixels.
    #[must_use]
    pub fn tile_origin(&self, cell: TileCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_size,
            cell.row() as f32 * self.tile_size,
        )
    }
}

/// Player state as presented to backends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Sprite centre in maze pixels.
    pub center: Vec2,
    /// Direction the player faces.
    pub orientation: Option<Direction>,
    /// Animation flag.
    pub mouth_open: bool,
    /// Death sequence frame; zero while alive.
    pub death_frame: u8,
}

/// Appearance of a pursuit agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostAppearance {
    /// Drawn in the agent's own color.
    Normal,
    /// Drawn in the frightened color.
    Frightened,
    /// Drawn in the flashing color.
    Flashing,
}

/// Pursuit agent state as presented to backends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostPresentation {
    /// Agent identity.
    pub kind: GhostKind,
    /// Sprite centre in maze pixels.
    pub center: Vec2,
    /// Direction the agent faces.
    pub orientation: Option<Direction>,
    /// Animation flag.
    pub mouth_open: bool,
    /// How the agent should be colored.
    pub appearance: GhostAppearance,
}

/// Scene description combining the maze and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Maze tiles and pellets.
    pub maze: MazePresentation,
    /// The player.
    pub player: PlayerPresentation,
    /// Pursuit agents in scheduling order.
    pub ghosts: Vec<GhostPresentation>,
    /// Tick the scene was captured at.
    pub tick: u64,
    /// Session lifecycle state.
    pub status: SessionStatus,
}

impl Scene {
    /// Captures a scene from the current world and orchestrator state.
    #[must_use]
    pub fn capture(world: &World, orchestrator: &Orchestrator) -> Self {
        let board = query::board(world);
        let (rows, columns) = board.dimensions();
        let tiles = board
            .iter()
            .map(|(cell, tile)| TilePresentation {
                cell,
                exits: tile.exits(),
                visited: tile.is_visited(),
            })
            .collect();

        Self {
            maze: MazePresentation {
                rows,
                columns,
                tile_size: TILE_SIZE as f32,
                tiles,
                pellets: POWER_PELLETS.to_vec(),
            },
            player: player_presentation(world),
            ghosts: ghost_presentations(world, orchestrator),
            tick: orchestrator.tick(),
            status: orchestrator.status(),
        }
    }

    /// Updates the dynamic parts of the scene in place.
    pub fn refresh(&mut self, world: &World, orchestrator: &Orchestrator) {
        let board = query::board(world);
        for presentation in &mut self.maze.tiles {
            presentation.visited = board
                .tile(presentation.cell)
                .map_or(false, |tile| tile.is_visited());
        }
        self.player = player_presentation(world);
        self.ghosts = ghost_presentations(world, orchestrator);
        self.tick = orchestrator.tick();
        self.status = orchestrator.status();
    }
}

/// Converts an actor's logical position into its sprite centre.
#[must_use]
pub fn sprite_center(position: PixelPosition) -> Vec2 {
    Vec2::new(position.x() as f32 + SPRITE_SHIFT_X, position.y() as f32)
}

fn player_presentation(world: &World) -> PlayerPresentation {
    let player = query::player(world);
    PlayerPresentation {
        center: sprite_center(player.motion.position),
        orientation: player.motion.orientation,
        mouth_open: player.motion.mouth_open,
        death_frame: player.death_count,
    }
}

fn ghost_presentations(world: &World, orchestrator: &Orchestrator) -> Vec<GhostPresentation> {
    let phase = orchestrator.flee_phase();
    query::ghosts(world)
        .iter()
        .map(|ghost| {
            let appearance = if !ghost.flee_mode {
                GhostAppearance::Normal
            } else if phase == FleePhase::Ending {
                GhostAppearance::Flashing
            } else {
                GhostAppearance::Frightened
            };
            GhostPresentation {
                kind: ghost.kind,
                center: sprite_center(ghost.motion.position),
                orientation: ghost.motion.orientation,
                mouth_open: ghost.motion.mouth_open,
                appearance,
            }
        })
        .collect()
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Colors used for drawing.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and advances the scene by one
    /// tick. The backend stops once the scene reports a finished session or
    /// the input requests a quit.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Maze size in maze pixels as `(width, height)`.
#[must_use]
pub const fn maze_pixel_size() -> (i32, i32) {
    (
        BOARD_COLUMNS as i32 * TILE_SIZE,
        BOARD_ROWS as i32 * TILE_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Command, SessionConfig};

    #[test]
    fn capture_reflects_spawn_state() {
        let world = World::new(SessionConfig::default());
        let orchestrator = Orchestrator::default();
        let scene = Scene::capture(&world, &orchestrator);

        assert_eq!(scene.maze.tiles.len(), 868);
        assert_eq!(scene.maze.width(), 224.0);
        assert_eq!(scene.maze.height(), 248.0);
        assert_eq!(scene.player.center, Vec2::new(13.0, 13.0));
        assert!(scene.player.mouth_open);
        assert_eq!(scene.ghosts.len(), 3);
        assert!(scene
            .ghosts
            .iter()
            .all(|ghost| ghost.appearance == GhostAppearance::Normal));
        assert_eq!(scene.status, SessionStatus::Running);
        assert_eq!(maze_pixel_size(), (224, 248));
    }

    #[test]
    fn refresh_tracks_visited_tiles_and_flee_mode() {
        let mut world = World::new(SessionConfig::default());
        let orchestrator = Orchestrator::default();
        let mut scene = Scene::capture(&world, &orchestrator);

        let mut events = Vec::new();
        maze_chase_world::apply(
            &mut world,
            Command::MarkVisited {
                cell: TileCoord::new(1, 2),
            },
            &mut events,
        );
        maze_chase_world::apply(
            &mut world,
            Command::SetFleeMode { active: true },
            &mut events,
        );
        scene.refresh(&world, &orchestrator);

        let visited: Vec<_> = scene
            .maze
            .tiles
            .iter()
            .filter(|tile| tile.visited)
            .map(|tile| tile.cell)
            .collect();
        assert_eq!(visited, vec![TileCoord::new(1, 2)]);
        assert!(scene
            .ghosts
            .iter()
            .all(|ghost| ghost.appearance == GhostAppearance::Frightened));
    }

    #[test]
    fn ghost_colors_are_distinct() {
        let colors: Vec<_> = GhostKind::ALL.iter().map(|&kind| ghost_color(kind)).collect();
        for (index, color) in colors.iter().enumerate() {
            assert!(!colors[index + 1..].contains(color));
        }
    }

    #[test]
    fn darken_scales_channels_towards_black() {
        let color = Color::new(1.0, 0.5, 0.0, 0.8).darken(0.5);
        assert_eq!(color, Color::new(0.5, 0.25, 0.0, 0.8));
        assert_eq!(Color::new(1.0, 1.0, 1.0, 1.0).darken(2.0).red, 0.0);
    }
}
