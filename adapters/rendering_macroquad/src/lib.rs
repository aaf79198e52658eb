#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Chase.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The maze and its inhabitants are drawn with primitive shapes; no sprite
//! assets are loaded.

mod draw;

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use maze_chase_core::Direction;
use maze_chase_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use maze_chase_system_orchestrator::SessionStatus;
use std::time::Duration;

use self::draw::{draw_ghosts, draw_hud, draw_maze, draw_player, to_macroquad_color};

/// Window scale applied to the 224x248 maze.
const WINDOW_SCALE: f32 = 3.0;

/// Keeps the most recent direction key until the simulation consumes it.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct IntentLatch {
    pending: Option<Direction>,
}

impl IntentLatch {
    /// Returns the latched direction and clears the latch so it is delivered once.
    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    /// Latches a direction, replacing any earlier one that was not yet consumed.
    pub fn register(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Arrow keys or `WASD`.
    direction: Option<Direction>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let direction = direction_from_keys(
            is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W),
            is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S),
            is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A),
            is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D),
        );

        Self {
            quit_requested,
            direction,
        }
    }
}

/// Maps pressed direction keys to an intent; later keys in up, down, left, right order win.
#[doc(hidden)]
#[must_use]
pub fn direction_from_keys(up: bool, down: bool, left: bool, right: bool) -> Option<Direction> {
    [
        (right, Direction::Right),
        (left, Direction::Left),
        (down, Direction::Down),
        (up, Direction::Up),
    ]
    .into_iter()
    .find_map(|(pressed, direction)| pressed.then_some(direction))
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the frame rate once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            palette,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (scene.maze.width() * WINDOW_SCALE) as i32,
            window_height: (scene.maze.height() * WINDOW_SCALE) as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        log::info!("opening {}x{} window", config.window_width, config.window_height);

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();
            let mut intent_latch = IntentLatch::default();
            let background = to_macroquad_color(palette.background);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if let Some(direction) = keyboard.direction {
                    intent_latch.register(direction);
                }

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_maze(&scene.maze, &palette, &metrics);
                draw_player(&scene.player, &palette, &metrics);
                draw_ghosts(&scene.ghosts, &palette, &metrics);
                draw_hud(&scene, &metrics);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    intent: intent_latch.take(),
                    quit_requested: keyboard.quit_requested,
                };
                update_scene(frame_dt, frame_input, &mut scene);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                if keyboard.quit_requested || scene.status != SessionStatus::Running {
                    log::info!("closing window at tick {}", scene.tick);
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping from maze pixels to screen pixels for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let width = scene.maze.width();
        let height = scene.maze.height();
        if width <= f32::EPSILON || height <= f32::EPSILON {
            return Self {
                scale: 0.0,
                offset: Vec2::ZERO,
            };
        }

        let scale = (screen_width / width).min(screen_height / height);
        let offset = Vec2::new(
            (screen_width - width * scale) * 0.5,
            (screen_height - height * scale) * 0.5,
        );
        Self { scale, offset }
    }

    fn to_screen(&self, maze_position: Vec2) -> Vec2 {
        self.offset + maze_position * self.scale
    }
}
