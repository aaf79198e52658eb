//! Primitive-shape drawing for the maze, the player and the pursuit agents.

use glam::Vec2;
use macroquad::color::WHITE;
use macroquad::shapes::{draw_circle, draw_rectangle, draw_triangle};
use macroquad::text::draw_text;
use maze_chase_core::{Direction, DEATH_SEQUENCE_LENGTH};
use maze_chase_rendering::{
    ghost_color, Color, GhostAppearance, GhostPresentation, MazePresentation, Palette,
    PlayerPresentation, Scene,
};
use maze_chase_system_orchestrator::SessionStatus;

use crate::SceneMetrics;

const ACTOR_RADIUS: f32 = 6.5;
const DOT_RADIUS: f32 = 1.0;
const PELLET_RADIUS: f32 = 3.0;
const MOUTH_SPREAD: f32 = 0.6;
const HUD_FONT_SIZE: f32 = 20.0;

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

pub(crate) fn draw_maze(maze: &MazePresentation, palette: &Palette, metrics: &SceneMetrics) {
    let tile_step = maze.tile_size * metrics.scale;
    let half_tile = Vec2::splat(maze.tile_size * 0.5);
    let wall = to_macroquad_color(palette.wall);
    let dot = to_macroquad_color(palette.dot);

    for tile in &maze.tiles {
        let origin = maze.tile_origin(tile.cell);
        if tile.exits.count() == 0 {
            let corner = metrics.to_screen(origin);
            draw_rectangle(corner.x, corner.y, tile_step, tile_step, wall);
        } else if !tile.visited && !maze.pellets.contains(&tile.cell) {
            let centre = metrics.to_screen(origin + half_tile);
            draw_circle(centre.x, centre.y, DOT_RADIUS * metrics.scale, dot);
        }
    }

    let pellet = to_macroquad_color(palette.pellet);
    for cell in &maze.pellets {
        let centre = metrics.to_screen(maze.tile_origin(*cell) + half_tile);
        draw_circle(centre.x, centre.y, PELLET_RADIUS * metrics.scale, pellet);
    }
}

pub(crate) fn draw_player(player: &PlayerPresentation, palette: &Palette, metrics: &SceneMetrics) {
    let centre = metrics.to_screen(player.center);
    let remaining = 1.0 - f32::from(player.death_frame) / f32::from(DEATH_SEQUENCE_LENGTH);
    let radius = ACTOR_RADIUS * metrics.scale * remaining;
    if radius <= f32::EPSILON {
        return;
    }
    draw_circle(centre.x, centre.y, radius, to_macroquad_color(palette.player));

    if player.mouth_open && player.death_frame == 0 {
        let facing = heading(player.orientation);
        let side = Vec2::new(-facing.y, facing.x) * MOUTH_SPREAD;
        let tip = centre + (facing + side) * radius;
        let other = centre + (facing - side) * radius;
        draw_triangle(
            to_macroquad_vec(centre),
            to_macroquad_vec(tip),
            to_macroquad_vec(other),
            to_macroquad_color(palette.background),
        );
    }
}

pub(crate) fn draw_ghosts(ghosts: &[GhostPresentation], palette: &Palette, metrics: &SceneMetrics) {
    for ghost in ghosts {
        let body = match ghost.appearance {
            GhostAppearance::Normal => ghost_color(ghost.kind),
            GhostAppearance::Frightened => palette.frightened,
            GhostAppearance::Flashing => palette.flashing,
        };
        let body = to_macroquad_color(body);
        let centre = metrics.to_screen(ghost.center);
        let radius = ACTOR_RADIUS * metrics.scale;

        draw_circle(centre.x, centre.y, radius, body);
        draw_rectangle(centre.x - radius, centre.y, radius * 2.0, radius, body);

        let skirt = if ghost.mouth_open { 0.35 } else { 0.2 };
        draw_rectangle(
            centre.x - radius * 0.15,
            centre.y + radius * (1.0 - skirt),
            radius * 0.3,
            radius * skirt,
            to_macroquad_color(palette.background),
        );

        let look = heading(ghost.orientation) * radius * 0.15;
        for side in [-0.4, 0.4] {
            let eye = centre + Vec2::new(side * radius, -radius * 0.2);
            draw_circle(eye.x, eye.y, radius * 0.25, WHITE);
            let pupil = eye + look;
            draw_circle(
                pupil.x,
                pupil.y,
                radius * 0.12,
                to_macroquad_color(palette.background),
            );
        }
    }
}

pub(crate) fn draw_hud(scene: &Scene, metrics: &SceneMetrics) {
    let label = match scene.status {
        SessionStatus::Running => format!("tick {}", scene.tick),
        SessionStatus::Caught => format!("caught at tick {}", scene.tick),
        SessionStatus::Quit => format!("quit at tick {}", scene.tick),
    };
    let anchor = metrics.to_screen(Vec2::ZERO);
    draw_text(&label, anchor.x + 4.0, anchor.y + HUD_FONT_SIZE, HUD_FONT_SIZE, WHITE);
}

fn heading(orientation: Option<Direction>) -> Vec2 {
    match orientation {
        Some(Direction::Up) => Vec2::new(0.0, -1.0),
        Some(Direction::Down) => Vec2::new(0.0, 1.0),
        Some(Direction::Left) => Vec2::new(-1.0, 0.0),
        Some(Direction::Right) | None => Vec2::new(1.0, 0.0),
    }
}

fn to_macroquad_vec(vector: Vec2) -> macroquad::math::Vec2 {
    macroquad::math::Vec2::new(vector.x, vector.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_defaults_to_facing_right() {
        assert_eq!(heading(None), Vec2::X);
        assert_eq!(heading(Some(Direction::Up)), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let color = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 0.4));
    }
}
