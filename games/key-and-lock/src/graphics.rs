//! All relevant drawing functions for the maze are accumulated here.

use crate::maze_logic::level::{
    CELL_SIZE, COLS, Entity, EntityKind, GridPos, HazardKind, KeyColor, ROWS, blocks_movement,
};
use crate::maze_logic::role::MazeRole;
use crate::maze_logic::simulation::MazeSimulation;
use macroquad::prelude::{
    Color, Vec2, draw_circle, draw_line, draw_rectangle, draw_text, measure_text,
};

/// Where the grid starts, leaving room for the header line.
pub const MAZE_ORIGIN: Vec2 = Vec2 { x: 20.0, y: 90.0 };

pub const BACKGROUND: Color = Color::new(0.067, 0.094, 0.153, 1.0);
const WALL: Color = Color::new(0.216, 0.255, 0.318, 1.0);
const FLOOR: Color = Color::new(0.122, 0.161, 0.216, 1.0);
const ME: Color = Color::new(0.984, 0.749, 0.141, 1.0);
const PARTNER: Color = Color::new(0.376, 0.647, 0.980, 1.0);
const KEY_BLUE: Color = Color::new(0.231, 0.510, 0.965, 1.0);
const KEY_RED: Color = Color::new(0.937, 0.267, 0.267, 1.0);
const HAZARD_PENALTY: Color = Color::new(0.925, 0.282, 0.600, 1.0);
const HAZARD_DEATH: Color = Color::new(0.937, 0.267, 0.267, 1.0);
const GOAL: Color = Color::new(0.984, 0.749, 0.141, 1.0);
const TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const URGENT: Color = Color::new(0.937, 0.267, 0.267, 1.0);

fn cell_origin(pos: GridPos) -> Vec2 {
    Vec2 {
        x: MAZE_ORIGIN.x + pos.x as f32 * CELL_SIZE,
        y: MAZE_ORIGIN.y + pos.y as f32 * CELL_SIZE,
    }
}

fn key_color(color: KeyColor) -> Color {
    match color {
        KeyColor::Blue => KEY_BLUE,
        KeyColor::Red => KEY_RED,
    }
}

/// The header line with the mission clock and the role badge.
pub fn draw_header(countdown_label: &str, urgent: bool, role: MazeRole) {
    let clock_color = if urgent { URGENT } else { TEXT };
    draw_text(countdown_label, 24.0, 40.0, 32.0, clock_color);
    draw_text(role.title(), 160.0, 40.0, 28.0, TEXT);
}

/// A centered status line, used for the connecting and waiting screens.
pub fn print_centered(text: &str, y: f32, font_size: f32) {
    let width = measure_text(text, None, font_size as u16, 1.0).width;
    draw_text(
        text,
        (COLS as f32 * CELL_SIZE + 2.0 * MAZE_ORIGIN.x - width) / 2.0,
        y,
        font_size,
        TEXT,
    );
}

/// Draws the whole scene: grid, the entities this role may see, both avatars.
pub fn draw_maze(simulation: &MazeSimulation, role: MazeRole, partner_pos: Option<GridPos>) {
    for y in 0..ROWS {
        for x in 0..COLS {
            let pos = GridPos { x, y };
            let origin = cell_origin(pos);
            let color = if blocks_movement(pos) { WALL } else { FLOOR };
            draw_rectangle(origin.x, origin.y, CELL_SIZE - 1.0, CELL_SIZE - 1.0, color);
        }
    }

    for entity in simulation.entities() {
        if role.sees(entity) {
            draw_entity(entity);
        }
    }

    if let Some(partner) = partner_pos {
        draw_avatar(partner, PARTNER);
    }
    draw_avatar(simulation.avatar(), ME);
}

fn draw_avatar(pos: GridPos, color: Color) {
    let origin = cell_origin(pos);
    draw_circle(
        origin.x + CELL_SIZE / 2.0,
        origin.y + CELL_SIZE / 2.0,
        CELL_SIZE / 2.0 - 5.0,
        color,
    );
}

fn draw_entity(entity: &Entity) {
    let origin = cell_origin(entity.pos);
    let center = Vec2 {
        x: origin.x + CELL_SIZE / 2.0,
        y: origin.y + CELL_SIZE / 2.0,
    };
    match entity.kind {
        EntityKind::Key(color) => {
            // A round bow with a short blade.
            draw_circle(center.x - 4.0, center.y, 5.0, key_color(color));
            draw_line(
                center.x,
                center.y,
                center.x + 9.0,
                center.y,
                3.0,
                key_color(color),
            );
        }
        EntityKind::Door(color) => {
            let paint = key_color(color);
            if entity.opened {
                // Just the frame once unlocked.
                draw_rectangle(origin.x + 4.0, origin.y + 4.0, CELL_SIZE - 8.0, 3.0, paint);
                draw_rectangle(origin.x + 4.0, origin.y + 4.0, 3.0, CELL_SIZE - 8.0, paint);
                draw_rectangle(
                    origin.x + CELL_SIZE - 7.0,
                    origin.y + 4.0,
                    3.0,
                    CELL_SIZE - 8.0,
                    paint,
                );
            } else {
                draw_rectangle(
                    origin.x + 4.0,
                    origin.y + 4.0,
                    CELL_SIZE - 8.0,
                    CELL_SIZE - 8.0,
                    paint,
                );
            }
        }
        EntityKind::Hazard(HazardKind::TimePenalty) => {
            // Hourglass shape as two triangles drawn with lines.
            draw_line(center.x - 6.0, center.y - 8.0, center.x + 6.0, center.y - 8.0, 2.0, HAZARD_PENALTY);
            draw_line(center.x - 6.0, center.y - 8.0, center.x + 6.0, center.y + 8.0, 2.0, HAZARD_PENALTY);
            draw_line(center.x + 6.0, center.y - 8.0, center.x - 6.0, center.y + 8.0, 2.0, HAZARD_PENALTY);
            draw_line(center.x - 6.0, center.y + 8.0, center.x + 6.0, center.y + 8.0, 2.0, HAZARD_PENALTY);
        }
        EntityKind::Hazard(HazardKind::InstantDeath) => {
            draw_line(center.x - 7.0, center.y - 7.0, center.x + 7.0, center.y + 7.0, 3.0, HAZARD_DEATH);
            draw_line(center.x - 7.0, center.y + 7.0, center.x + 7.0, center.y - 7.0, 3.0, HAZARD_DEATH);
        }
        EntityKind::Goal => {
            draw_circle(center.x, center.y, 9.0, GOAL);
            draw_circle(center.x, center.y, 4.0, BACKGROUND);
        }
    }
}
