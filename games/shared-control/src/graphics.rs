//! All relevant drawing functions for the arena are accumulated here.

use crate::arena_logic::level::{
    GOAL, OBSTACLES, ObstacleKind, PLAYER_SIZE, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::arena_logic::role::ArenaRole;
use macroquad::prelude::{
    Color, Vec2, draw_circle, draw_line, draw_rectangle, draw_rectangle_lines, draw_text,
    measure_text,
};

/// Where the world starts, leaving room for the header lines.
pub const WORLD_ORIGIN: Vec2 = Vec2 { x: 20.0, y: 100.0 };

pub const BACKGROUND: Color = Color::new(0.067, 0.094, 0.153, 1.0);
const GRID: Color = Color::new(0.122, 0.161, 0.216, 1.0);
const WALL: Color = Color::new(0.420, 0.447, 0.502, 1.0);
const HURDLE: Color = Color::new(0.976, 0.451, 0.086, 1.0);
const LOW_BEAM: Color = Color::new(0.231, 0.510, 0.965, 1.0);
const GOAL_PAINT: Color = Color::new(0.984, 0.749, 0.141, 1.0);
const PLAYER: Color = Color::new(0.984, 0.749, 0.141, 1.0);
const PLAYER_AIRBORNE: Color = Color::new(0.992, 0.878, 0.278, 1.0);
const SHADOW: Color = Color::new(0.0, 0.0, 0.0, 0.5);
const TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const URGENT: Color = Color::new(0.937, 0.267, 0.267, 1.0);

/// The header lines: mission clock, the controlled axis and the key legend.
pub fn draw_header(seconds_left: u32, role: ArenaRole) {
    let clock_color = if seconds_left < 10 { URGENT } else { TEXT };
    draw_text(&format!("{}s", seconds_left), 24.0, 40.0, 32.0, clock_color);
    draw_text(
        &format!("You control: {}", role.title()),
        120.0,
        40.0,
        26.0,
        TEXT,
    );
    draw_text(
        &format!(
            "Jump: {}  Crouch: {}  (or Space / Shift)",
            role.jump_hint(),
            role.crouch_hint()
        ),
        24.0,
        75.0,
        22.0,
        TEXT,
    );
}

/// A centered status line, used for the connecting and waiting screens.
pub fn print_centered(text: &str, y: f32, font_size: f32) {
    let width = measure_text(text, None, font_size as u16, 1.0).width;
    draw_text(
        text,
        (WORLD_WIDTH + 2.0 * WORLD_ORIGIN.x - width) / 2.0,
        y,
        font_size,
        TEXT,
    );
}

/// Draws the whole scene. The avatar scales up while jumping and down while
/// crouching, the continuously evaluated part of the render loop.
pub fn draw_arena(position: (f32, f32), jumping: bool, crouching: bool, won: bool) {
    let origin = WORLD_ORIGIN;

    draw_rectangle(origin.x, origin.y, WORLD_WIDTH, WORLD_HEIGHT, BACKGROUND);
    let mut line = 50.0;
    while line < WORLD_WIDTH {
        draw_line(origin.x + line, origin.y, origin.x + line, origin.y + WORLD_HEIGHT, 1.0, GRID);
        line += 50.0;
    }
    line = 50.0;
    while line < WORLD_HEIGHT {
        draw_line(origin.x, origin.y + line, origin.x + WORLD_WIDTH, origin.y + line, 1.0, GRID);
        line += 50.0;
    }

    for obstacle in OBSTACLES.iter() {
        let rect = &obstacle.rect;
        let (paint, label) = match obstacle.kind {
            ObstacleKind::Wall => (WALL, None),
            ObstacleKind::Hurdle => (HURDLE, Some("JUMP")),
            ObstacleKind::LowBeam => (LOW_BEAM, Some("CROUCH")),
        };
        draw_rectangle(origin.x + rect.x, origin.y + rect.y, rect.w, rect.h, paint);
        if let Some(label) = label {
            draw_text(
                label,
                origin.x + rect.x + rect.w / 2.0 - 20.0,
                origin.y + rect.y + 14.0,
                16.0,
                TEXT,
            );
        }
    }

    // The goal box.
    let outline = if won { TEXT } else { GOAL_PAINT };
    draw_rectangle_lines(origin.x + GOAL.x, origin.y + GOAL.y, GOAL.w, GOAL.h, 3.0, outline);
    draw_circle(
        origin.x + GOAL.x + GOAL.w / 2.0,
        origin.y + GOAL.y + GOAL.h / 2.0,
        10.0,
        GOAL_PAINT,
    );

    // The shared avatar with its action scale.
    let scale = if jumping {
        1.2
    } else if crouching {
        0.8
    } else {
        1.0
    };
    let size = PLAYER_SIZE * scale;
    let offset = (PLAYER_SIZE - size) / 2.0;
    let (x, y) = position;

    draw_circle(
        origin.x + x + PLAYER_SIZE / 2.0,
        origin.y + y + PLAYER_SIZE + 5.0,
        PLAYER_SIZE / 2.0 * scale,
        SHADOW,
    );
    let paint = if jumping { PLAYER_AIRBORNE } else { PLAYER };
    draw_rectangle(origin.x + x + offset, origin.y + y + offset, size, size, paint);
}
