//! The static arena: world dimensions, the obstacle course and the goal.
//! Obstacles never move or change during a session.

/// An axis-aligned box in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Strict AABB overlap, touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x + self.w > other.x
            && self.x < other.x + other.w
            && self.y + self.h > other.y
            && self.y < other.y + other.h
    }
}

/// How an obstacle reacts to the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Always blocks movement.
    Wall,
    /// Blocks unless the shared jumping flag is up.
    Hurdle,
    /// Blocks unless the shared crouching flag is up.
    LowBeam,
}

/// One static obstacle.
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

const fn obstacle(x: f32, y: f32, w: f32, h: f32, kind: ObstacleKind) -> Obstacle {
    Obstacle {
        rect: Rect::new(x, y, w, h),
        kind,
    }
}

pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 500.0;
pub const PLAYER_SIZE: f32 = 30.0;

/// One key press moves the avatar by this many pixels along the owned axis.
pub const STEP_SIZE: f32 = 20.0;

/// The obstacle course.
pub const OBSTACLES: [Obstacle; 12] = [
    // Outer walls
    obstacle(0.0, 0.0, 800.0, 20.0, ObstacleKind::Wall),
    obstacle(0.0, 480.0, 800.0, 20.0, ObstacleKind::Wall),
    obstacle(0.0, 0.0, 20.0, 500.0, ObstacleKind::Wall),
    obstacle(780.0, 0.0, 20.0, 500.0, ObstacleKind::Wall),
    // Maze walls
    obstacle(150.0, 20.0, 20.0, 300.0, ObstacleKind::Wall),
    obstacle(300.0, 180.0, 20.0, 320.0, ObstacleKind::Wall),
    obstacle(450.0, 20.0, 20.0, 300.0, ObstacleKind::Wall),
    obstacle(600.0, 180.0, 20.0, 320.0, ObstacleKind::Wall),
    // Hurdles (require jump)
    obstacle(170.0, 200.0, 130.0, 20.0, ObstacleKind::Hurdle),
    obstacle(470.0, 100.0, 130.0, 20.0, ObstacleKind::Hurdle),
    // Low beams (require crouch)
    obstacle(20.0, 350.0, 130.0, 20.0, ObstacleKind::LowBeam),
    obstacle(620.0, 300.0, 160.0, 20.0, ObstacleKind::LowBeam),
];

pub const GOAL: Rect = Rect::new(740.0, 440.0, 40.0, 40.0);

pub const START_X: f32 = 60.0;
pub const START_Y: f32 = 60.0;
