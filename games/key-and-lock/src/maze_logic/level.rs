//! The static level authoring data: the wall layout and the entities placed
//! on top of it. Entities never move; during a session they only flip their
//! collected/opened/triggered flag.

use serde::{Deserialize, Serialize};

/// A grid cell index pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

/// The edge length of one rendered cell in pixels.
pub const CELL_SIZE: f32 = 30.0;

/// The wall layout. `#` is a wall, anything else is floor.
pub const MAZE_LAYOUT: [&str; 15] = [
    "####################",
    "#                  #",
    "#  #######  #####  #",
    "#  #     #  #   #  #",
    "#  #  ####  # # #  #",
    "#  #  #     # # #  #",
    "#  #  ####  ### #  #",
    "#  #            #  #",
    "#  #######  #####  #",
    "#        #  #      #",
    "#######  #  #  #####",
    "#     #  #  #      #",
    "#  ####  #  #####  #",
    "#                  #",
    "####################",
];

pub const ROWS: i32 = MAZE_LAYOUT.len() as i32;
pub const COLS: i32 = 20;

/// Where both avatars start.
pub const START_POS: GridPos = GridPos { x: 1, y: 1 };

/// True if the position is outside the grid or on a wall glyph.
pub fn blocks_movement(pos: GridPos) -> bool {
    if pos.y < 0 || pos.y >= ROWS || pos.x < 0 || pos.x >= COLS {
        return true;
    }
    MAZE_LAYOUT[pos.y as usize].as_bytes()[pos.x as usize] == b'#'
}

/// The color pairing between a key and the doors it opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyColor {
    Blue,
    Red,
}

/// The two hazard effect classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Shaves 30 seconds off the shared countdown.
    TimePenalty,
    /// Ends the session immediately as a loss.
    InstantDeath,
}

/// What an entity is; the payload ties keys to doors and hazards to their effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Key(KeyColor),
    Door(KeyColor),
    Hazard(HazardKind),
    Goal,
}

/// One placed level entity.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: &'static str,
    pub kind: EntityKind,
    pub pos: GridPos,
    pub collected: bool,
    pub opened: bool,
    pub triggered: bool,
}

impl Entity {
    fn place(id: &'static str, kind: EntityKind, x: i32, y: i32) -> Entity {
        Entity {
            id,
            kind,
            pos: GridPos { x, y },
            collected: false,
            opened: false,
            triggered: false,
        }
    }
}

/// The entity set of the one fixed level.
pub fn starting_entities() -> Vec<Entity> {
    vec![
        Entity::place("k1", EntityKind::Key(KeyColor::Blue), 18, 3),
        Entity::place("d1", EntityKind::Door(KeyColor::Blue), 10, 7),
        Entity::place("h1", EntityKind::Hazard(HazardKind::TimePenalty), 5, 5),
        Entity::place("h2", EntityKind::Hazard(HazardKind::InstantDeath), 15, 4),
        Entity::place("h3", EntityKind::Hazard(HazardKind::TimePenalty), 8, 12),
        Entity::place("k2", EntityKind::Key(KeyColor::Red), 2, 12),
        Entity::place("d2", EntityKind::Door(KeyColor::Red), 15, 10),
        Entity::place("g1", EntityKind::Goal, 18, 13),
    ]
}
