//! The local half of the maze: one avatar, the shared entity set, and the
//! movement resolution for discrete key presses.
//!
//! There is no frame-driven physics here; each directional key press is one
//! simulation command, validated against the static geometry before it is
//! committed. Wall bumps, hazards and the goal are normal gameplay
//! outcomes, not errors.

use crate::maze_logic::level::{
    Entity, EntityKind, GridPos, HazardKind, START_POS, blocks_movement, starting_entities,
};
#[cfg(test)]
use crate::maze_logic::level::KeyColor;
use crate::maze_logic::role::MazeRole;

/// A discrete movement command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// What a single movement command resolved to. Everything except
/// [`StepOutcome::Blocked`] also moved the avatar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Wall, boundary or a closed door. No state change.
    Blocked,
    /// A plain step onto free floor.
    Moved,
    /// The key finder picked up a key; the matching doors are open now.
    KeyCollected { entity_id: &'static str },
    /// The key finder stepped onto an unseen hazard.
    HazardTriggered { hazard: HazardKind },
    /// The avatar stands on the goal cell.
    GoalReached,
}

/// The local avatar plus the in-place mutated entity set.
pub struct MazeSimulation {
    avatar: GridPos,
    entities: Vec<Entity>,
}

impl MazeSimulation {
    pub fn new() -> MazeSimulation {
        MazeSimulation {
            avatar: START_POS,
            entities: starting_entities(),
        }
    }

    /// A simulation over custom level data, for exercising scenarios.
    #[cfg(test)]
    pub fn with_entities(avatar: GridPos, entities: Vec<Entity>) -> MazeSimulation {
        MazeSimulation { avatar, entities }
    }

    pub fn avatar(&self) -> GridPos {
        self.avatar
    }

    #[cfg(test)]
    pub fn set_avatar(&mut self, pos: GridPos) {
        self.avatar = pos;
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Resolves one directional key press.
    ///
    /// Order matters: boundary and wall first, then closed doors (they block
    /// everyone regardless of role), then whatever occupies the target cell.
    /// Only the key finder triggers hazards and collects keys; the navigator
    /// walks across both without effect.
    pub fn try_step(&mut self, direction: Direction, role: MazeRole) -> StepOutcome {
        let (dx, dy) = direction.delta();
        let candidate = GridPos {
            x: self.avatar.x + dx,
            y: self.avatar.y + dy,
        };

        if blocks_movement(candidate) {
            return StepOutcome::Blocked;
        }

        let hit = self.entities.iter().position(|e| e.pos == candidate);

        let outcome = match hit {
            Some(index) => {
                let entity = &self.entities[index];
                let (kind, opened, collected, triggered, id) =
                    (entity.kind, entity.opened, entity.collected, entity.triggered, entity.id);
                match kind {
                    // Closed doors block movement regardless of role.
                    EntityKind::Door(_) if !opened => return StepOutcome::Blocked,
                    EntityKind::Hazard(hazard) if !triggered && role == MazeRole::KeyFinder => {
                        self.entities[index].triggered = true;
                        StepOutcome::HazardTriggered { hazard }
                    }
                    EntityKind::Key(_) if !collected && role == MazeRole::KeyFinder => {
                        self.apply_key_collection(id);
                        StepOutcome::KeyCollected { entity_id: id }
                    }
                    EntityKind::Goal => StepOutcome::GoalReached,
                    _ => StepOutcome::Moved,
                }
            }
            None => StepOutcome::Moved,
        };

        self.avatar = candidate;
        outcome
    }

    /// Marks a key as collected and opens every door of the same color.
    /// Used for the local pickup and for the peer's broadcast alike, so
    /// both entity sets converge.
    pub fn apply_key_collection(&mut self, entity_id: &str) {
        let Some(color) = self.entities.iter().find_map(|e| match e.kind {
            EntityKind::Key(color) if e.id == entity_id => Some(color),
            _ => None,
        }) else {
            return;
        };
        for entity in self.entities.iter_mut() {
            match entity.kind {
                EntityKind::Key(_) if entity.id == entity_id => entity.collected = true,
                EntityKind::Door(door_color) if door_color == color => entity.opened = true,
                _ => {}
            }
        }
    }

    #[cfg(test)]
    fn door_open(&self, color: KeyColor) -> bool {
        self.entities.iter().any(|e| match e.kind {
            EntityKind::Door(door_color) => door_color == color && e.opened,
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze_logic::level::{COLS, MAZE_LAYOUT, ROWS};

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

    #[test]
    fn walls_block_in_every_direction_from_every_cell() {
        let mut simulation = MazeSimulation::new();
        for y in 0..ROWS {
            for x in 0..COLS {
                let from = GridPos { x, y };
                if blocks_movement(from) {
                    continue;
                }
                for direction in [
                    Direction::Up,
                    Direction::Down,
                    Direction::Left,
                    Direction::Right,
                ] {
                    let (dx, dy) = match direction {
                        Direction::Up => (0, -1),
                        Direction::Down => (0, 1),
                        Direction::Left => (-1, 0),
                        Direction::Right => (1, 0),
                    };
                    let target = GridPos { x: x + dx, y: y + dy };
                    if !blocks_movement(target) {
                        continue;
                    }
                    simulation.set_avatar(from);
                    assert_eq!(
                        simulation.try_step(direction, MazeRole::Navigator),
                        StepOutcome::Blocked
                    );
                    assert_eq!(simulation.avatar(), from, "wall bump moved the avatar");
                }
            }
        }
    }

    #[test]
    fn closed_doors_block_both_roles() {
        for role in [MazeRole::KeyFinder, MazeRole::Navigator] {
            let mut simulation = MazeSimulation::new();
            // d1 sits at (10, 7); approach from the left.
            simulation.set_avatar(GridPos { x: 9, y: 7 });
            assert_eq!(simulation.try_step(Direction::Right, role), StepOutcome::Blocked);
            assert_eq!(simulation.avatar(), GridPos { x: 9, y: 7 });
        }
    }

    #[test]
    fn opened_door_is_passable() {
        let mut simulation = MazeSimulation::new();
        simulation.apply_key_collection("k1"); // Blue key opens d1.
        simulation.set_avatar(GridPos { x: 9, y: 7 });
        assert_eq!(
            simulation.try_step(Direction::Right, MazeRole::KeyFinder),
            StepOutcome::Moved
        );
        assert_eq!(simulation.avatar(), GridPos { x: 10, y: 7 });
    }

    #[test]
    fn only_the_key_finder_triggers_hazards() {
        // h1 (time penalty) sits at (5, 5); approach from the left.
        let start = GridPos { x: 4, y: 5 };

        let mut as_navigator = MazeSimulation::new();
        as_navigator.set_avatar(start);
        assert_eq!(
            as_navigator.try_step(Direction::Right, MazeRole::Navigator),
            StepOutcome::Moved
        );

        let mut as_key_finder = MazeSimulation::new();
        as_key_finder.set_avatar(start);
        assert_eq!(
            as_key_finder.try_step(Direction::Right, MazeRole::KeyFinder),
            StepOutcome::HazardTriggered {
                hazard: HazardKind::TimePenalty
            }
        );
        // The movement itself still commits.
        assert_eq!(as_key_finder.avatar(), GridPos { x: 5, y: 5 });
    }

    #[test]
    fn a_spent_hazard_fires_only_once() {
        let mut simulation = MazeSimulation::new();
        simulation.set_avatar(GridPos { x: 4, y: 5 });
        simulation.try_step(Direction::Right, MazeRole::KeyFinder);

        // Step off and back on.
        simulation.try_step(Direction::Left, MazeRole::KeyFinder);
        assert_eq!(
            simulation.try_step(Direction::Right, MazeRole::KeyFinder),
            StepOutcome::Moved
        );
    }

    #[test]
    fn instant_death_hazard_reports_its_class() {
        // h2 sits at (15, 4); approach from above.
        let mut simulation = MazeSimulation::new();
        simulation.set_avatar(GridPos { x: 15, y: 3 });
        assert_eq!(
            simulation.try_step(Direction::Down, MazeRole::KeyFinder),
            StepOutcome::HazardTriggered {
                hazard: HazardKind::InstantDeath
            }
        );
    }

    #[test]
    fn reaching_the_goal_reports_it() {
        // g1 sits at (18, 13); approach from the left.
        let mut simulation = MazeSimulation::new();
        simulation.set_avatar(GridPos { x: 17, y: 13 });
        assert_eq!(
            simulation.try_step(Direction::Right, MazeRole::Navigator),
            StepOutcome::GoalReached
        );
        assert_eq!(simulation.avatar(), GridPos { x: 18, y: 13 });
    }

    #[test]
    fn key_pickup_opens_matching_doors_only() {
        let mut simulation = MazeSimulation::with_entities(
            GridPos { x: 1, y: 1 },
            vec![
                place("k1", EntityKind::Key(KeyColor::Blue), 2, 1),
                place("d1", EntityKind::Door(KeyColor::Blue), 5, 1),
                place("d2", EntityKind::Door(KeyColor::Red), 6, 1),
            ],
        );

        assert_eq!(
            simulation.try_step(Direction::Right, MazeRole::KeyFinder),
            StepOutcome::KeyCollected { entity_id: "k1" }
        );
        assert!(simulation.door_open(KeyColor::Blue));
        assert!(!simulation.door_open(KeyColor::Red));
    }

    #[test]
    fn the_navigator_walks_over_keys() {
        let mut simulation = MazeSimulation::with_entities(
            GridPos { x: 1, y: 1 },
            vec![place("k1", EntityKind::Key(KeyColor::Blue), 2, 1)],
        );
        assert_eq!(
            simulation.try_step(Direction::Right, MazeRole::Navigator),
            StepOutcome::Moved
        );
        assert!(!simulation.entities()[0].collected);
    }

    #[test]
    fn layout_sanity_for_the_scenario_cells() {
        // The cells the tests above rely on really are floor.
        for (x, y) in [(9, 7), (4, 5), (15, 3), (17, 13)] {
            assert_ne!(MAZE_LAYOUT[y].as_bytes()[x], b'#', "({}, {})", x, y);
        }
    }
}
