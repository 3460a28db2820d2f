//! The arena simulation: one avatar moved in fixed-size discrete steps,
//! axis-aligned collision against the obstacle course, and the idempotent
//! win check.
//!
//! Movement is deliberately step-per-key-press instead of velocity
//! integration; every axis is stepped on its own, so being blocked on one
//! axis never prevents sliding along the other.

use crate::arena_logic::level::{
    GOAL, OBSTACLES, ObstacleKind, PLAYER_SIZE, Rect, START_X, START_Y, STEP_SIZE,
};
use crate::arena_logic::role::MoveDir;
use channel_lib::reconcile::{Axis, AxisReconciler, AxisSample};

/// True if an avatar at the candidate position is blocked. Hurdles yield to
/// the jumping flag, low beams to the crouching flag, walls to nobody.
fn blocked_at(x: f32, y: f32, jumping: bool, crouching: bool) -> bool {
    let avatar = Rect::new(x, y, PLAYER_SIZE, PLAYER_SIZE);
    for obstacle in OBSTACLES.iter() {
        if !avatar.overlaps(&obstacle.rect) {
            continue;
        }
        match obstacle.kind {
            ObstacleKind::Wall => return true,
            ObstacleKind::Hurdle if !jumping => return true,
            ObstacleKind::LowBeam if !crouching => return true,
            _ => {}
        }
    }
    false
}

/// The local avatar. The owned axis is written by key presses only, the
/// other axis only by the peer's sync samples.
pub struct ArenaSimulation {
    x: f32,
    y: f32,
    won: bool,
}

impl ArenaSimulation {
    pub fn new() -> ArenaSimulation {
        ArenaSimulation {
            x: START_X,
            y: START_Y,
            won: false,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[cfg(test)]
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// One discrete step along the indicated axis, validated against the
    /// obstacle course before committing. Returns whether the avatar moved.
    pub fn try_step(
        &mut self,
        axis: Axis,
        direction: MoveDir,
        jumping: bool,
        crouching: bool,
    ) -> bool {
        let amount = match direction {
            MoveDir::Negative => -STEP_SIZE,
            MoveDir::Positive => STEP_SIZE,
        };
        let (candidate_x, candidate_y) = match axis {
            Axis::Horizontal => (self.x + amount, self.y),
            Axis::Vertical => (self.x, self.y + amount),
        };

        if blocked_at(candidate_x, candidate_y, jumping, crouching) {
            return false;
        }
        self.x = candidate_x;
        self.y = candidate_y;
        true
    }

    /// Applies a peer sample to the axis we do not own. Returns whether a
    /// correction snapped the position.
    pub fn apply_remote(&mut self, reconciler: &AxisReconciler, sample: &AxisSample) -> bool {
        reconciler.apply_remote(sample, &mut self.x, &mut self.y)
    }

    /// The outbound sample for the owned axis.
    pub fn sample(&self, reconciler: &AxisReconciler) -> AxisSample {
        reconciler.sample(self.x, self.y)
    }

    /// True exactly once, the frame the avatar first overlaps the goal.
    pub fn check_win(&mut self) -> bool {
        if self.won {
            return false;
        }
        let avatar = Rect::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE);
        if avatar.overlaps(&GOAL) {
            self.won = true;
            return true;
        }
        false
    }

    pub fn has_won(&self) -> bool {
        self.won
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_floor_steps_commit() {
        let mut simulation = ArenaSimulation::new();
        assert!(simulation.try_step(Axis::Horizontal, MoveDir::Positive, false, false));
        assert_eq!(simulation.position(), (START_X + STEP_SIZE, START_Y));
    }

    #[test]
    fn walls_block_regardless_of_actions() {
        // The first maze wall spans x in [150, 170] down to y = 320; an
        // avatar at x = 120 stands flush against it.
        let mut simulation = ArenaSimulation::new();
        simulation.set_position(120.0, 60.0);
        for (jumping, crouching) in [(false, false), (true, false), (false, true), (true, true)] {
            assert!(!simulation.try_step(Axis::Horizontal, MoveDir::Positive, jumping, crouching));
            assert_eq!(simulation.position(), (120.0, 60.0));
        }
    }

    #[test]
    fn hurdles_yield_to_the_jump_flag() {
        // The first hurdle spans x in [170, 300], y in [200, 220]. Approach
        // from above, stepping down into it.
        let mut simulation = ArenaSimulation::new();
        simulation.set_position(200.0, 160.0);

        assert!(!simulation.try_step(Axis::Vertical, MoveDir::Positive, false, false));
        assert_eq!(simulation.position(), (200.0, 160.0));

        assert!(simulation.try_step(Axis::Vertical, MoveDir::Positive, true, false));
        assert_eq!(simulation.position(), (200.0, 180.0));
    }

    #[test]
    fn low_beams_yield_to_the_crouch_flag() {
        // The first low beam spans x in [20, 150], y in [350, 370].
        let mut simulation = ArenaSimulation::new();
        simulation.set_position(60.0, 315.0);

        assert!(!simulation.try_step(Axis::Vertical, MoveDir::Positive, false, false));
        assert!(!simulation.try_step(Axis::Vertical, MoveDir::Positive, true, false));
        assert!(simulation.try_step(Axis::Vertical, MoveDir::Positive, false, true));
        assert_eq!(simulation.position(), (60.0, 335.0));
    }

    #[test]
    fn blocked_axis_still_allows_sliding_on_the_other() {
        // Pinned against the wall horizontally, free vertically.
        let mut simulation = ArenaSimulation::new();
        simulation.set_position(120.0, 60.0);
        assert!(!simulation.try_step(Axis::Horizontal, MoveDir::Positive, false, false));
        assert!(simulation.try_step(Axis::Vertical, MoveDir::Positive, false, false));
        assert_eq!(simulation.position(), (120.0, 80.0));
    }

    #[test]
    fn win_fires_exactly_once() {
        let mut simulation = ArenaSimulation::new();
        simulation.set_position(700.0, 440.0);
        assert!(simulation.try_step(Axis::Horizontal, MoveDir::Positive, false, false));

        assert!(simulation.check_win());
        assert!(!simulation.check_win());
        assert!(simulation.has_won());
    }

    #[test]
    fn remote_sample_moves_only_the_foreign_axis() {
        let reconciler = AxisReconciler::new(Axis::Horizontal);
        let mut simulation = ArenaSimulation::new();

        // A vertical sample far away snaps y, leaves x alone.
        let sample = AxisSample { x: None, y: Some(200.0) };
        assert!(simulation.apply_remote(&reconciler, &sample));
        assert_eq!(simulation.position(), (START_X, 200.0));

        // An x sample must never move us, that axis is ours.
        let own_axis = AxisSample { x: Some(500.0), y: None };
        assert!(!simulation.apply_remote(&reconciler, &own_axis));
        assert_eq!(simulation.position(), (START_X, 200.0));
    }
}
