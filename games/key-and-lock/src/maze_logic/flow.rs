//! The session flow of the maze game: consumes channel events and key
//! presses, drives the session phase, and queues the broadcasts for the
//! next heartbeat.
//!
//! The frontend drains the outbox once per frame and pushes every entry
//! through the game channel; keeping the flow free of the channel type
//! keeps the whole session logic runnable headless.

use crate::maze_logic::level::{GridPos, HazardKind};
use crate::maze_logic::messages::{GameEvent, MazeMessage};
use crate::maze_logic::role::MazeRole;
use crate::maze_logic::simulation::{Direction, MazeSimulation, StepOutcome};
use channel_lib::countdown::{Countdown, CountdownEvent};
use channel_lib::game_channel::ChannelEvent;
use channel_lib::presence::Roster;
use channel_lib::session::SessionPhase;

/// The mission clock of the maze variant, in seconds.
pub const MAZE_SECONDS: u32 = 300;

/// The countdown cost of a time penalty trap.
const TIME_PENALTY_SECONDS: u32 = 30;

/// How long a signal banner stays on screen.
const SIGNAL_SECONDS: f32 = 2.0;

/// The transient coordination banner.
pub struct SignalBanner {
    pub text: String,
    remaining: f32,
}

/// One maze session from the local player's point of view.
pub struct MazeFlow {
    roster: Roster,
    phase: SessionPhase,
    role: Option<MazeRole>,
    countdown: Countdown,
    simulation: MazeSimulation,
    partner_pos: Option<GridPos>,
    banner: Option<SignalBanner>,
    local_id: String,
    outbox: Vec<MazeMessage>,
}

impl MazeFlow {
    pub fn new(local_id: String) -> MazeFlow {
        MazeFlow {
            roster: Roster::new(local_id.clone()),
            phase: SessionPhase::Connecting,
            role: None,
            countdown: Countdown::new(MAZE_SECONDS),
            simulation: MazeSimulation::new(),
            partner_pos: None,
            banner: None,
            local_id,
            outbox: Vec::new(),
        }
    }

    /// Feeds one inbound channel event into the session.
    pub fn handle_channel_event(&mut self, event: ChannelEvent<MazeMessage>) {
        match event {
            ChannelEvent::PresenceSync(members) => {
                self.roster.apply_sync(members);
                // A role, once taken, is never reassigned.
                if self.role.is_none() {
                    self.role = self.roster.assign_role();
                }
                self.phase.apply_presence(self.roster.player_count());
            }
            ChannelEvent::Broadcast { sender: _, payload } => self.handle_peer_message(payload),
        }
    }

    fn handle_peer_message(&mut self, message: MazeMessage) {
        match message {
            MazeMessage::PlayerMove { pos, .. } => {
                self.partner_pos = Some(pos);
            }
            MazeMessage::GameEvent(event) => match event {
                GameEvent::Signal { message, .. } => {
                    self.show_banner(message);
                }
                GameEvent::HazardHit { hazard, message } => {
                    self.show_banner(format!("PARTNER HIT TRAP! {}", message));
                    if hazard == HazardKind::TimePenalty {
                        self.countdown.penalize(TIME_PENALTY_SECONDS);
                    }
                }
                GameEvent::KeyCollected { entity_id } => {
                    self.simulation.apply_key_collection(&entity_id);
                }
                GameEvent::GameOver { .. } => {
                    self.phase.transition_to(SessionPhase::Lost);
                }
                GameEvent::GameWon { .. } => {
                    self.phase.transition_to(SessionPhase::Won);
                }
            },
        }
    }

    /// Resolves one local directional key press.
    pub fn handle_direction(&mut self, direction: Direction) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let Some(role) = self.role else {
            return;
        };

        let outcome = self.simulation.try_step(direction, role);
        if outcome == StepOutcome::Blocked {
            return;
        }

        // Every committed step is mirrored to the partner right away.
        self.outbox.push(MazeMessage::PlayerMove {
            player_id: self.local_id.clone(),
            pos: self.simulation.avatar(),
            role,
        });

        match outcome {
            StepOutcome::KeyCollected { entity_id } => {
                self.outbox
                    .push(MazeMessage::GameEvent(GameEvent::KeyCollected {
                        entity_id: entity_id.to_string(),
                    }));
            }
            StepOutcome::HazardTriggered {
                hazard: HazardKind::TimePenalty,
            } => {
                self.countdown.penalize(TIME_PENALTY_SECONDS);
                self.show_banner("-30s".to_string());
                self.outbox
                    .push(MazeMessage::GameEvent(GameEvent::HazardHit {
                        hazard: HazardKind::TimePenalty,
                        message: "-30s".to_string(),
                    }));
            }
            StepOutcome::HazardTriggered {
                hazard: HazardKind::InstantDeath,
            } => {
                self.phase.transition_to(SessionPhase::Lost);
                self.outbox
                    .push(MazeMessage::GameEvent(GameEvent::GameOver {
                        reason: "Hit a death trap!".to_string(),
                    }));
            }
            StepOutcome::GoalReached => {
                self.phase.transition_to(SessionPhase::Won);
                self.outbox
                    .push(MazeMessage::GameEvent(GameEvent::GameWon {
                        time_remaining: self.countdown.remaining(),
                    }));
            }
            StepOutcome::Moved | StepOutcome::Blocked => {}
        }
    }

    /// Sends one of the coordination calls.
    pub fn send_signal(&mut self, text: &str) {
        self.outbox.push(MazeMessage::GameEvent(GameEvent::Signal {
            message: text.to_string(),
            player_id: self.local_id.clone(),
        }));
    }

    /// The per-frame heartbeat: mission clock and banner decay.
    pub fn update(&mut self, delta_time: f32) {
        if self.phase == SessionPhase::Playing
            && self.countdown.update(delta_time) == CountdownEvent::Expired
        {
            // Both clocks run independently; broadcasting the outcome makes
            // the peer converge even if its clock lags a little.
            self.phase.transition_to(SessionPhase::Lost);
            self.outbox
                .push(MazeMessage::GameEvent(GameEvent::GameOver {
                    reason: "Ran out of time!".to_string(),
                }));
        }

        if let Some(banner) = self.banner.as_mut() {
            banner.remaining -= delta_time;
            if banner.remaining <= 0.0 {
                self.banner = None;
            }
        }
    }

    /// Everything queued for broadcast since the last heartbeat.
    pub fn drain_outbox(&mut self) -> Vec<MazeMessage> {
        std::mem::take(&mut self.outbox)
    }

    fn show_banner(&mut self, text: String) {
        self.banner = Some(SignalBanner {
            text,
            remaining: SIGNAL_SECONDS,
        });
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Marks the transport as gone for good.
    pub fn mark_disconnected(&mut self) {
        self.phase.transition_to(SessionPhase::Disconnected);
    }

    pub fn role(&self) -> Option<MazeRole> {
        self.role
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn simulation(&self) -> &MazeSimulation {
        &self.simulation
    }

    #[cfg(test)]
    fn simulation_mut(&mut self) -> &mut MazeSimulation {
        &mut self.simulation
    }

    pub fn partner_pos(&self) -> Option<GridPos> {
        self.partner_pos
    }

    pub fn banner(&self) -> Option<&SignalBanner> {
        self.banner.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_lib::PresenceRecord;

    fn record(id: &str) -> PresenceRecord {
        PresenceRecord {
            player_id: id.to_string(),
            joined_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn playing_flow(local: &str, partner: &str) -> MazeFlow {
        let mut flow = MazeFlow::new(local.to_string());
        flow.handle_channel_event(ChannelEvent::PresenceSync(vec![
            record(local),
            record(partner),
        ]));
        flow
    }

    #[test]
    fn two_joins_converge_on_distinct_roles_in_either_order() {
        // Both orders of the same roster, seen from both peers.
        let first = playing_flow("aaaa1111", "zzzz9999");
        let second = playing_flow("zzzz9999", "aaaa1111");

        assert_eq!(first.role(), Some(MazeRole::KeyFinder));
        assert_eq!(second.role(), Some(MazeRole::Navigator));
        assert_eq!(first.phase(), SessionPhase::Playing);
        assert_eq!(second.phase(), SessionPhase::Playing);
    }

    #[test]
    fn single_join_waits_for_the_partner() {
        let mut flow = MazeFlow::new("aaaa1111".to_string());
        flow.handle_channel_event(ChannelEvent::PresenceSync(vec![record("aaaa1111")]));
        assert_eq!(flow.phase(), SessionPhase::Waiting);
        assert_eq!(flow.role(), None);
    }

    #[test]
    fn death_trap_loses_the_session_and_tells_the_peer() {
        // Key finder walks from (15, 3) into the instant death trap below.
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        assert_eq!(flow.role(), Some(MazeRole::KeyFinder));

        flow.simulation_mut().set_avatar(GridPos { x: 15, y: 3 });
        flow.handle_direction(Direction::Down);

        assert_eq!(flow.phase(), SessionPhase::Lost);
        let outbox = flow.drain_outbox();
        assert!(outbox.iter().any(|m| matches!(
            m,
            MazeMessage::GameEvent(GameEvent::GameOver { .. })
        )));
        assert!(outbox
            .iter()
            .any(|m| matches!(m, MazeMessage::PlayerMove { .. })));
    }

    #[test]
    fn time_penalty_shortens_both_clocks() {
        let mut mover = playing_flow("aaaa1111", "zzzz9999");
        mover.simulation_mut().set_avatar(GridPos { x: 4, y: 5 });
        mover.handle_direction(Direction::Right);
        assert_eq!(mover.countdown().remaining(), MAZE_SECONDS - 30);

        // The peer applies the same penalty from the broadcast.
        let mut observer = playing_flow("zzzz9999", "aaaa1111");
        for message in mover.drain_outbox() {
            observer.handle_channel_event(ChannelEvent::Broadcast {
                sender: "aaaa1111".to_string(),
                payload: message,
            });
        }
        assert_eq!(observer.countdown().remaining(), MAZE_SECONDS - 30);
        assert!(observer.banner().is_some());
    }

    #[test]
    fn key_pickup_propagates_to_the_partner() {
        let mut finder = playing_flow("aaaa1111", "zzzz9999");
        // k1 sits at (18, 3); approach from the left.
        finder.simulation_mut().set_avatar(GridPos { x: 17, y: 3 });
        finder.handle_direction(Direction::Right);

        let mut navigator = playing_flow("zzzz9999", "aaaa1111");
        for message in finder.drain_outbox() {
            navigator.handle_channel_event(ChannelEvent::Broadcast {
                sender: "aaaa1111".to_string(),
                payload: message,
            });
        }

        // The blue door (d1) is open on both sides now.
        for flow in [&finder, &navigator] {
            let door = flow
                .simulation()
                .entities()
                .iter()
                .find(|e| e.id == "d1")
                .unwrap();
            assert!(door.opened);
        }
        // And the partner position mirrored the step.
        assert_eq!(navigator.partner_pos(), Some(GridPos { x: 18, y: 3 }));
    }

    #[test]
    fn countdown_expiry_loses_once_and_broadcasts() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");

        for _ in 0..MAZE_SECONDS {
            flow.update(1.0);
        }
        assert_eq!(flow.phase(), SessionPhase::Lost);
        let game_overs = flow
            .drain_outbox()
            .into_iter()
            .filter(|m| matches!(m, MazeMessage::GameEvent(GameEvent::GameOver { .. })))
            .count();
        assert_eq!(game_overs, 1);

        // Further ticks change nothing.
        flow.update(5.0);
        assert_eq!(flow.phase(), SessionPhase::Lost);
        assert!(flow.drain_outbox().is_empty());
    }

    #[test]
    fn peer_win_broadcast_ends_the_session_terminally() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        flow.handle_channel_event(ChannelEvent::Broadcast {
            sender: "zzzz9999".to_string(),
            payload: MazeMessage::GameEvent(GameEvent::GameWon { time_remaining: 10 }),
        });
        assert_eq!(flow.phase(), SessionPhase::Won);

        // A stale presence sync afterwards must not regress the phase.
        flow.handle_channel_event(ChannelEvent::PresenceSync(vec![
            record("aaaa1111"),
            record("zzzz9999"),
        ]));
        assert_eq!(flow.phase(), SessionPhase::Won);
    }

    #[test]
    fn input_is_ignored_outside_playing() {
        let mut flow = MazeFlow::new("aaaa1111".to_string());
        flow.handle_direction(Direction::Down);
        assert!(flow.drain_outbox().is_empty());
        assert_eq!(flow.simulation().avatar(), GridPos { x: 1, y: 1 });
    }
}
