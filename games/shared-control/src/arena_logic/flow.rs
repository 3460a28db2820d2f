//! The session flow of the shared-control game: channel events and input
//! edges in, session phase and broadcasts out.
//!
//! Like the maze flow, everything here is macroquad-free; the frontend
//! feeds key edges in and drains the outbox once per frame.

use crate::arena_logic::input::InputState;
use crate::arena_logic::messages::{ArenaMessage, GameOutcome};
use crate::arena_logic::role::{ArenaRole, ArrowKey, InputAction, MoveDir};
use crate::arena_logic::simulation::ArenaSimulation;
use channel_lib::countdown::{Countdown, CountdownEvent};
use channel_lib::game_channel::ChannelEvent;
use channel_lib::presence::Roster;
use channel_lib::reconcile::{AxisReconciler, SYNC_INTERVAL_SECONDS, SyncCadence};
use channel_lib::session::SessionPhase;

/// The mission clock of the arena variant, in seconds.
pub const ARENA_SECONDS: u32 = 60;

/// The two shared action flags a key edge can address.
enum ActionFlag {
    Jump,
    Crouch,
}

/// One arena session from the local player's point of view.
pub struct ArenaFlow {
    roster: Roster,
    phase: SessionPhase,
    role: Option<ArenaRole>,
    reconciler: Option<AxisReconciler>,
    cadence: SyncCadence,
    countdown: Countdown,
    simulation: ArenaSimulation,
    local_input: InputState,
    remote_input: InputState,
    local_id: String,
    outbox: Vec<ArenaMessage>,
}

impl ArenaFlow {
    pub fn new(local_id: String) -> ArenaFlow {
        ArenaFlow {
            roster: Roster::new(local_id.clone()),
            phase: SessionPhase::Connecting,
            role: None,
            reconciler: None,
            cadence: SyncCadence::new(SYNC_INTERVAL_SECONDS),
            countdown: Countdown::new(ARENA_SECONDS),
            simulation: ArenaSimulation::new(),
            local_input: InputState::default(),
            remote_input: InputState::default(),
            local_id,
            outbox: Vec::new(),
        }
    }

    /// Feeds one inbound channel event into the session.
    pub fn handle_channel_event(&mut self, event: ChannelEvent<ArenaMessage>) {
        match event {
            ChannelEvent::PresenceSync(members) => {
                self.roster.apply_sync(members);
                if self.role.is_none() {
                    self.role = self.roster.assign_role();
                    if let Some(role) = self.role {
                        self.reconciler = Some(AxisReconciler::new(role.owned_axis()));
                    }
                }
                self.phase.apply_presence(self.roster.player_count());
            }
            ChannelEvent::Broadcast { sender: _, payload } => match payload {
                ArenaMessage::Input { input, .. } => {
                    // Last value wins; the sender ships its full flag state.
                    self.remote_input = input;
                }
                ArenaMessage::SyncPos(sample) => {
                    if let Some(reconciler) = self.reconciler.as_ref() {
                        self.simulation.apply_remote(reconciler, &sample);
                    }
                }
                ArenaMessage::GameState { result } => {
                    let next = match result {
                        GameOutcome::Won => SessionPhase::Won,
                        GameOutcome::Lost => SessionPhase::Lost,
                    };
                    self.phase.transition_to(next);
                }
            },
        }
    }

    /// One edge of a directional key. Step actions fire on the down edge
    /// only; the repurposed jump/crouch arrows toggle their shared flag on
    /// both edges.
    pub fn handle_arrow_edge(&mut self, arrow: ArrowKey, pressed: bool) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let Some(role) = self.role else {
            return;
        };

        match role.map_arrow(arrow) {
            InputAction::Step(direction) => {
                if pressed {
                    self.step(direction);
                }
            }
            InputAction::Jump => self.set_action_flag(ActionFlag::Jump, pressed),
            InputAction::Crouch => self.set_action_flag(ActionFlag::Crouch, pressed),
        }
    }

    /// One edge of the universal action keys (space = jump, shift = crouch),
    /// available to both roles independent of the arrow mapping.
    pub fn handle_jump_edge(&mut self, pressed: bool) {
        if self.phase == SessionPhase::Playing {
            self.set_action_flag(ActionFlag::Jump, pressed);
        }
    }

    pub fn handle_crouch_edge(&mut self, pressed: bool) {
        if self.phase == SessionPhase::Playing {
            self.set_action_flag(ActionFlag::Crouch, pressed);
        }
    }

    fn set_action_flag(&mut self, flag: ActionFlag, value: bool) {
        let slot = match flag {
            ActionFlag::Jump => &mut self.local_input.jump,
            ActionFlag::Crouch => &mut self.local_input.crouch,
        };
        if *slot == value {
            return; // Key repeat, nothing changed.
        }
        *slot = value;
        self.outbox.push(ArenaMessage::Input {
            player_id: self.local_id.clone(),
            input: self.local_input,
        });
    }

    fn step(&mut self, direction: MoveDir) {
        let Some(axis) = self.reconciler.as_ref().map(|r| r.owned_axis()) else {
            return;
        };
        let jumping = self.jumping();
        let crouching = self.crouching();
        let moved = self.simulation.try_step(axis, direction, jumping, crouching);
        if moved && let Some(reconciler) = self.reconciler.as_ref() {
            // The owned axis changed; tell the peer right away instead of
            // waiting out the cadence.
            self.outbox
                .push(ArenaMessage::SyncPos(self.simulation.sample(reconciler)));
        }
    }

    /// The per-frame heartbeat: mission clock, periodic axis re-broadcast
    /// and the win check. Stops doing anything once the phase is terminal.
    pub fn update(&mut self, delta_time: f32) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        if self.countdown.update(delta_time) == CountdownEvent::Expired {
            self.phase.transition_to(SessionPhase::Lost);
            self.outbox.push(ArenaMessage::GameState {
                result: GameOutcome::Lost,
            });
            return;
        }

        if let Some(reconciler) = self.reconciler.as_ref()
            && self.cadence.due(delta_time)
        {
            self.outbox
                .push(ArenaMessage::SyncPos(self.simulation.sample(reconciler)));
        }

        if self.simulation.check_win() {
            self.phase.transition_to(SessionPhase::Won);
            self.outbox.push(ArenaMessage::GameState {
                result: GameOutcome::Won,
            });
        }
    }

    /// Everything queued for broadcast since the last heartbeat.
    pub fn drain_outbox(&mut self) -> Vec<ArenaMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// The global jumping flag, the OR of both peers.
    pub fn jumping(&self) -> bool {
        InputState::jumping(&self.local_input, &self.remote_input)
    }

    /// The global crouching flag, the OR of both peers.
    pub fn crouching(&self) -> bool {
        InputState::crouching(&self.local_input, &self.remote_input)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Marks the transport as gone for good.
    pub fn mark_disconnected(&mut self) {
        self.phase.transition_to(SessionPhase::Disconnected);
    }

    pub fn role(&self) -> Option<ArenaRole> {
        self.role
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn simulation(&self) -> &ArenaSimulation {
        &self.simulation
    }

    #[cfg(test)]
    fn simulation_mut(&mut self) -> &mut ArenaSimulation {
        &mut self.simulation
    }

    pub fn player_count(&self) -> usize {
        self.roster.player_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena_logic::level::{START_X, START_Y, STEP_SIZE};
    use channel_lib::PresenceRecord;
    use channel_lib::reconcile::AxisSample;

    fn record(id: &str) -> PresenceRecord {
        PresenceRecord {
            player_id: id.to_string(),
            joined_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn playing_flow(local: &str, partner: &str) -> ArenaFlow {
        let mut flow = ArenaFlow::new(local.to_string());
        flow.handle_channel_event(ChannelEvent::PresenceSync(vec![
            record(local),
            record(partner),
        ]));
        flow
    }

    #[test]
    fn roles_and_axes_follow_the_sorted_ids() {
        let horizontal = playing_flow("aaaa1111", "zzzz9999");
        let vertical = playing_flow("zzzz9999", "aaaa1111");
        assert_eq!(horizontal.role(), Some(ArenaRole::Horizontal));
        assert_eq!(vertical.role(), Some(ArenaRole::Vertical));
        assert_eq!(horizontal.phase(), SessionPhase::Playing);
    }

    #[test]
    fn sync_samples_always_carry_the_owned_axis_only() {
        // An arbitrary stormy input sequence; whatever happens, a
        // horizontal peer only ever publishes x.
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        let arrows = [
            ArrowKey::Right,
            ArrowKey::Up,
            ArrowKey::Right,
            ArrowKey::Down,
            ArrowKey::Left,
            ArrowKey::Right,
            ArrowKey::Left,
            ArrowKey::Up,
        ];
        for (index, arrow) in arrows.iter().cycle().take(40).enumerate() {
            flow.handle_arrow_edge(*arrow, index % 3 != 2);
            flow.update(0.05);
        }

        let mut saw_sample = false;
        for message in flow.drain_outbox() {
            if let ArenaMessage::SyncPos(sample) = message {
                saw_sample = true;
                assert!(sample.x.is_some() && sample.y.is_none(), "{:?}", sample);
            }
        }
        assert!(saw_sample);
    }

    #[test]
    fn steps_move_by_the_fixed_amount_and_broadcast() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        flow.handle_arrow_edge(ArrowKey::Right, true);

        assert_eq!(
            flow.simulation().position(),
            (START_X + STEP_SIZE, START_Y)
        );
        let outbox = flow.drain_outbox();
        assert!(matches!(
            outbox.as_slice(),
            [ArenaMessage::SyncPos(AxisSample { x: Some(_), y: None })]
        ));
    }

    #[test]
    fn remote_jump_flag_lets_the_vertical_peer_cross_a_hurdle() {
        // The vertical peer sits above the first hurdle; the horizontal
        // peer holds jump for them.
        let mut flow = playing_flow("zzzz9999", "aaaa1111");
        assert_eq!(flow.role(), Some(ArenaRole::Vertical));

        // Pin the replicated x onto the hurdle span via a peer sample, then
        // walk down to just above it.
        flow.handle_channel_event(ChannelEvent::Broadcast {
            sender: "aaaa1111".to_string(),
            payload: ArenaMessage::SyncPos(AxisSample { x: Some(200.0), y: None }),
        });
        for _ in 0..5 {
            flow.handle_arrow_edge(ArrowKey::Down, true);
        }
        assert_eq!(flow.simulation().position(), (200.0, 160.0));

        // Blocked without the shared flag.
        flow.handle_arrow_edge(ArrowKey::Down, true);
        assert_eq!(flow.simulation().position(), (200.0, 160.0));

        // The partner presses jump.
        flow.handle_channel_event(ChannelEvent::Broadcast {
            sender: "aaaa1111".to_string(),
            payload: ArenaMessage::Input {
                player_id: "aaaa1111".to_string(),
                input: InputState {
                    jump: true,
                    ..InputState::default()
                },
            },
        });
        assert!(flow.jumping());
        flow.handle_arrow_edge(ArrowKey::Down, true);
        assert_eq!(flow.simulation().position(), (200.0, 180.0));
    }

    #[test]
    fn input_edges_broadcast_the_accumulated_state_once() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        flow.handle_arrow_edge(ArrowKey::Up, true); // Jump for the horizontal role.
        flow.handle_arrow_edge(ArrowKey::Up, true); // Key repeat, no new edge.

        let inputs: Vec<_> = flow
            .drain_outbox()
            .into_iter()
            .filter(|m| matches!(m, ArenaMessage::Input { .. }))
            .collect();
        assert_eq!(inputs.len(), 1);
        if let ArenaMessage::Input { input, .. } = &inputs[0] {
            assert!(input.jump);
            assert!(!input.crouch);
        }
    }

    #[test]
    fn cadence_rebroadcasts_without_movement() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        // Half a second of idle frames at 50 ms each.
        for _ in 0..10 {
            flow.update(0.05);
        }
        let samples = flow
            .drain_outbox()
            .into_iter()
            .filter(|m| matches!(m, ArenaMessage::SyncPos(_)))
            .count();
        assert!(samples >= 4, "only {} periodic samples", samples);
    }

    #[test]
    fn countdown_expiry_loses_once_and_broadcasts() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        for _ in 0..ARENA_SECONDS + 5 {
            flow.update(1.0);
        }
        assert_eq!(flow.phase(), SessionPhase::Lost);
        let losses = flow
            .drain_outbox()
            .into_iter()
            .filter(|m| {
                matches!(
                    m,
                    ArenaMessage::GameState {
                        result: GameOutcome::Lost
                    }
                )
            })
            .count();
        assert_eq!(losses, 1);
    }

    #[test]
    fn reaching_the_goal_wins_and_broadcasts() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        // Teleport next to the goal via the test hook on the simulation.
        flow.simulation_mut().set_position(700.0, 440.0);
        flow.handle_arrow_edge(ArrowKey::Right, true);
        flow.update(0.016);

        assert_eq!(flow.phase(), SessionPhase::Won);
        assert!(flow.drain_outbox().iter().any(|m| matches!(
            m,
            ArenaMessage::GameState {
                result: GameOutcome::Won
            }
        )));

        // Terminal: further updates and inputs do nothing.
        flow.update(1.0);
        flow.handle_arrow_edge(ArrowKey::Left, true);
        assert_eq!(flow.phase(), SessionPhase::Won);
        assert!(flow.drain_outbox().is_empty());
    }

    #[test]
    fn peer_outcome_broadcast_is_followed() {
        let mut flow = playing_flow("aaaa1111", "zzzz9999");
        flow.handle_channel_event(ChannelEvent::Broadcast {
            sender: "zzzz9999".to_string(),
            payload: ArenaMessage::GameState {
                result: GameOutcome::Won,
            },
        });
        assert_eq!(flow.phase(), SessionPhase::Won);

        // A stale presence sync must not drag the session back.
        flow.handle_channel_event(ChannelEvent::PresenceSync(vec![
            record("aaaa1111"),
            record("zzzz9999"),
        ]));
        assert_eq!(flow.phase(), SessionPhase::Won);
    }
}
