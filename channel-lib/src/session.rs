//! Session state machine shared by both games.
//!
//! ```text
//! Connecting -> Waiting -> Playing -> Won
//!                  ^          |   \-> Lost
//!                  \----------/
//! Disconnected is reachable from every non-terminal phase.
//! ```
//!
//! Won, Lost and Disconnected are terminal: once entered, no later presence
//! sync or timer tick may overwrite them. That guard lives here instead of
//! in the games, because a stale presence update arriving after a win
//! regressing the phase to Playing is exactly the bug this machine exists
//! to rule out.

/// The lifecycle phase of one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// The channel subscription is not confirmed yet.
    #[default]
    Connecting,
    /// We are alone in the room, waiting for the partner.
    Waiting,
    /// Both participants present, roles assigned, clock running.
    Playing,
    /// The goal was reached, locally or by the peer.
    Won,
    /// Timeout, lethal hazard or the peer's loss broadcast.
    Lost,
    /// The transport went away mid-session. No resume semantics.
    Disconnected,
}

impl SessionPhase {
    /// A terminal phase stops the simulation clock and refuses every
    /// further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::Won | SessionPhase::Lost | SessionPhase::Disconnected
        )
    }

    /// Validates a phase transition.
    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;

        match (self, next) {
            // Terminal phases never move again.
            (current, _) if current.is_terminal() => *current == next,

            // Staying put is always fine.
            (current, next) if *current == next => true,

            // Every non-terminal phase may drop the transport.
            (_, Disconnected) => true,

            (Connecting, Waiting) => true,
            // Both participants can show up in the very first presence sync.
            (Connecting, Playing) => true,

            (Waiting, Playing) => true,

            // The partner left before the finish.
            (Playing, Waiting) => true,
            (Playing, Won) => true,
            (Playing, Lost) => true,

            _ => false,
        }
    }

    /// Applies a transition if it is legal, ignores it otherwise.
    /// Returns whether the phase changed.
    pub fn transition_to(&mut self, next: SessionPhase) -> bool {
        if *self != next && self.can_transition_to(next) {
            *self = next;
            true
        } else {
            false
        }
    }

    /// The phase implied by a presence sync reporting `count` participants.
    /// Terminal phases stay untouched; zero participants means the sync
    /// raced the subscription and changes nothing.
    pub fn apply_presence(&mut self, count: usize) -> bool {
        if self.is_terminal() {
            return false;
        }
        match count {
            0 => false,
            1 => self.transition_to(SessionPhase::Waiting),
            _ => self.transition_to(SessionPhase::Playing),
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Connecting => write!(f, "Connecting"),
            SessionPhase::Waiting => write!(f, "Waiting"),
            SessionPhase::Playing => write!(f, "Playing"),
            SessionPhase::Won => write!(f, "Won"),
            SessionPhase::Lost => write!(f, "Lost"),
            SessionPhase::Disconnected => write!(f, "Disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut phase = SessionPhase::Connecting;

        assert!(phase.transition_to(SessionPhase::Waiting));
        assert!(phase.transition_to(SessionPhase::Playing));
        assert!(phase.transition_to(SessionPhase::Won));
        assert_eq!(phase, SessionPhase::Won);
    }

    #[test]
    fn terminal_phases_are_monotonic() {
        for terminal in [SessionPhase::Won, SessionPhase::Lost, SessionPhase::Disconnected] {
            let mut phase = terminal;
            // Neither a presence sync nor any explicit transition moves it.
            assert!(!phase.apply_presence(2));
            assert!(!phase.transition_to(SessionPhase::Playing));
            assert!(!phase.transition_to(SessionPhase::Waiting));
            assert_eq!(phase, terminal);
        }
    }

    #[test]
    fn stale_presence_after_win_does_not_regress() {
        let mut phase = SessionPhase::Playing;
        phase.transition_to(SessionPhase::Won);

        // The late presence event that used to regress sessions.
        assert!(!phase.apply_presence(2));
        assert_eq!(phase, SessionPhase::Won);
    }

    #[test]
    fn presence_drives_early_phases() {
        let mut phase = SessionPhase::Connecting;

        assert!(!phase.apply_presence(0));
        assert_eq!(phase, SessionPhase::Connecting);

        assert!(phase.apply_presence(1));
        assert_eq!(phase, SessionPhase::Waiting);

        assert!(phase.apply_presence(2));
        assert_eq!(phase, SessionPhase::Playing);
    }

    #[test]
    fn both_participants_in_first_sync_skip_waiting() {
        let mut phase = SessionPhase::Connecting;
        assert!(phase.apply_presence(2));
        assert_eq!(phase, SessionPhase::Playing);
    }

    #[test]
    fn partner_departure_returns_to_waiting() {
        let mut phase = SessionPhase::Playing;
        assert!(phase.apply_presence(1));
        assert_eq!(phase, SessionPhase::Waiting);
    }

    #[test]
    fn disconnect_is_reachable_from_non_terminal_phases() {
        for start in [
            SessionPhase::Connecting,
            SessionPhase::Waiting,
            SessionPhase::Playing,
        ] {
            let mut phase = start;
            assert!(phase.transition_to(SessionPhase::Disconnected));
            assert!(phase.is_terminal());
        }
    }

    #[test]
    fn cannot_win_before_playing() {
        let mut phase = SessionPhase::Waiting;
        assert!(!phase.transition_to(SessionPhase::Won));
        assert_eq!(phase, SessionPhase::Waiting);
    }
}
