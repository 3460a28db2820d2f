//! The client half of the room/presence management.
//!
//! The transport is the source of truth for membership; this module only
//! mirrors the latest presence sync and derives the role assignment from
//! it. Assignment is a pure function of the sorted identity list, so both
//! peers converge on the same answer once presence is fully synced, no
//! matter in which order they joined.

use crate::traits::PairRole;
use protocol::PresenceRecord;

/// The mirrored membership of the room, from the local player's point of view.
pub struct Roster {
    local_id: String,
    members: Vec<PresenceRecord>,
}

impl Roster {
    pub fn new(local_id: String) -> Roster {
        Roster {
            local_id,
            members: Vec::new(),
        }
    }

    /// Replaces the membership with the latest presence sync.
    pub fn apply_sync(&mut self, members: Vec<PresenceRecord>) {
        self.members = members;
    }

    /// How many participants the transport currently reports.
    pub fn player_count(&self) -> usize {
        self.members.len()
    }

    /// All known identities, sorted lexicographically. This order is the
    /// single input to role assignment.
    fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.members.iter().map(|m| m.player_id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// The slot of the local player in the sorted identity list, if present.
    pub fn local_slot(&self) -> Option<usize> {
        self.sorted_ids().iter().position(|id| *id == self.local_id)
    }

    /// The role the local player gets, once at least two participants are
    /// present. Extra participants beyond the second get `None`; they are
    /// observed but never assigned a functional role.
    ///
    /// Callers keep the first answer: a role, once taken, is never
    /// reassigned by a later presence event.
    pub fn assign_role<Role: PairRole>(&self) -> Option<Role> {
        if self.player_count() < 2 {
            return None;
        }
        Role::from_slot(self.local_slot()?)
    }

    /// The identity of the other functional player, if known.
    pub fn partner_id(&self) -> Option<&str> {
        self.sorted_ids()
            .into_iter()
            .take(2)
            .find(|id| *id != self.local_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum TestRole {
        First,
        Second,
    }

    impl PairRole for TestRole {
        const FIRST: Self = TestRole::First;
        const SECOND: Self = TestRole::Second;
    }

    fn record(id: &str) -> PresenceRecord {
        PresenceRecord {
            player_id: id.to_string(),
            joined_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn assignment_is_independent_of_arrival_order() {
        let mut first_arrival = Roster::new("aaaa1111".to_string());
        first_arrival.apply_sync(vec![record("aaaa1111"), record("zzzz9999")]);

        let mut second_arrival = Roster::new("aaaa1111".to_string());
        second_arrival.apply_sync(vec![record("zzzz9999"), record("aaaa1111")]);

        assert_eq!(first_arrival.assign_role::<TestRole>(), Some(TestRole::First));
        assert_eq!(second_arrival.assign_role::<TestRole>(), Some(TestRole::First));
    }

    #[test]
    fn both_peers_converge_on_distinct_roles() {
        let roster_members = vec![record("bbbb2222"), record("aaaa1111")];

        let mut left = Roster::new("aaaa1111".to_string());
        left.apply_sync(roster_members.clone());
        let mut right = Roster::new("bbbb2222".to_string());
        right.apply_sync(roster_members);

        assert_eq!(left.assign_role::<TestRole>(), Some(TestRole::First));
        assert_eq!(right.assign_role::<TestRole>(), Some(TestRole::Second));
    }

    #[test]
    fn no_role_while_alone() {
        let mut roster = Roster::new("aaaa1111".to_string());
        roster.apply_sync(vec![record("aaaa1111")]);
        assert_eq!(roster.assign_role::<TestRole>(), None);
    }

    #[test]
    fn third_participant_gets_no_role() {
        let mut roster = Roster::new("cccc3333".to_string());
        roster.apply_sync(vec![record("aaaa1111"), record("bbbb2222"), record("cccc3333")]);
        assert_eq!(roster.assign_role::<TestRole>(), None);
        assert_eq!(roster.local_slot(), Some(2));
    }

    #[test]
    fn partner_id_is_the_other_functional_player() {
        let mut roster = Roster::new("aaaa1111".to_string());
        roster.apply_sync(vec![record("bbbb2222"), record("aaaa1111")]);
        assert_eq!(roster.partner_id(), Some("bbbb2222"));
    }
}
