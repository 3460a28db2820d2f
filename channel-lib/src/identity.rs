//! Generation of the throwaway identifiers used by the games.
//!
//! Player identities are opaque random strings scoped to one room occupancy,
//! room codes are the short human-enterable rendezvous codes. Neither is
//! persisted anywhere.

use protocol::{PLAYER_ID_LEN, ROOM_CODE_LEN};
use rand::Rng;

/// The alphabet for room codes. Uppercase only, codes are case-normalized
/// on entry anyway.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The alphabet for player identities.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// A fresh player identity for one session.
pub fn generate_player_id() -> String {
    random_string(ID_ALPHABET, PLAYER_ID_LEN)
}

/// A fresh room code for the "create room" button in the lobby.
pub fn generate_room_code() -> String {
    random_string(CODE_ALPHABET, ROOM_CODE_LEN)
}

/// Normalizes a typed or pasted room code the way the lobby input does.
pub fn normalize_room_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_has_wire_length() {
        let id = generate_player_id();
        assert_eq!(id.len(), PLAYER_ID_LEN);
        assert!(id.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn room_code_is_uppercase_alphanumeric() {
        let code = generate_room_code();
        assert_eq!(code.len(), ROOM_CODE_LEN);
        assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn normalization_uppercases_and_trims() {
        assert_eq!(normalize_room_code(" abc123 "), "ABC123");
    }
}
