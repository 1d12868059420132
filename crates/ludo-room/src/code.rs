//! Room code generation.

use rand::Rng;

use ludo_protocol::RoomCode;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How many distinct codes of `len` characters exist, or `None` when the
/// count overflows `usize`.
pub(crate) fn code_space(len: usize) -> Option<usize> {
    let len = u32::try_from(len).ok()?;
    ALPHABET.len().checked_pow(len)
}

/// Draws a random uppercase alphanumeric code of `len` characters.
///
/// Uniqueness is the registry's job: it redraws while the code is taken
/// by a live room.
pub fn generate_code(len: usize) -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..len)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    RoomCode::from(code)
}
