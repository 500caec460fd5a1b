//! Visit code generation and normalization.
//!
//! A visit code is the human-shareable token printed in the QR pass and read
//! out at the gate: `VIS` followed by nine upper-case base-36 characters.

use rand::Rng;

pub const CODE_PREFIX: &str = "VIS";

/// Number of random characters after [`CODE_PREFIX`].
pub const CODE_RANDOM_LENGTH: usize = 9;

/// How many fresh codes to try when an insert collides on the unique index.
pub const MAX_CODE_ATTEMPTS: usize = 5;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a new random visit code.
pub fn generate_visit_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_RANDOM_LENGTH)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    format!("{CODE_PREFIX}{suffix}")
}

/// Trim a submitted code. Returns `None` when nothing usable is left.
///
/// Matching stays exact (case-sensitive) after trimming. A code containing
/// NUL can never match a stored one.
pub fn normalize_code(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty() && !trimmed.contains('\0')).then_some(trimmed)
}
