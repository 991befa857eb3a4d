use rand::rngs::OsRng;
use rand::RngCore;

/// Characters a short id is drawn from
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default short id length
pub const DEFAULT_ID_LENGTH: usize = 6;

/// Draws `length` bytes from the OS CSPRNG and maps each onto [`ALPHABET`].
///
/// The byte is reduced modulo 62, so the first eight characters are
/// slightly more likely than the rest.
pub fn generate_short_id(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    bytes_to_id(&bytes)
}

fn bytes_to_id(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

/// True if `id` is non-empty and made only of [`ALPHABET`] characters
pub fn is_valid_short_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
