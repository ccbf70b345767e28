//! Subscriber management-key generation.

use rand::Rng;

/// Number of random bytes per management key. 256 bits keeps the key
/// unguessable; it is a capability token, not a password.
const KEY_BYTES: usize = 32;

/// Generate a fresh management key: 32 random bytes, hex-encoded.
pub fn generate_management_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..KEY_BYTES).map(|_| rng.gen()).collect();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_64_hex_chars() {
        let key = generate_management_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn keys_are_unique() {
        let a = generate_management_key();
        let b = generate_management_key();
        assert_ne!(a, b);
    }
}
