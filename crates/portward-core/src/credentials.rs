//! Random credential generation for temporary accounts.
//!
//! `ThreadRng` is a CSPRNG, so both generators are safe for password
//! material; a non-cryptographic generator must not be substituted here.

use rand::RngExt;

/// Prefix shared by every generated temporary username.
pub const USERNAME_PREFIX: &str = "temp_";

/// Default generated password length.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Characters a generated password may contain.
const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Generate a temporary username: the fixed prefix plus 4 random bytes as
/// lowercase hex.
///
/// Collisions against existing records are not checked; at 32 bits of
/// suffix entropy the probability is negligible for this system's scale.
pub fn generate_username() -> String {
    format!("{USERNAME_PREFIX}{:08x}", rand::rng().random::<u32>())
}

/// Generate a random password of `length` characters, each drawn
/// independently and uniformly from [`PASSWORD_ALPHABET`].
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..PASSWORD_ALPHABET.len());
            PASSWORD_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_has_prefix_and_hex_suffix() {
        let name = generate_username();
        assert_eq!(name.len(), USERNAME_PREFIX.len() + 8);
        let suffix = &name[USERNAME_PREFIX.len()..];
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn password_has_requested_length_and_alphabet() {
        for _ in 0..50 {
            let password = generate_password(DEFAULT_PASSWORD_LENGTH);
            assert_eq!(password.chars().count(), 16);
            assert!(password.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn password_respects_custom_length() {
        assert_eq!(generate_password(0).len(), 0);
        assert_eq!(generate_password(64).len(), 64);
    }
}
