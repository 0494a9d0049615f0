//! Allowed-character validation for fields embedded in command templates.
//!
//! The generated `ssh` command is plain string substitution, so every
//! untrusted field that lands in it is checked against a strict character
//! set first. Ports are typed `u16` end to end and need no checks here.

use thiserror::Error;

/// A request field rejected before reaching the command template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} contains disallowed character {found:?}")]
    DisallowedCharacter { field: &'static str, found: char },
}

fn check(field: &'static str, value: &str, allow: fn(char) -> bool) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    match value.chars().find(|&c| !allow(c)) {
        Some(found) => Err(ValidationError::DisallowedCharacter { field, found }),
        None => Ok(()),
    }
}

/// Validate a hostname or address field: alphanumeric plus `.`, `-`, `_`,
/// and `:` (IPv6 literals).
pub fn validate_host(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check(field, value, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')
    })
}

/// Validate an SSH login name: alphanumeric plus `.`, `-`, `_`.
pub fn validate_user(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check(field, value, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
    })
}

/// Validate a config display name: the host set plus spaces.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check(field, value, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_hosts_and_users() {
        assert!(validate_host("sshHost", "db.internal").is_ok());
        assert!(validate_host("sshHost", "1.2.3.4").is_ok());
        assert!(validate_host("sshHost", "fe80::1").is_ok());
        assert!(validate_user("sshUser", "alice_2").is_ok());
        assert!(validate_name("name", "Port Forward 3").is_ok());
    }

    #[test]
    fn rejects_shell_metacharacters() {
        for bad in ["host; rm -rf /", "host$(id)", "host&", "a b", "`x`"] {
            assert!(validate_host("sshHost", bad).is_err(), "accepted {bad:?}");
        }
        assert_eq!(
            validate_user("sshUser", "alice bob"),
            Err(ValidationError::DisallowedCharacter { field: "sshUser", found: ' ' })
        );
    }

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(validate_host("sshHost", ""), Err(ValidationError::Empty("sshHost")));
    }
}
