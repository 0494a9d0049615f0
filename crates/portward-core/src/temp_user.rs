//! Temporary-user records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A provisioned temporary account, paired 1:1 with an OS user of the same
/// name.
///
/// The password is stored and listed in plaintext; that is the documented
/// contract of the temp-users API, not an oversight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempUser {
    pub username: String,
    pub password: String,
    pub created: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ssh_host: String,
    pub ssh_port: u16,
}

impl TempUser {
    /// Build a record expiring `expires_hours` from now.
    ///
    /// Returns `None` when the expiry does not fit the representable
    /// timestamp range.
    pub fn new(
        username: String,
        password: String,
        expires_hours: i64,
        ssh_host: String,
        ssh_port: u16,
    ) -> Option<Self> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(expires_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))?;
        Some(Self {
            username,
            password,
            created: now,
            expires_at,
            ssh_host,
            ssh_port,
        })
    }

    /// Whether this record is due for eviction at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::unwrap_used)]
    fn user(expires_hours: i64) -> TempUser {
        TempUser::new(
            "temp_0a1b2c3d".to_string(),
            "hunter2hunter2xx".to_string(),
            expires_hours,
            "vps.example.net".to_string(),
            22,
        )
        .unwrap()
    }

    #[test]
    fn expires_after_created() {
        let u = user(24);
        assert!(u.expires_at > u.created);
        assert!(!u.is_expired(Utc::now()));
    }

    #[test]
    fn zero_hours_expires_immediately() {
        assert!(user(0).is_expired(Utc::now()));
    }

    #[test]
    fn out_of_range_expiry_is_rejected() {
        for hours in [10_000_000_000_000_000, i64::MAX, i64::MIN] {
            let built = TempUser::new(
                "temp_0a1b2c3d".to_string(),
                "hunter2hunter2xx".to_string(),
                hours,
                "vps.example.net".to_string(),
                22,
            );
            assert!(built.is_none(), "accepted {hours} hours");
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(user(24)).unwrap();
        assert!(value.get("expiresAt").is_some());
        assert!(value.get("sshHost").is_some());
        assert_eq!(value["sshPort"], 22);
    }
}
