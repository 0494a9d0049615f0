//! Lazy eviction of expired temporary users.
//!
//! The sweep runs on every temp-user listing, not on a timer. Listing is
//! therefore a side-effecting read: the surviving set is persisted even
//! when nothing changed, and repeated sweeps with no time elapsed return
//! the same active set.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use portward_core::TempUser;

use crate::provision::AccountProvisioner;
use crate::storage::{FileStore, StorageError};

/// Deprovision and drop expired records, persist the survivors, and return
/// the active set.
///
/// A record whose deprovisioning fails stays persisted (the next sweep
/// retries it) but is still excluded from the returned active set; the
/// failure is logged, never surfaced to the listing caller.
pub async fn sweep_temp_users(
    store: &FileStore,
    provisioner: &dyn AccountProvisioner,
    now: DateTime<Utc>,
) -> Result<Vec<TempUser>, StorageError> {
    let users = store.load_temp_users()?;
    let mut surviving = Vec::with_capacity(users.len());

    for user in users {
        if user.is_expired(now) {
            match provisioner.delete_account(&user.username).await {
                Ok(()) => {
                    info!(username = %user.username, "evicted expired temp user");
                }
                Err(err) => {
                    warn!(
                        username = %user.username,
                        error = %err,
                        "could not deprovision expired temp user; keeping record for next sweep"
                    );
                    surviving.push(user);
                }
            }
        } else {
            surviving.push(user);
        }
    }

    store.save_temp_users(&surviving)?;

    let active = surviving
        .into_iter()
        .filter(|u| !u.is_expired(now))
        .collect();
    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::ProvisionError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records delete calls; optionally fails them all.
    #[derive(Default)]
    struct RecordingProvisioner {
        deleted: Mutex<Vec<String>>,
        fail_deletes: bool,
    }

    #[async_trait]
    impl AccountProvisioner for RecordingProvisioner {
        async fn create_account(&self, _: &str, _: &str) -> Result<(), ProvisionError> {
            Ok(())
        }

        async fn delete_account(&self, username: &str) -> Result<(), ProvisionError> {
            #[allow(clippy::unwrap_used)]
            self.deleted.lock().unwrap().push(username.to_string());
            if self.fail_deletes {
                return Err(ProvisionError::Tool {
                    tool: "userdel",
                    diagnostic: "userdel: permission denied".to_string(),
                });
            }
            Ok(())
        }
    }

    #[allow(clippy::unwrap_used)]
    fn user(name: &str, expires_hours: i64) -> TempUser {
        TempUser::new(
            name.to_string(),
            "S3cretS3cretS3cr".to_string(),
            expires_hours,
            "vps.example.net".to_string(),
            22,
        )
        .unwrap()
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn expired_users_are_deprovisioned_and_dropped() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store
            .save_temp_users(&[user("temp_dead0000", 0), user("temp_a1ive000", 24)])
            .unwrap();

        let provisioner = RecordingProvisioner::default();
        let active = sweep_temp_users(&store, &provisioner, Utc::now()).await.unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].username, "temp_a1ive000");
        assert_eq!(*provisioner.deleted.lock().unwrap(), vec!["temp_dead0000".to_string()]);
        // The store now holds only the survivor.
        assert_eq!(store.load_temp_users().unwrap(), active);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn sweep_is_idempotent_on_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store
            .save_temp_users(&[user("temp_dead0000", 0), user("temp_a1ive000", 24)])
            .unwrap();

        let provisioner = RecordingProvisioner::default();
        let now = Utc::now();
        let first = sweep_temp_users(&store, &provisioner, now).await.unwrap();
        let second = sweep_temp_users(&store, &provisioner, now).await.unwrap();

        assert_eq!(first, second);
        // The expired account was only deleted once.
        assert_eq!(provisioner.deleted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn failed_deprovision_keeps_record_for_retry() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.save_temp_users(&[user("temp_dead0000", 0)]).unwrap();

        let provisioner = RecordingProvisioner { fail_deletes: true, ..Default::default() };
        let active = sweep_temp_users(&store, &provisioner, Utc::now()).await.unwrap();

        // Excluded from the active output but still persisted.
        assert!(active.is_empty());
        assert_eq!(store.load_temp_users().unwrap().len(), 1);

        // Next sweep retries the deletion.
        let _ = sweep_temp_users(&store, &provisioner, Utc::now()).await.unwrap();
        assert_eq!(provisioner.deleted.lock().unwrap().len(), 2);
    }
}
