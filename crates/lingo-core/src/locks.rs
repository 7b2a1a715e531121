use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Per-user async mutexes keyed by user id. Quiz submissions take the
/// user's lock for the duration of the read-modify-write cycle, which
/// serializes concurrent submissions of one user without slowing anyone
/// else down. There is deliberately no global lock.
#[derive(Debug, Clone, Default)]
pub struct UserLocks(Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>);

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock handle for a user; created on first use and shared by all
    /// requests for the same id.
    #[must_use]
    pub fn lock_for(&self, user_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.0.lock().expect("user lock map poisoned");
        Arc::clone(map.entry(user_id).or_default())
    }

    /// Drops the entry of a deleted user.
    pub fn forget(&self, user_id: Uuid) {
        let mut map = self.0.lock().expect("user lock map poisoned");
        map.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_user_shares_a_lock() {
        let locks = UserLocks::new();
        let id = Uuid::new_v4();

        let handle = locks.lock_for(id);
        let _guard = handle.lock().await;

        // The second handle refers to the same mutex, so it cannot be
        // acquired while the guard is held.
        let other = locks.lock_for(id);
        assert!(other.try_lock().is_err());
    }

    #[tokio::test]
    async fn test_different_users_do_not_contend() {
        let locks = UserLocks::new();

        let first = locks.lock_for(Uuid::new_v4());
        let _guard = first.lock().await;

        let second = locks.lock_for(Uuid::new_v4());
        assert!(second.try_lock().is_ok());
    }
}
