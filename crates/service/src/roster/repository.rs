use async_trait::async_trait;

use super::domain::RosterDocument;
use crate::errors::ServiceError;

/// Whole-document persistence for the roster.
///
/// Every call goes to the backing storage; implementations must not cache the
/// document between calls.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn load(&self) -> Result<RosterDocument, ServiceError>;
    async fn store(&self, roster: &RosterDocument) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryRosterRepository {
        roster: Mutex<RosterDocument>,
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MemoryRosterRepository {
        pub fn with_roster(roster: RosterDocument) -> Self {
            Self { roster: Mutex::new(roster), ..Default::default() }
        }

        /// Number of successful `store` calls so far.
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn snapshot(&self) -> RosterDocument {
            self.roster.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// Make subsequent `store` calls fail with a storage error.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl RosterRepository for MemoryRosterRepository {
        async fn load(&self) -> Result<RosterDocument, ServiceError> {
            Ok(self.snapshot())
        }

        async fn store(&self, roster: &RosterDocument) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::storage("write refused by mock"));
            }
            *self.roster.lock().unwrap_or_else(|e| e.into_inner()) = roster.clone();
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
