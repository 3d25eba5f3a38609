//! Per-user, per-action cooldowns.
//!
//! [`CooldownGuard::check`] reads and writes the record map under a single
//! mutex guard, so two concurrent checks for the same key can never both be
//! allowed. The guard is never held across an `.await`.
//!
//! Memory is bounded: once `max_entries` records exist, expired records are
//! purged, and if that is not enough the record closest to expiry is evicted.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, trace};

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// Invocation permitted; the current time has been recorded
    Allowed,
    /// Invocation refused
    Denied {
        /// Time left until the window elapses
        remaining: Duration,
    },
}

impl CooldownDecision {
    /// True for [`CooldownDecision::Allowed`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Whole seconds left, rounded up so a user is never told "0 seconds".
#[must_use]
pub fn remaining_secs(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CooldownKey {
    actor_id: u64,
    action: String,
}

#[derive(Debug, Clone, Copy)]
struct CooldownRecord {
    last_permitted: Instant,
    window: Duration,
}

impl CooldownRecord {
    fn expires_at(&self) -> Instant {
        self.last_permitted + self.window
    }
}

/// In-memory cooldown tracker keyed by (actor, action).
#[derive(Debug)]
pub struct CooldownGuard {
    records: Mutex<HashMap<CooldownKey, CooldownRecord>>,
    max_entries: usize,
}

impl CooldownGuard {
    /// Creates a guard holding at most `max_entries` records (minimum 1).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CooldownKey, CooldownRecord>> {
        // A panic elsewhere cannot leave the map half-updated
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks whether `actor_id` may invoke `action_key` now and, if so, records
    /// the invocation.
    ///
    /// Denied checks leave the stored timestamp untouched, so repeated attempts
    /// do not extend the window. A zero window always allows and records nothing.
    pub fn check(&self, actor_id: u64, action_key: &str, window: Duration) -> CooldownDecision {
        if window.is_zero() {
            return CooldownDecision::Allowed;
        }

        let now = Instant::now();
        let key = CooldownKey {
            actor_id,
            action: action_key.to_string(),
        };

        let mut records = self.lock();
        let existing = records.get(&key).copied();
        match existing {
            Some(record) => {
                let elapsed = now.saturating_duration_since(record.last_permitted);
                if elapsed < window {
                    let remaining = window - elapsed;
                    trace!(actor_id, action = action_key, ?remaining, "Cooldown active");
                    return CooldownDecision::Denied { remaining };
                }
            }
            None if records.len() >= self.max_entries => {
                Self::make_room(&mut records, now, self.max_entries);
            }
            None => {}
        }

        records.insert(
            key,
            CooldownRecord {
                last_permitted: now,
                window,
            },
        );
        CooldownDecision::Allowed
    }

    fn make_room(
        records: &mut HashMap<CooldownKey, CooldownRecord>,
        now: Instant,
        max_entries: usize,
    ) {
        let before = records.len();
        records.retain(|_, record| record.expires_at() > now);

        if records.len() >= max_entries {
            let soonest = records
                .iter()
                .min_by_key(|(_, record)| record.expires_at())
                .map(|(key, _)| key.clone());
            if let Some(key) = soonest {
                records.remove(&key);
            }
        }
        debug!(
            evicted = before - records.len(),
            remaining = records.len(),
            "Cooldown map at capacity"
        );
    }

    /// Drops every record whose window has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| record.expires_at() > now);
        before - records.len()
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no record is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Spawns a background task purging expired records every `interval`.
    ///
    /// The task holds only a weak reference and stops once the guard is dropped.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let guard: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(guard) = guard.upgrade() else {
                    break;
                };
                let purged = guard.purge_expired();
                if purged > 0 {
                    debug!(purged, "Purged expired cooldown records");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const WINDOW: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_first_check_allowed_second_denied() {
        let guard = CooldownGuard::new(16);
        assert_eq!(guard.check(1, "settings:toggle-tickets", WINDOW), CooldownDecision::Allowed);

        match guard.check(1, "settings:toggle-tickets", WINDOW) {
            CooldownDecision::Denied { remaining } => assert_eq!(remaining, WINDOW),
            CooldownDecision::Allowed => panic!("second check should be denied"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_allowed_again_after_window() {
        let guard = CooldownGuard::new(16);
        assert!(guard.check(1, "ticket:open", WINDOW).is_allowed());

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(
            guard.check(1, "ticket:open", WINDOW),
            CooldownDecision::Denied {
                remaining: Duration::from_secs(25)
            }
        );

        tokio::time::advance(Duration::from_secs(25)).await;
        assert!(guard.check(1, "ticket:open", WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_attempts_do_not_reset_window() {
        let guard = CooldownGuard::new(16);
        assert!(guard.check(1, "ticket:open", WINDOW).is_allowed());

        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(9)).await;
            assert!(!guard.check(1, "ticket:open", WINDOW).is_allowed());
        }
        // 27s elapsed since the permitted call, not since the last denial
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(guard.check(1, "ticket:open", WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let guard = CooldownGuard::new(16);
        assert!(guard.check(1, "ticket:open", WINDOW).is_allowed());
        assert!(guard.check(2, "ticket:open", WINDOW).is_allowed());
        assert!(guard.check(1, "clan:create", WINDOW).is_allowed());
        assert_eq!(guard.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_window_never_records() {
        let guard = CooldownGuard::new(16);
        assert!(guard.check(1, "settings:toggle-logs", Duration::ZERO).is_allowed());
        assert!(guard.check(1, "settings:toggle-logs", Duration::ZERO).is_allowed());
        assert!(guard.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_yield_single_allowed() {
        let guard = Arc::new(CooldownGuard::new(1024));
        let barrier = Arc::new(tokio::sync::Barrier::new(32));

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let guard = Arc::clone(&guard);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    guard.check(7, "clan-invite:accept", WINDOW).is_allowed()
                })
            })
            .collect();

        let mut allowed = 0;
        for task in tasks {
            if task.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_is_bounded() {
        let guard = CooldownGuard::new(4);
        for actor in 0..10 {
            assert!(guard.check(actor, "ticket:open", WINDOW).is_allowed());
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        assert_eq!(guard.len(), 4);

        // The most recent actor is still throttled; the oldest was evicted
        assert!(!guard.check(9, "ticket:open", WINDOW).is_allowed());
        assert!(guard.check(0, "ticket:open", WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_map_prefers_evicting_expired_records() {
        let guard = CooldownGuard::new(3);
        assert!(guard.check(1, "short", Duration::from_secs(1)).is_allowed());
        assert!(guard.check(2, "long", Duration::from_secs(600)).is_allowed());
        assert!(guard.check(3, "long", Duration::from_secs(600)).is_allowed());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(guard.check(4, "long", Duration::from_secs(600)).is_allowed());

        assert_eq!(guard.len(), 3);
        assert!(!guard.check(2, "long", Duration::from_secs(600)).is_allowed());
        assert!(!guard.check(3, "long", Duration::from_secs(600)).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let guard = CooldownGuard::new(16);
        assert!(guard.check(1, "a", Duration::from_secs(5)).is_allowed());
        assert!(guard.check(1, "b", Duration::from_secs(60)).is_allowed());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(guard.purge_expired(), 1);
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_remaining_secs_rounds_up() {
        assert_eq!(remaining_secs(Duration::from_secs(25)), 25);
        assert_eq!(remaining_secs(Duration::from_millis(24_100)), 25);
        assert_eq!(remaining_secs(Duration::from_millis(1)), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_expired_and_stops_with_guard() {
        let guard = Arc::new(CooldownGuard::new(16));
        assert!(
            guard
                .check(1, "clan-invite:accept", Duration::from_secs(5))
                .is_allowed()
        );
        let sweeper = guard.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(guard.len(), 0);

        drop(guard);
        let finished = tokio::time::timeout(Duration::from_secs(30), sweeper).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}
