//! Fixed-window request counter.

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use dashmap::{DashMap, mapref::entry::Entry as MapEntry};
use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::rate_limit::clock::{Clock, SystemClock};

/// Request budget for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: NonZeroU32,
    pub window: Duration,
}

impl RateLimitPolicy {
    #[must_use]
    pub const fn new(max_requests: NonZeroU32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Outcome of a single [`RateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request must be rejected.
    pub limited: bool,

    /// Maximum requests allowed in the window.
    pub limit: u32,

    /// Requests left in the current window after this one.
    pub remaining: u32,

    /// When the current window closes.
    pub reset_at: Timestamp,

    /// Time until the window closes, measured when the decision was made.
    pub retry_after: Duration,
}

impl RateLimitDecision {
    fn new(limited: bool, limit: u32, count: u32, reset_at: Timestamp, now: Timestamp) -> Self {
        let retry_after = Duration::try_from(reset_at.duration_since(now)).unwrap_or_default();

        Self {
            limited,
            limit,
            remaining: limit.saturating_sub(count),
            reset_at,
            retry_after,
        }
    }

    /// Seconds until retrying makes sense, rounded up so clients never retry early.
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();

        if self.retry_after.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        }
    }
}

/// Read-only view of an identifier's open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub count: u32,
    pub reset_at: Timestamp,
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Timestamp,
}

impl WindowEntry {
    fn open(now: Timestamp, window: Duration) -> Self {
        let reset_at = SignedDuration::try_from(window)
            .ok()
            .and_then(|window| now.checked_add(window).ok())
            .unwrap_or(Timestamp::MAX);

        Self { count: 1, reset_at }
    }

    fn is_open(&self, now: Timestamp) -> bool {
        self.reset_at > now
    }
}

/// A named, process-local fixed-window limiter.
///
/// Each identifier gets its own counter. The read-modify-write for one identifier happens under
/// the map's shard lock, so concurrent checks against the same key are serialised and can never
/// admit more than `max_requests` per window.
#[derive(Debug)]
pub struct RateLimiter {
    name: &'static str,
    policy: RateLimitPolicy,
    entries: DashMap<String, WindowEntry, FxBuildHasher>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(name: &'static str, policy: RateLimitPolicy) -> Self {
        Self::with_clock(name, policy, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(name: &'static str, policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            policy,
            entries: DashMap::with_hasher(FxBuildHasher),
            clock,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Count a request against this limiter's configured policy.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        self.check_with(identifier, self.policy.max_requests, self.policy.window)
    }

    /// Count a request for `identifier` against an explicit budget.
    ///
    /// A rejected request is not counted.
    pub fn check_with(
        &self,
        identifier: &str,
        max_requests: NonZeroU32,
        window: Duration,
    ) -> RateLimitDecision {
        let now = self.clock.now();
        let limit = max_requests.get();

        let entry = match self.entries.entry(identifier.to_owned()) {
            MapEntry::Occupied(mut occupied) if occupied.get().is_open(now) => {
                let entry = occupied.get_mut();

                if entry.count >= limit {
                    debug!(limiter = self.name, "rate limit exceeded");

                    return RateLimitDecision::new(true, limit, limit, entry.reset_at, now);
                }

                entry.count += 1;

                *entry
            }
            MapEntry::Occupied(mut occupied) => {
                let fresh = WindowEntry::open(now, window);

                occupied.insert(fresh);

                fresh
            }
            MapEntry::Vacant(vacant) => {
                let fresh = WindowEntry::open(now, window);

                vacant.insert(fresh);

                fresh
            }
        };

        RateLimitDecision::new(false, limit, entry.count, entry.reset_at, now)
    }

    /// Forget an identifier. Returns `true` when it had an entry.
    pub fn reset(&self, identifier: &str) -> bool {
        self.entries.remove(identifier).is_some()
    }

    /// Peek at an identifier without counting a request. Expired entries are evicted.
    pub fn status(&self, identifier: &str) -> Option<RateLimitStatus> {
        let now = self.clock.now();
        let entry = self.entries.get(identifier).map(|entry| *entry.value())?;

        if !entry.is_open(now) {
            self.entries
                .remove_if(identifier, |_, entry| !entry.is_open(now));

            return None;
        }

        Some(RateLimitStatus {
            count: entry.count,
            reset_at: entry.reset_at,
        })
    }

    /// Drop every entry whose window has closed, returning how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = entry.is_open(now);

            if !keep {
                removed += 1;
            }

            keep
        });

        removed
    }

    /// Number of identifiers currently tracked, including expired ones not yet swept.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use testresult::TestResult;

    use crate::rate_limit::ManualClock;

    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    fn start() -> Timestamp {
        Timestamp::from_second(1_760_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    fn limiter(max: u32, window: Duration) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let policy = RateLimitPolicy::new(NonZeroU32::new(max).unwrap_or(NonZeroU32::MIN), window);

        (
            RateLimiter::with_clock("test", policy, clock.clone()),
            clock,
        )
    }

    #[test]
    fn first_request_opens_window() -> TestResult {
        let (limiter, _clock) = limiter(3, MINUTE);

        let decision = limiter.check("ip:1.2.3.4");

        assert!(!decision.limited);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.limit, 3);
        assert_eq!(decision.reset_at, start().checked_add(SignedDuration::from_secs(60))?);

        Ok(())
    }

    #[test]
    fn remaining_counts_down_then_limits() {
        let (limiter, _clock) = limiter(3, MINUTE);

        let remaining: Vec<u32> = (0..3).map(|_| limiter.check("k").remaining).collect();
        let fourth = limiter.check("k");

        assert_eq!(remaining, vec![2, 1, 0]);
        assert!(fourth.limited, "fourth request should be limited");
        assert_eq!(fourth.remaining, 0);
    }

    #[test]
    fn rejected_requests_are_not_counted() {
        let (limiter, _clock) = limiter(2, MINUTE);

        for _ in 0..5 {
            limiter.check("k");
        }

        assert_eq!(limiter.status("k").map(|status| status.count), Some(2));
    }

    #[test]
    fn limited_decision_reports_time_until_reset() {
        let (limiter, clock) = limiter(1, MINUTE);

        limiter.check("k");
        clock.advance(Duration::from_millis(20_500));

        let decision = limiter.check("k");

        assert!(decision.limited);
        assert_eq!(decision.retry_after, Duration::from_millis(39_500));
        assert_eq!(decision.retry_after_secs(), 40, "should round up");
    }

    #[test]
    fn expired_window_starts_over() {
        let (limiter, clock) = limiter(2, MINUTE);

        limiter.check("k");
        limiter.check("k");
        assert!(limiter.check("k").limited);

        clock.advance(MINUTE);

        let decision = limiter.check("k");

        assert!(!decision.limited, "new window should admit");
        assert_eq!(decision.remaining, 1);
        assert_eq!(
            decision.reset_at.as_millisecond(),
            start().as_millisecond() + 120_000
        );
    }

    #[test]
    fn reset_forgets_identifier() {
        let (limiter, _clock) = limiter(1, MINUTE);

        limiter.check("k");
        assert!(limiter.check("k").limited);

        assert!(limiter.reset("k"));
        assert!(!limiter.reset("k"), "second reset has nothing to remove");

        let decision = limiter.check("k");

        assert!(!decision.limited);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn identifiers_do_not_interact() {
        let (limiter, _clock) = limiter(1, MINUTE);

        assert!(!limiter.check("ip:a").limited);
        assert!(!limiter.check("ip:b").limited);
        assert!(limiter.check("ip:a").limited);
    }

    #[test]
    fn status_is_read_only() {
        let (limiter, _clock) = limiter(5, MINUTE);

        assert!(limiter.status("k").is_none());

        limiter.check("k");

        let before = limiter.status("k");
        let after = limiter.status("k");

        assert_eq!(before.map(|status| status.count), Some(1));
        assert_eq!(before, after);
    }

    #[test]
    fn status_evicts_expired_entries() {
        let (limiter, clock) = limiter(5, MINUTE);

        limiter.check("k");
        clock.advance(Duration::from_secs(61));

        assert!(limiter.status("k").is_none());
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn sweep_removes_only_closed_windows() {
        let (limiter, clock) = limiter(5, MINUTE);

        limiter.check("old");
        clock.advance(Duration::from_secs(30));
        limiter.check("new");
        clock.advance(Duration::from_secs(31));

        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked(), 1);
        assert!(limiter.status("new").is_some());
    }

    #[test]
    fn check_with_uses_explicit_budget() {
        let (limiter, _clock) = limiter(100, MINUTE);
        let two = NonZeroU32::new(2).unwrap_or(NonZeroU32::MIN);

        limiter.check_with("k", two, MINUTE);
        limiter.check_with("k", two, MINUTE);

        assert!(limiter.check_with("k", two, MINUTE).limited);
    }

    #[test]
    fn concurrent_checks_never_exceed_budget() {
        let (limiter, _clock) = limiter(50, MINUTE);

        let admitted: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        (0..20)
                            .filter(|_| !limiter.check("shared").limited)
                            .count()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_default())
                .sum()
        });

        assert_eq!(admitted, 50, "exactly the budget should be admitted");
        assert_eq!(limiter.status("shared").map(|status| status.count), Some(50));
    }
}
