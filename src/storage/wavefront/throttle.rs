use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Tracks when each container was last flushed and gates further flushes.
///
/// The check and the update happen under the map's per-key lock, so two
/// concurrent calls for the same container cannot both pass within one window.
#[derive(Debug, Default)]
pub struct FlushThrottle {
    interval: Duration,
    last_flush: DashMap<String, SystemTime>,
    /// Unix seconds of the last idle sweep, 0 if none.
    last_prune: AtomicU64,
}

impl FlushThrottle {
    /// Creates a throttle that allows one flush per container every `interval`.
    ///
    /// An interval of zero disables throttling.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_flush: DashMap::new(),
            last_prune: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` if `container` is due for a flush at `now` and records `now`
    /// as its last flush time.
    ///
    /// A container that was never flushed is always due. Returns `false` without
    /// touching the state if less than the interval has elapsed.
    pub fn should_flush(&self, container: &str, now: SystemTime) -> bool {
        match self.last_flush.entry(container.to_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
            Entry::Occupied(mut entry) => {
                let last = *entry.get();
                // a clock that went backwards counts as no time elapsed
                let elapsed = now.duration_since(last).unwrap_or(Duration::ZERO);
                if elapsed < self.interval {
                    return false;
                }
                entry.insert(now.max(last));
                true
            }
        }
    }

    /// Returns the last flush time recorded for `container`.
    pub fn last_flush(&self, container: &str) -> Option<SystemTime> {
        self.last_flush.get(container).map(|entry| *entry)
    }

    /// Forgets containers whose last flush is more than `max_idle` before `now`.
    pub fn prune_idle(&self, now: SystemTime, max_idle: Duration) {
        self.last_flush.retain(|container, last| {
            let keep = now
                .duration_since(*last)
                .map_or(true, |idle| idle <= max_idle);
            if !keep {
                log::debug!("forgetting idle container `{}`", container);
            }
            keep
        });
    }

    /// Like [`FlushThrottle::prune_idle`], but sweeps at most once per `max_idle`.
    ///
    /// Returns `true` if this call swept the state. Concurrent callers race for the
    /// sweep; only one of them performs it.
    pub fn prune_idle_at_most_every(&self, now: SystemTime, max_idle: Duration) -> bool {
        let now_secs = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let last = self.last_prune.load(Ordering::Acquire);
        if last != 0 && now_secs.saturating_sub(last) < max_idle.as_secs() {
            return false;
        }
        if self
            .last_prune
            .compare_exchange(last, now_secs.max(1), Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.prune_idle(now, max_idle);
        true
    }

    /// Number of containers with a recorded flush.
    pub fn len(&self) -> usize {
        self.last_flush.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_flush.is_empty()
    }
}
