//! Named one-shot timers with replace-on-rearm semantics.
//!
//! Each [`TimerKey`] has at most one pending timer. Arming a key that is
//! already pending cancels the old timer, so only the latest action can
//! fire. Firings are delivered as [`Fired`] values and must be passed back
//! through [`Scheduler::claim`], which drops any firing whose generation was
//! superseded between expiry and delivery.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Quiet period after an edit to one document before re-classifying it.
    ChangeDebounce(PathBuf),
    /// Delay between a detected resolution and the automatic move.
    AutoJump,
}

impl TimerKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKey::ChangeDebounce(_) => "change_debounce",
            TimerKey::AutoJump => "auto_jump",
        }
    }
}

/// An expired timer, delivered back to the owner of the scheduler.
#[derive(Debug)]
pub struct Fired<A> {
    pub key: TimerKey,
    pub generation: u64,
    pub action: A,
}

pub trait Scheduler<A>: Send {
    /// Arm `key` to deliver `action` after `delay`, replacing any pending timer.
    fn schedule(&mut self, key: TimerKey, delay: Duration, action: A);

    /// Cancel the pending timer for `key`. Returns whether one was pending.
    fn cancel(&mut self, key: &TimerKey) -> bool;

    fn cancel_all(&mut self);

    /// Whether `key` is armed and its firing has not been claimed yet.
    fn is_pending(&self, key: &TimerKey) -> bool;

    /// Accept a delivered firing. Returns the action only if the firing is
    /// still the current one for its key.
    fn claim(&mut self, fired: Fired<A>) -> Option<A>;
}

/// Timers backed by spawned `tokio::time::sleep` tasks.
///
/// Expired timers are sent on the channel returned by [`TokioScheduler::new`];
/// the receiving task is expected to hand them to [`Scheduler::claim`].
pub struct TokioScheduler<A> {
    tx: mpsc::UnboundedSender<Fired<A>>,
    pending: HashMap<TimerKey, (u64, JoinHandle<()>)>,
    next_generation: u64,
}

impl<A: Send + 'static> TokioScheduler<A> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired<A>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            pending: HashMap::new(),
            next_generation: 0,
        };
        (scheduler, rx)
    }
}

impl<A: Send + 'static> Scheduler<A> for TokioScheduler<A> {
    fn schedule(&mut self, key: TimerKey, delay: Duration, action: A) {
        self.cancel(&key);
        self.next_generation += 1;
        let generation = self.next_generation;
        let tx = self.tx.clone();
        let fired_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The owner may have shut down; nothing to deliver to then.
            let _ = tx.send(Fired {
                key: fired_key,
                generation,
                action,
            });
        });
        tracing::trace!(key = key.as_str(), generation, ?delay, "timer armed");
        self.pending.insert(key, (generation, handle));
    }

    fn cancel(&mut self, key: &TimerKey) -> bool {
        match self.pending.remove(key) {
            Some((generation, handle)) => {
                handle.abort();
                tracing::trace!(key = key.as_str(), generation, "timer cancelled");
                true
            }
            None => false,
        }
    }

    fn cancel_all(&mut self) {
        for (_, (_, handle)) in self.pending.drain() {
            handle.abort();
        }
    }

    fn is_pending(&self, key: &TimerKey) -> bool {
        self.pending.contains_key(key)
    }

    fn claim(&mut self, fired: Fired<A>) -> Option<A> {
        match self.pending.get(&fired.key) {
            Some((generation, _)) if *generation == fired.generation => {
                self.pending.remove(&fired.key);
                Some(fired.action)
            }
            _ => {
                tracing::debug!(
                    key = fired.key.as_str(),
                    generation = fired.generation,
                    "discarding superseded timer"
                );
                None
            }
        }
    }
}

impl<A> Drop for TokioScheduler<A> {
    fn drop(&mut self) {
        for (_, (_, handle)) in self.pending.drain() {
            handle.abort();
        }
    }
}

struct VirtualTimer<A> {
    generation: u64,
    deadline: Duration,
    /// Taken when the timer fires; the entry stays until claimed.
    action: Option<A>,
}

/// Deterministic scheduler driven by an explicit clock.
///
/// Nothing fires until [`VirtualScheduler::advance`] moves the clock past a
/// deadline.
pub struct VirtualScheduler<A> {
    now: Duration,
    next_generation: u64,
    timers: HashMap<TimerKey, VirtualTimer<A>>,
}

impl<A> Default for VirtualScheduler<A> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_generation: 0,
            timers: HashMap::new(),
        }
    }
}

impl<A> VirtualScheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return every timer that expired, in
    /// deadline order.
    pub fn advance(&mut self, delta: Duration) -> Vec<Fired<A>> {
        self.now += delta;
        let now = self.now;

        let mut due: Vec<(Duration, u64, TimerKey)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.action.is_some() && t.deadline <= now)
            .map(|(key, t)| (t.deadline, t.generation, key.clone()))
            .collect();
        due.sort_by_key(|(deadline, generation, _)| (*deadline, *generation));

        due.into_iter()
            .filter_map(|(_, generation, key)| {
                let timer = self.timers.get_mut(&key)?;
                timer.action.take().map(|action| Fired {
                    key,
                    generation,
                    action,
                })
            })
            .collect()
    }
}

impl<A: Send> Scheduler<A> for VirtualScheduler<A> {
    fn schedule(&mut self, key: TimerKey, delay: Duration, action: A) {
        self.next_generation += 1;
        self.timers.insert(
            key,
            VirtualTimer {
                generation: self.next_generation,
                deadline: self.now + delay,
                action: Some(action),
            },
        );
    }

    fn cancel(&mut self, key: &TimerKey) -> bool {
        self.timers.remove(key).is_some()
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
    }

    fn is_pending(&self, key: &TimerKey) -> bool {
        self.timers.contains_key(key)
    }

    fn claim(&mut self, fired: Fired<A>) -> Option<A> {
        match self.timers.get(&fired.key) {
            Some(t) if t.generation == fired.generation => {
                self.timers.remove(&fired.key);
                Some(fired.action)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn debounce(path: &str) -> TimerKey {
        TimerKey::ChangeDebounce(PathBuf::from(path))
    }

    fn claim_all<A: Send>(s: &mut impl Scheduler<A>, fired: Vec<Fired<A>>) -> Vec<A> {
        fired.into_iter().filter_map(|f| s.claim(f)).collect()
    }

    #[test]
    fn test_virtual_fires_after_delay() {
        let mut s = VirtualScheduler::new();
        s.schedule(TimerKey::AutoJump, 100 * MS, "jump");
        assert!(s.advance(99 * MS).is_empty());
        assert!(s.is_pending(&TimerKey::AutoJump));
        let fired = s.advance(MS);
        assert_eq!(claim_all(&mut s, fired), vec!["jump"]);
        assert!(!s.is_pending(&TimerKey::AutoJump));
    }

    #[test]
    fn test_virtual_rearm_replaces_pending() {
        let mut s = VirtualScheduler::new();
        s.schedule(TimerKey::AutoJump, 100 * MS, "first");
        s.advance(50 * MS);
        s.schedule(TimerKey::AutoJump, 100 * MS, "second");
        assert!(s.advance(60 * MS).is_empty());
        let fired = s.advance(40 * MS);
        assert_eq!(claim_all(&mut s, fired), vec!["second"]);
    }

    #[test]
    fn test_virtual_keys_are_independent() {
        let mut s = VirtualScheduler::new();
        s.schedule(debounce("a.txt"), 300 * MS, "debounce");
        s.schedule(TimerKey::AutoJump, 100 * MS, "jump");
        let fired = s.advance(Duration::from_secs(1));
        assert_eq!(claim_all(&mut s, fired), vec!["jump", "debounce"]);
    }

    #[test]
    fn test_virtual_debounce_per_document() {
        let mut s = VirtualScheduler::new();
        s.schedule(debounce("a.txt"), 300 * MS, "a");
        s.schedule(debounce("b.txt"), 300 * MS, "b");
        s.schedule(debounce("a.txt"), 300 * MS, "a2");
        let fired = s.advance(300 * MS);
        let mut actions = claim_all(&mut s, fired);
        actions.sort();
        assert_eq!(actions, vec!["a2", "b"]);
    }

    #[test]
    fn test_virtual_superseded_firing_is_not_claimed() {
        let mut s = VirtualScheduler::new();
        s.schedule(TimerKey::AutoJump, 10 * MS, "old");
        let fired = s.advance(10 * MS);
        // Re-armed after expiry but before the firing was handled.
        s.schedule(TimerKey::AutoJump, 10 * MS, "new");
        assert!(claim_all(&mut s, fired).is_empty());
        let fired = s.advance(10 * MS);
        assert_eq!(claim_all(&mut s, fired), vec!["new"]);
    }

    #[test]
    fn test_virtual_cancel() {
        let mut s = VirtualScheduler::new();
        s.schedule(TimerKey::AutoJump, 10 * MS, "x");
        assert!(s.cancel(&TimerKey::AutoJump));
        assert!(!s.cancel(&TimerKey::AutoJump));
        assert!(s.advance(Duration::from_secs(1)).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_fires_after_delay() {
        let (mut s, mut rx) = TokioScheduler::new();
        s.schedule(TimerKey::AutoJump, Duration::from_millis(2000), 7);
        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.key, TimerKey::AutoJump);
        assert_eq!(s.claim(fired), Some(7));
        assert!(!s.is_pending(&TimerKey::AutoJump));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_rearm_only_latest_fires() {
        let (mut s, mut rx) = TokioScheduler::new();
        s.schedule(TimerKey::AutoJump, Duration::from_millis(100), "first");
        s.schedule(TimerKey::AutoJump, Duration::from_millis(100), "second");

        let fired = rx.recv().await.unwrap();
        assert_eq!(s.claim(fired), Some("second"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_cancel_all_stops_delivery() {
        let (mut s, mut rx) = TokioScheduler::new();
        s.schedule(TimerKey::AutoJump, Duration::from_millis(10), 1);
        s.schedule(debounce("a.txt"), Duration::from_millis(10), 2);
        s.cancel_all();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_stale_generation_is_discarded() {
        let (mut s, mut rx) = TokioScheduler::new();
        s.schedule(debounce("a.txt"), Duration::from_millis(10), "a");
        let stale = rx.recv().await.unwrap();
        s.schedule(debounce("a.txt"), Duration::from_millis(10), "b");
        assert_eq!(s.claim(stale), None);
        let fresh = rx.recv().await.unwrap();
        assert_eq!(s.claim(fresh), Some("b"));
    }
}
