//! Event-loop turn notifications.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::trace;

/// Callback run at a turn boundary.
pub type TurnListener = Arc<dyn Fn() + Send + Sync>;

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Source of turn-boundary notifications.
///
/// Start listeners run when execution resumes after the loop was idle;
/// idle listeners run when no work is left and the loop is about to yield.
/// Both run synchronously at the boundary.
pub trait TurnNotifier: Send + Sync {
    /// Subscribe to turn starts.
    fn on_turn_start(&self, listener: TurnListener) -> SubscriptionId;

    /// Subscribe to turns going idle.
    fn on_turn_idle(&self, listener: TurnListener) -> SubscriptionId;

    /// Detach a subscription. Returns `false` if it was not attached.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Default)]
struct Listeners {
    start: Vec<(SubscriptionId, TurnListener)>,
    idle: Vec<(SubscriptionId, TurnListener)>,
}

struct ZoneState {
    listeners: Mutex<Listeners>,
    active: AtomicUsize,
    completed: AtomicU64,
    next_id: AtomicU64,
}

/// Tracks turns of work and emits their boundaries.
///
/// A turn starts when the number of active entries goes from zero to one and
/// goes idle when it returns to zero, so nested or overlapping entries only
/// produce the outermost boundaries.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use memocache::{TurnNotifier, TurnZone};
///
/// let zone = TurnZone::new();
/// let starts = Arc::new(AtomicUsize::new(0));
/// let counter = starts.clone();
/// zone.on_turn_start(Arc::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// zone.run(|| zone.run(|| ()));
/// assert_eq!(starts.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct TurnZone {
    state: Arc<ZoneState>,
}

impl TurnZone {
    /// Create an idle zone with no subscribers.
    pub fn new() -> Self {
        Self {
            state: Arc::new(ZoneState {
                listeners: Mutex::new(Listeners::default()),
                active: AtomicUsize::new(0),
                completed: AtomicU64::new(0),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Enter the zone. The turn ends when every guard has been dropped.
    ///
    /// The guard exists before start listeners run, so a panicking listener
    /// still closes the turn while unwinding.
    pub fn enter(&self) -> TurnGuard {
        let first = self.state.active.fetch_add(1, Ordering::SeqCst) == 0;
        let guard = TurnGuard { zone: self.clone() };
        if first {
            trace!("Turn started");
            self.emit(|listeners| &listeners.start);
        }
        guard
    }

    /// Run `f` inside a turn.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }

    /// Await `future` inside a turn that spans all of its suspensions.
    pub async fn run_async<F: Future>(&self, future: F) -> F::Output {
        let _guard = self.enter();
        future.await
    }

    /// Whether a turn is in progress.
    pub fn is_in_turn(&self) -> bool {
        self.state.active.load(Ordering::SeqCst) > 0
    }

    /// Number of turns that have gone idle.
    pub fn turn_count(&self) -> u64 {
        self.state.completed.load(Ordering::SeqCst)
    }

    fn leave(&self) {
        if self.state.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.completed.fetch_add(1, Ordering::SeqCst);
            trace!("Turn idle");
            self.emit(|listeners| &listeners.idle);
        }
    }

    // Listeners run outside the lock so they may subscribe or unsubscribe.
    fn emit(&self, select: impl Fn(&Listeners) -> &Vec<(SubscriptionId, TurnListener)>) {
        let snapshot: Vec<TurnListener> = {
            let listeners = self.state.listeners.lock();
            select(&*listeners).iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in snapshot {
            listener();
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.state.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl TurnNotifier for TurnZone {
    fn on_turn_start(&self, listener: TurnListener) -> SubscriptionId {
        let id = self.next_id();
        self.state.listeners.lock().start.push((id, listener));
        id
    }

    fn on_turn_idle(&self, listener: TurnListener) -> SubscriptionId {
        let id = self.next_id();
        self.state.listeners.lock().idle.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.state.listeners.lock();
        let before = listeners.start.len() + listeners.idle.len();
        listeners.start.retain(|(sub, _)| *sub != id);
        listeners.idle.retain(|(sub, _)| *sub != id);
        before != listeners.start.len() + listeners.idle.len()
    }
}

impl Default for TurnZone {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TurnZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.state.listeners.lock();
        f.debug_struct("TurnZone")
            .field("active", &self.state.active.load(Ordering::SeqCst))
            .field("turns", &self.turn_count())
            .field("start_listeners", &listeners.start.len())
            .field("idle_listeners", &listeners.idle.len())
            .finish()
    }
}

/// Keeps a turn open until dropped.
#[must_use = "the turn ends as soon as the guard is dropped"]
pub struct TurnGuard {
    zone: TurnZone,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.zone.leave();
    }
}
