//! Turn-scoped caching.
//!
//! A [`TurnNotifier`] reports when the event loop becomes active and when it
//! goes idle. [`ZoneCache`] clears itself at both points, giving memoized
//! values a lifetime of exactly one turn.
//!
//! ```text
//!   idle ── turn start ──> [ cache writes visible ] ── turn idle ──> idle
//!             clear()                                   clear()
//! ```

mod cache;
mod turn;

pub use cache::ZoneCache;
pub use turn::{SubscriptionId, TurnGuard, TurnListener, TurnNotifier, TurnZone};
