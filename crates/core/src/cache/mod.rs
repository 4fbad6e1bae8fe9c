//! Module name cache.
//!
//! Lines are keyed by root identity and never removed; a stale line is
//! replaced by the next successful resolution of its root.

mod line;
mod store;

pub use line::{CacheLine, CacheRead, LineKind, Subscription};
pub use store::CacheStore;
