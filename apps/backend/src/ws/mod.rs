//! Realtime layer: session actors, the per-game hub, and store watchers.

pub mod hub;
pub mod protocol;
pub mod session;
pub mod watcher;
