// ── Reactive data store ──
//
// Snapshot storage with push-based change notification.

mod data_store;
mod refresh;

pub use data_store::DataStore;
pub use refresh::RefreshSnapshot;
