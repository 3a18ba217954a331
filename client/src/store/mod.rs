//! Application state: one snapshot struct owned by [`StateStore`], with
//! subscribe/notify fan-out to anything rendering it.

pub mod state;
pub mod store;

pub use state::{AppState, SubscriberId};
pub use store::StateStore;
