use uuid::Uuid;

use crate::api::models::{Channel, Guild, Log};

/// Unique identifier for a state subscriber.
pub type SubscriberId = Uuid;

/// Snapshot of everything the UI renders.
///
/// The store clones this out to subscribers after every change, so a
/// subscriber always sees a complete, consistent view.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// All known guilds.
    pub guilds: Vec<Guild>,
    /// Channels of the current guild.
    pub channels: Vec<Channel>,
    /// Logs of the current channel, oldest-first.
    pub logs: Vec<Log>,
    pub current_guild: Option<Guild>,
    pub current_channel: Option<Channel>,
    /// True while an operation is in flight.
    pub loading: bool,
    /// Message of the most recent failure, cleared when a new operation starts.
    pub error: Option<String>,
    pub sidebar_open: bool,
    pub search_query: String,
}
