use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

/// The entire offline data set: one JSON document, guilds keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub guilds: BTreeMap<String, GuildRecord>,
}

/// One guild's offline record. Channels are keyed by name; each channel
/// holds its logs oldest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRecord {
    pub name: String,
    #[serde(default)]
    pub channels: BTreeMap<String, Vec<LocalLog>>,
}

impl GuildRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: BTreeMap::new(),
        }
    }
}

/// A log entry in the offline document. Timestamps are ISO-8601 UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

/// Generate a log id from the current unix-millis timestamp plus a random
/// alphanumeric suffix. Practically unique without central coordination;
/// not collision-proof under adversarial conditions.
pub fn generate_log_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!(
        "log_{}_{}",
        Utc::now().timestamp_millis(),
        suffix.to_lowercase()
    )
}
