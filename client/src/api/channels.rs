use serde_json::json;

use super::http::{ApiClient, ApiError};
use super::models::Channel;

/// List all channels in a guild.
pub async fn list_for_guild(api: &ApiClient, guild_id: i64) -> Result<Vec<Channel>, ApiError> {
    // The service encodes an empty result set as JSON null.
    let rows: Option<Vec<Channel>> = api.get(&format!("/guilds/{guild_id}/channels")).await?;
    Ok(rows.unwrap_or_default())
}

/// Get a channel by ID.
pub async fn get(api: &ApiClient, channel_id: i64) -> Result<Channel, ApiError> {
    api.get(&format!("/channels/{channel_id}")).await
}

/// Create a channel in a guild.
pub async fn create(api: &ApiClient, guild_id: i64, name: &str) -> Result<Channel, ApiError> {
    api.post(&format!("/guilds/{guild_id}/channels"), &json!({ "name": name }))
        .await
}

/// Delete a channel by ID.
pub async fn delete(api: &ApiClient, channel_id: i64) -> Result<(), ApiError> {
    api.delete(&format!("/channels/{channel_id}")).await
}
