use serde_json::json;

use super::http::{ApiClient, ApiError};
use super::models::Guild;

/// List all guilds.
pub async fn list(api: &ApiClient) -> Result<Vec<Guild>, ApiError> {
    // The service encodes an empty result set as JSON null.
    let rows: Option<Vec<Guild>> = api.get("/guilds").await?;
    Ok(rows.unwrap_or_default())
}

/// Get a guild by ID.
pub async fn get(api: &ApiClient, guild_id: i64) -> Result<Guild, ApiError> {
    api.get(&format!("/guilds/{guild_id}")).await
}

/// Create a guild.
pub async fn create(api: &ApiClient, name: &str) -> Result<Guild, ApiError> {
    api.post("/guilds", &json!({ "name": name })).await
}

/// Delete a guild by ID.
pub async fn delete(api: &ApiClient, guild_id: i64) -> Result<(), ApiError> {
    api.delete(&format!("/guilds/{guild_id}")).await
}
