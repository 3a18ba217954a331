use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use super::http::{ApiClient, ApiError, read_json};
use super::models::{FileMeta, Log};

/// List all logs in a channel. The service returns newest-first.
pub async fn list_for_channel(api: &ApiClient, channel_id: i64) -> Result<Vec<Log>, ApiError> {
    // The service encodes an empty result set as JSON null.
    let rows: Option<Vec<Log>> = api.get(&format!("/channels/{channel_id}/logs")).await?;
    Ok(rows.unwrap_or_default())
}

/// Get a log by ID.
pub async fn get(api: &ApiClient, log_id: i64) -> Result<Log, ApiError> {
    api.get(&format!("/logs/{log_id}")).await
}

/// Create a log in a channel.
pub async fn create(api: &ApiClient, channel_id: i64, content: &str) -> Result<Log, ApiError> {
    api.post(
        &format!("/channels/{channel_id}/logs"),
        &json!({ "content": content }),
    )
    .await
}

/// Update a log's content.
pub async fn update(api: &ApiClient, log_id: i64, content: &str) -> Result<Log, ApiError> {
    api.put(&format!("/logs/{log_id}"), &json!({ "content": content }))
        .await
}

/// Delete a log by ID.
pub async fn delete(api: &ApiClient, log_id: i64) -> Result<(), ApiError> {
    api.delete(&format!("/logs/{log_id}")).await
}

/// A file to attach to a log.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    /// MIME type sent with the part; the service stores it as-is.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct UploadResponse {
    files: Option<Vec<FileMeta>>,
}

/// Upload attachments for an existing log.
///
/// Multipart form with one repeated `files` field per attachment. Errors
/// are normalized the same way as JSON requests.
pub async fn upload_files(
    api: &ApiClient,
    log_id: i64,
    files: Vec<UploadFile>,
) -> Result<Vec<FileMeta>, ApiError> {
    let mut form = Form::new();
    for file in files {
        let mut part = Part::bytes(file.bytes).file_name(file.name);
        if let Some(mime) = &file.mime_type {
            part = part
                .mime_str(mime)
                .map_err(|e| ApiError::transport(format!("invalid MIME type: {e}")))?;
        }
        form = form.part("files", part);
    }

    let resp = api
        .http()
        .post(api.url(&format!("/logs/{log_id}/files")))
        .multipart(form)
        .send()
        .await
        .map_err(|e| ApiError::transport(format!("network error: {e}")))?;

    let body: UploadResponse = read_json(resp).await?;
    Ok(body.files.unwrap_or_default())
}
