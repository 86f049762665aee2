use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Multipart, Path, Query},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::ApiError;
use crate::storage::{FileData, Storage, checked_filename};

pub const UPLOAD_FIELD: &str = "images";
pub const MAX_FILES_PER_UPLOAD: usize = 10;

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 10;

/// Prefix for the URLs handed back to clients; empty means same-origin
/// relative URLs.
#[derive(Debug, Clone, Default)]
pub struct PublicBase(pub String);

fn file_url(base: &PublicBase, filename: &str) -> String {
    format!("{}/uploads/{}", base.0, filename)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_urls: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePage {
    pub file_urls: Vec<String>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_images: usize,
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub new_filename: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameResponse {
    pub message: String,
    pub new_filename: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn upload(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(base): Extension<PublicBase>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // All parts are collected before the first save so a rejected request
    // leaves no partially committed files behind.
    let mut pending = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if pending.len() == MAX_FILES_PER_UPLOAD {
            return Err(ApiError::BadRequest("Too many files".to_string()));
        }

        let filename = field.file_name().map(|s| s.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        pending.push(FileData {
            bytes: bytes.to_vec(),
            filename,
        });
    }

    if pending.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }

    let mut file_urls = Vec::with_capacity(pending.len());
    for file_data in pending {
        let stored = storage.save(file_data).await?;
        file_urls.push(file_url(&base, &stored));
    }

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully!".to_string(),
        file_urls,
    }))
}

// Zero and non-numeric values fall back to the default rather than erroring.
fn parse_or(raw: Option<String>, default: usize) -> usize {
    raw.and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

pub async fn list_images(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(base): Extension<PublicBase>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ImagePage>, ApiError> {
    let page = parse_or(query.page, DEFAULT_PAGE);
    let limit = parse_or(query.limit, DEFAULT_LIMIT);

    let files = storage.list().await?;
    let total_images = files.len();

    // A page past the end yields an empty slice, not an error; saturating
    // keeps absurdly large page numbers from overflowing the offset.
    let file_urls = files
        .iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .map(|f| file_url(&base, f))
        .collect();

    Ok(Json(ImagePage {
        file_urls,
        current_page: page,
        total_pages: total_images.div_ceil(limit),
        total_images,
    }))
}

pub async fn get_image(
    Path(filename): Path<String>,
    Extension(storage): Extension<Arc<dyn Storage>>,
) -> Result<impl IntoResponse, ApiError> {
    let (bytes, content_type) = storage.get(&filename).await?;

    let mut response = Bytes::from(bytes).into_response();

    if let Some(content_type) = content_type {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            content_type.to_string().parse().unwrap(),
        );
    }

    Ok(response)
}

pub async fn rename_image(
    Path(filename): Path<String>,
    Extension(storage): Extension<Arc<dyn Storage>>,
    Json(body): Json<RenameRequest>,
) -> Result<Json<RenameResponse>, ApiError> {
    let new_filename = body.new_filename.trim().to_string();
    checked_filename(&new_filename)?;

    storage.rename(&filename, &new_filename).await?;

    Ok(Json(RenameResponse {
        message: "Image updated successfully!".to_string(),
        new_filename,
    }))
}

pub async fn delete_image(
    Path(filename): Path<String>,
    Extension(storage): Extension<Arc<dyn Storage>>,
) -> Result<Json<MessageResponse>, ApiError> {
    storage.delete(&filename).await?;

    Ok(Json(MessageResponse {
        message: "Image deleted successfully!".to_string(),
    }))
}
