/**
 * Upload Routes
 * Attachment upload for gallery images and downloads
 */
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::content::storage::{public_url, sanitize_filename};
use crate::error::{AppError, Result};
use crate::AppState;

pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024; // 20MB
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "txt", "csv",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Image,
    Document,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Stored name; reference this from a gallery image or download.
    pub filename: String,
    pub original_filename: String,
    pub url: String,
    pub size: usize,
    pub kind: UploadKind,
    pub mime_type: String,
}

fn validate_image_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn document_mime(ext: &str) -> &'static str {
    match ext {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "csv" => "text/csv",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Work out what an upload is from its name and contents. Images must carry
/// matching magic bytes and PDFs must start with `%PDF`.
fn classify_upload(original_name: &str, bytes: &[u8]) -> Result<(UploadKind, &'static str)> {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        let mime = validate_image_magic_bytes(bytes).ok_or_else(|| {
            AppError::validation("File content does not match an allowed image type")
        })?;
        return Ok((UploadKind::Image, mime));
    }

    if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        if ext == "pdf" && !bytes.starts_with(b"%PDF") {
            return Err(AppError::validation("File content is not a PDF document"));
        }
        return Ok((UploadKind::Document, document_mime(&ext)));
    }

    Err(AppError::validation(format!(
        "Unsupported file type. Allowed: {}, {}",
        IMAGE_EXTENSIONS.join(", "),
        DOCUMENT_EXTENSIONS.join(", ")
    )))
}

/// POST /api/admin/uploads
/// Expects a multipart field named `file`.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (original_filename, bytes) = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(AppError::validation("No file provided")),
            Err(e) => {
                tracing::warn!("Multipart error: {}", e);
                return Err(AppError::validation("Invalid multipart data"));
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let original_filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload bytes: {}", e);
            AppError::validation("Failed to read file data")
        })?;
        break (original_filename, bytes);
    };

    if sanitize_filename(&original_filename).is_empty() {
        return Err(AppError::validation("Invalid filename"));
    }
    if bytes.is_empty() {
        return Err(AppError::validation("Empty file"));
    }
    if bytes.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB.",
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }

    let (kind, mime_type) = classify_upload(&original_filename, &bytes)?;
    let filename = state.storage.save(&original_filename, &bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: public_url(&filename),
            filename,
            original_filename,
            size: bytes.len(),
            kind,
            mime_type: mime_type.to_string(),
        }),
    ))
}
