use crate::{config::UploadConfig, error::AppError};
use actix_multipart::{Field, Multipart};
use actix_web::{post, web, HttpResponse, Responder};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

/// Stores the multipart field `file` under the upload directory.
///
/// The client-supplied name is reduced to its last path component. An existing file
/// with the same name is replaced once the whole field has arrived. The directory is
/// created by `AppState::new`.
#[post("/upload")]
pub async fn upload_file(
    upload: web::Data<UploadConfig>,
    mut payload: Multipart,
) -> Result<impl Responder, AppError> {
    while let Some(mut field) = payload.try_next().await? {
        let disposition = field.content_disposition();
        if disposition.get_name() != Some(FILE_FIELD) {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let filename = disposition
            .get_filename()
            .and_then(sanitize_filename)
            .ok_or_else(|| AppError::ValidationError("file: a filename is required".into()))?;

        // Streamed to a sibling file, renamed into place only once complete.
        let target = upload.dir.join(&filename);
        let partial = upload.dir.join(format!(".{}.part", filename));
        let written = match write_field(&mut field, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        log::info!("stored upload {} ({} bytes)", filename, written);

        let url = format!("/uploads/{}", filename);
        return Ok(HttpResponse::Ok().json(UploadResponse { filename, url }));
    }

    Err(AppError::ValidationError("file: field is required".into()))
}

async fn write_field(field: &mut Field, path: &Path) -> Result<usize, AppError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0usize;
    while let Some(chunk) = field.try_next().await? {
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;
    Ok(written)
}

/// Keeps only the final path component; rejects names that would escape the directory.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        None
    } else {
        Some(name.to_string())
    }
}
