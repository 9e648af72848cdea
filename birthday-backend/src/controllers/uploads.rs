//! Multipart upload handling shared by the photo and song uploaders.

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::assets::{sanitize_filename, AssetFolder};
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// Stored filenames, in upload order
    pub stored: Vec<String>,
    /// Client filenames that were skipped
    pub rejected: Vec<String>,
}

/// Store every file part of `payload` in `folder`.
///
/// Parts without a filename are ignored. Files with a disallowed extension,
/// an unusable name or more than `max_bytes` of content are skipped and
/// listed in [`UploadOutcome::rejected`].
pub async fn save_uploads(
    mut payload: Multipart,
    folder: &AssetFolder,
    max_bytes: usize,
) -> Result<UploadOutcome, AppError> {
    let mut outcome = UploadOutcome::default();

    while let Some(mut field) = payload.try_next().await? {
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_string())
            .unwrap_or_default();
        if filename.is_empty() {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let mut bytes = Vec::new();
        let mut too_large = false;
        while let Some(chunk) = field.try_next().await? {
            if too_large {
                continue;
            }
            if bytes.len() + chunk.len() > max_bytes {
                too_large = true;
                bytes = Vec::new();
                continue;
            }
            bytes.extend_from_slice(&chunk);
        }

        if too_large {
            log::warn!("Rejected upload {}: larger than {} bytes", filename, max_bytes);
            outcome.rejected.push(filename);
            continue;
        }
        if !folder.accepts(&filename) || sanitize_filename(&filename).is_err() {
            log::warn!("Rejected upload {}: not an allowed file", filename);
            outcome.rejected.push(filename);
            continue;
        }

        let stored = folder.upload(&filename, &bytes).await?;
        outcome.stored.push(stored);
    }

    Ok(outcome)
}
