use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::assets::sanitize_filename;
use crate::controllers::uploads::save_uploads;
use crate::error::AppError;
use crate::view_state::{redirect, Notice, ViewState};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/memories/upload").route(web::post().to(upload_photos)));
    cfg.service(web::resource("/memories/{filename}/note").route(web::post().to(save_note)));
    cfg.service(web::resource("/memories/{filename}/delete").route(web::post().to(delete_photo)));
}

#[derive(Debug, Deserialize)]
struct NoteForm {
    #[serde(default)]
    note: String,
}

async fn upload_photos(
    data: web::Data<AppState>,
    view: web::Query<ViewState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let outcome = save_uploads(payload, &data.images, data.config.max_upload_bytes).await?;
    if !outcome.rejected.is_empty() {
        log::warn!("Skipped photo upload(s): {}", outcome.rejected.join(", "));
    }

    let notice = if outcome.stored.is_empty() {
        Notice::NothingUploaded
    } else {
        log::info!("Uploaded {} photo(s)", outcome.stored.len());
        Notice::PhotosUploaded {
            stored: outcome.stored.len(),
            skipped: outcome.rejected.len(),
        }
    };
    Ok(redirect(&view, Some(notice)))
}

async fn save_note(
    data: web::Data<AppState>,
    view: web::Query<ViewState>,
    path: web::Path<String>,
    form: web::Form<NoteForm>,
) -> Result<HttpResponse, AppError> {
    let filename = sanitize_filename(&path)?;
    data.notes.save_note(&filename, &form.note)?;
    log::info!("Saved note for {}", filename);

    Ok(redirect(&view, Some(Notice::NoteSaved)))
}

/// Delete an image and clear its note. The note row itself is kept.
async fn delete_photo(
    data: web::Data<AppState>,
    view: web::Query<ViewState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = sanitize_filename(&path)?;
    data.images.delete(&filename).await?;
    data.notes.save_note(&filename, "")?;

    Ok(redirect(&view, Some(Notice::PhotoDeleted)))
}
