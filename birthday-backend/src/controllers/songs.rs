use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use crate::assets::sanitize_filename;
use crate::controllers::uploads::save_uploads;
use crate::error::AppError;
use crate::view_state::{redirect, Notice, ViewState};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/songs/upload").route(web::post().to(upload_songs)));
    cfg.service(web::resource("/songs/{filename}/play").route(web::get().to(play_song)));
}

async fn upload_songs(
    data: web::Data<AppState>,
    view: web::Query<ViewState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let outcome = save_uploads(payload, &data.songs, data.config.max_upload_bytes).await?;
    if !outcome.rejected.is_empty() {
        log::warn!("Skipped song upload(s): {}", outcome.rejected.join(", "));
    }

    let notice = if outcome.stored.is_empty() {
        Notice::NothingUploaded
    } else {
        log::info!("Uploaded {} song(s)", outcome.stored.len());
        Notice::SongsUploaded {
            stored: outcome.stored.len(),
            skipped: outcome.rejected.len(),
        }
    };
    Ok(redirect(&view, Some(notice)))
}

async fn play_song(
    view: web::Query<ViewState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = sanitize_filename(&path)?;
    Ok(redirect(&view.with_playing(&filename), None))
}
