use actix_web::{web, HttpResponse};

use crate::db::CreateWishRequest;
use crate::error::AppError;
use crate::view_state::{redirect, Notice, ViewState};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/wishes").route(web::post().to(create_wish)));
    cfg.service(web::resource("/wishes/{id}/delete").route(web::post().to(delete_wish)));
    cfg.service(web::resource("/api/wishes").route(web::get().to(list_wishes)));
}

/// Handle the wish form. Both fields are required.
async fn create_wish(
    data: web::Data<AppState>,
    view: web::Query<ViewState>,
    form: web::Form<CreateWishRequest>,
) -> Result<HttpResponse, AppError> {
    let name = form.name.trim();
    let message = form.message.trim();

    if name.is_empty() || message.is_empty() {
        return Ok(redirect(&view, Some(Notice::MissingFields)));
    }

    let wish = data.wishes.add_wish(name, message)?;
    log::info!("New wish #{} from {}", wish.id, wish.name);

    Ok(redirect(&view.with_wishes_shown(), Some(Notice::WishSent)))
}

async fn delete_wish(
    data: web::Data<AppState>,
    view: web::Query<ViewState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let wish_id = path.into_inner();

    if data.wishes.delete_wish(wish_id)? {
        log::info!("Deleted wish #{}", wish_id);
    }

    Ok(redirect(&view.with_wishes_shown(), Some(Notice::WishDeleted)))
}

/// JSON listing, newest first
async fn list_wishes(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let wishes = data.wishes.list_wishes()?;
    Ok(HttpResponse::Ok().json(wishes))
}
