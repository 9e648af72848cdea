use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::assets::{AssetFolder, BACKGROUND_SONG, HERO_IMAGE};
use crate::error::AppError;
use crate::view_state::{lenient_query, redirect, NoticeQuery, ViewState};
use crate::views::{render_page, PageData, Photo};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
    cfg.service(web::resource("/toggle/{section}").route(web::get().to(toggle)));
}

/// Render the birthday page for the requested view state
async fn index(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let view: ViewState = lenient_query(&req);
    let notice: NoticeQuery = lenient_query(&req);

    let wishes = if view.show_wishes {
        Some(data.wishes.list_wishes()?)
    } else {
        None
    };

    let photos = if view.show_memories {
        let mut notes = data.notes.notes()?;
        let photos = data
            .images
            .list()
            .await?
            .into_iter()
            .map(|filename| Photo {
                note: notes.remove(&filename).unwrap_or_default(),
                filename,
            })
            .collect();
        Some(photos)
    } else {
        None
    };

    let songs = data.songs.list().await?;

    let root = AssetFolder::new(data.config.assets_dir.clone(), &[]);
    let hero_present = root.contains(HERO_IMAGE).await;
    if !hero_present {
        log::warn!("Hero image {} missing from {:?}", HERO_IMAGE, root.dir());
    }
    let music_present = root.contains(BACKGROUND_SONG).await;
    if !music_present {
        log::warn!("Background song {} missing from {:?}", BACKGROUND_SONG, root.dir());
    }

    let html = render_page(&PageData {
        view,
        notice: notice.notice(),
        wishes,
        photos,
        songs,
        hero_present,
        music_present,
    });

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .body(html))
}

/// Flip one visibility flag and go back to the page
async fn toggle(path: web::Path<String>, req: HttpRequest) -> HttpResponse {
    let view: ViewState = lenient_query(&req);
    let next = match path.as_str() {
        "wishes" => view.toggled_wishes(),
        "memories" => view.toggled_memories(),
        "uploader" => view.toggled_uploader(),
        _ => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Unknown section"
            }));
        }
    };
    redirect(&next, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::{location, test_state};
    use actix_web::{test, App};
    use tempfile::TempDir;

    #[actix_web::test]
    async fn test_index_lists_wishes_when_shown() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        state.wishes.add_wish("Ann", "Happy day!").unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(!html.contains("Happy day!"));

        let req = test::TestRequest::get().uri("/?show_wishes=1").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Happy day!"));
        assert!(html.contains("Background music not found"));
    }

    #[actix_web::test]
    async fn test_index_shows_photo_notes() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        state.images.upload("cake.jpg", b"jpeg").await.unwrap();
        state.notes.save_note("cake.jpg", "the best cake").unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get().uri("/?show_memories=1").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/assets/memories/cake.jpg"));
        assert!(html.contains("the best cake"));
    }

    #[actix_web::test]
    async fn test_index_survives_malformed_query() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        for uri in [
            "/?show_wishes=1&show_wishes=1",
            "/?notice=photos_uploaded&count=x",
            "/?notice=songs_uploaded&count=1&skipped=-3",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "{}", uri);
        }

        let req = test::TestRequest::get()
            .uri("/?notice=photos_uploaded&count=x")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("0 photo(s) uploaded!"));
    }

    #[actix_web::test]
    async fn test_toggle_redirects_with_new_state() {
        let app = test::init_service(App::new().configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/toggle/memories?show_wishes=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/?show_wishes=1&show_memories=1");

        let req = test::TestRequest::get()
            .uri("/toggle/wishes?show_wishes=1&show_wishes=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/?show_wishes=1");

        let req = test::TestRequest::get().uri("/toggle/bogus").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
