//! Birthday page server: guest wishes, photo memories with notes, and songs.
//!
//! Default: http://127.0.0.1:8080/

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod assets;
mod config;
mod controllers;
mod db;
mod error;
mod view_state;
mod views;

use assets::AssetFolder;
use config::Config;
use db::{DbError, MemoryNoteStore, NoteStore, WishStore};

pub struct AppState {
    pub wishes: Arc<WishStore>,
    pub notes: Arc<dyn NoteStore>,
    pub images: AssetFolder,
    pub songs: AssetFolder,
    pub config: Config,
}

impl AppState {
    pub fn open(config: Config) -> Result<Self, DbError> {
        log::info!("Opening wishes database at {}", config.wishes_db_path);
        let wishes = Arc::new(WishStore::open(&config.wishes_db_path)?);

        log::info!("Opening memories database at {}", config.memories_db_path);
        let notes: Arc<dyn NoteStore> = Arc::new(MemoryNoteStore::open(&config.memories_db_path)?);

        Ok(Self {
            wishes,
            notes,
            images: AssetFolder::images(&config.assets_dir),
            songs: AssetFolder::songs(&config.assets_dir),
            config,
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let bind = (config.bind_address.clone(), config.port);
    let assets_dir = config.assets_dir.clone();

    let state = AppState::open(config).expect("Failed to open databases");
    for folder in [&state.images, &state.songs] {
        if let Err(e) = folder.ensure_exists().await {
            log::warn!("Could not create asset folder {:?}: {}", folder.dir(), e);
        }
    }
    let state = web::Data::new(state);

    log::info!("Serving assets from {:?}", assets_dir);
    log::info!("Birthday page listening on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controllers::health::config)
            .configure(controllers::page::config)
            .configure(controllers::wishes::config)
            .configure(controllers::memories::config)
            .configure(controllers::songs::config)
            .service(Files::new("/assets", assets_dir.clone()))
    })
    .bind(bind)?
    .run()
    .await
}
