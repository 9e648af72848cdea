use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub wishes_db_path: String,
    pub memories_db_path: String,
    pub assets_dir: PathBuf,
    /// Per-file upload cap in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let max_upload_mb: usize = env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid number");

        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            wishes_db_path: env::var("WISHES_DB_PATH").unwrap_or_else(|_| "./wishes.db".to_string()),
            memories_db_path: env::var("MEMORIES_DB_PATH")
                .unwrap_or_else(|_| "./memories.db".to_string()),
            assets_dir: PathBuf::from(
                env::var("ASSETS_DIR").unwrap_or_else(|_| "./assets".to_string()),
            ),
            max_upload_bytes: megabytes(max_upload_mb),
        }
    }
}

fn megabytes(mb: usize) -> usize {
    mb.checked_mul(1024 * 1024).expect("MAX_UPLOAD_MB too large")
}
