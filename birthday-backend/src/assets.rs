//! Asset folders for uploaded photos and songs.
//!
//! Each folder is a flat directory under the asset root. Files are
//! identified by bare filename; uploads overwrite on name collision.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::AppError;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const SONG_EXTENSIONS: &[&str] = &["mp3"];

pub const HERO_IMAGE: &str = "birthday_person.jpg";
pub const BACKGROUND_SONG: &str = "birthday_song.mp3";

#[derive(Debug, Clone)]
pub struct AssetFolder {
    dir: PathBuf,
    extensions: &'static [&'static str],
}

impl AssetFolder {
    pub fn new(dir: impl Into<PathBuf>, extensions: &'static [&'static str]) -> Self {
        Self {
            dir: dir.into(),
            extensions,
        }
    }

    /// The photo gallery folder, `<root>/memories`
    pub fn images(root: &Path) -> Self {
        Self::new(root.join("memories"), IMAGE_EXTENSIONS)
    }

    /// The uploaded songs folder, `<root>/songs`
    pub fn songs(root: &Path) -> Self {
        Self::new(root.join("songs"), SONG_EXTENSIONS)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_exists(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Whether `filename` carries one of this folder's extensions (case-insensitive)
    pub fn accepts(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false)
    }

    /// Write `bytes` to `<dir>/<filename>`, replacing any existing file.
    /// Returns the stored (sanitized) filename.
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, AppError> {
        let name = sanitize_filename(filename)?;
        self.ensure_exists().await?;
        fs::write(self.dir.join(&name), bytes).await?;
        log::info!("Stored {} ({} bytes) in {:?}", name, bytes.len(), self.dir);
        Ok(name)
    }

    /// Filenames in the folder that pass the extension allow-list, sorted by name.
    /// A folder that does not exist yet lists as empty.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut read_dir = match fs::read_dir(&self.dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let name = match entry.file_name().to_str() {
                Some(n) => n.to_string(),
                None => continue,
            };
            // Follows symlinks, so a linked photo still lists
            let is_file = fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if self.accepts(&name) {
                names.push(name);
            }
        }

        names.sort_by_key(|n| n.to_lowercase());
        Ok(names)
    }

    /// Remove a file. Missing files are a no-op and return false.
    pub async fn delete(&self, filename: &str) -> Result<bool, AppError> {
        let name = sanitize_filename(filename)?;
        match fs::remove_file(self.dir.join(&name)).await {
            Ok(()) => {
                log::info!("Deleted {} from {:?}", name, self.dir);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Delete of missing file {} in {:?} ignored", name, self.dir);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn contains(&self, filename: &str) -> bool {
        match sanitize_filename(filename) {
            Ok(name) => fs::metadata(self.dir.join(name))
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// Reduce a client-supplied name to its final path component.
///
/// Browsers may send full paths (`C:\photos\cake.jpg`), so both separators
/// are stripped. Empty, dot-only and hidden names are rejected.
pub fn sanitize_filename(raw: &str) -> Result<String, AppError> {
    let name = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name.starts_with('.') || name.contains('\0') {
        return Err(AppError::InvalidFilename(raw.to_string()));
    }
    Ok(name.to_string())
}
