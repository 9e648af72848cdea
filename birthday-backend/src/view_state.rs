//! Per-request UI state carried in the query string.
//!
//! Every action handler reads the current [`ViewState`], performs one
//! operation, and redirects back to the page with the next state and an
//! optional [`Notice`].

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewState {
    #[serde(default, deserialize_with = "flag")]
    pub show_wishes: bool,
    #[serde(default, deserialize_with = "flag")]
    pub show_memories: bool,
    #[serde(default, deserialize_with = "flag")]
    pub show_uploader: bool,
    /// Song filename currently playing
    #[serde(default, rename = "play")]
    pub playing: Option<String>,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.as_str(), "1" | "true" | "on" | "yes"))
}

impl ViewState {
    pub fn toggled_wishes(&self) -> Self {
        Self {
            show_wishes: !self.show_wishes,
            ..self.clone()
        }
    }

    /// Closing the memories panel also closes its uploader
    pub fn toggled_memories(&self) -> Self {
        let show_memories = !self.show_memories;
        Self {
            show_memories,
            show_uploader: self.show_uploader && show_memories,
            ..self.clone()
        }
    }

    pub fn toggled_uploader(&self) -> Self {
        Self {
            show_uploader: !self.show_uploader,
            ..self.clone()
        }
    }

    pub fn with_playing(&self, song: &str) -> Self {
        Self {
            playing: Some(song.to_string()),
            ..self.clone()
        }
    }

    pub fn with_wishes_shown(&self) -> Self {
        Self {
            show_wishes: true,
            ..self.clone()
        }
    }

    /// Query string without the leading `?`. Only set flags are written.
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();
        if self.show_wishes {
            parts.push("show_wishes=1".to_string());
        }
        if self.show_memories {
            parts.push("show_memories=1".to_string());
        }
        if self.show_uploader {
            parts.push("show_uploader=1".to_string());
        }
        if let Some(song) = &self.playing {
            parts.push(format!("play={}", urlencoding::encode(song)));
        }
        parts.join("&")
    }

    /// `path` with this state appended as a query string
    pub fn href(&self, path: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }
}

/// One-shot flash message shown on the page after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    WishSent,
    WishDeleted,
    MissingFields,
    PhotosUploaded { stored: usize, skipped: usize },
    NoteSaved,
    PhotoDeleted,
    SongsUploaded { stored: usize, skipped: usize },
    NothingUploaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// The `notice`, `count` and `skipped` query parameters.
/// Counts that do not parse read as zero.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub count: Option<String>,
    pub skipped: Option<String>,
}

impl NoticeQuery {
    pub fn notice(&self) -> Option<Notice> {
        let parse = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0)
        };
        let stored = parse(&self.count);
        let skipped = parse(&self.skipped);
        match self.notice.as_deref()? {
            "wish_sent" => Some(Notice::WishSent),
            "wish_deleted" => Some(Notice::WishDeleted),
            "missing_fields" => Some(Notice::MissingFields),
            "photos_uploaded" => Some(Notice::PhotosUploaded { stored, skipped }),
            "note_saved" => Some(Notice::NoteSaved),
            "photo_deleted" => Some(Notice::PhotoDeleted),
            "songs_uploaded" => Some(Notice::SongsUploaded { stored, skipped }),
            "nothing_uploaded" => Some(Notice::NothingUploaded),
            _ => None,
        }
    }
}

impl Notice {
    pub fn code(&self) -> &'static str {
        match self {
            Notice::WishSent => "wish_sent",
            Notice::WishDeleted => "wish_deleted",
            Notice::MissingFields => "missing_fields",
            Notice::PhotosUploaded { .. } => "photos_uploaded",
            Notice::NoteSaved => "note_saved",
            Notice::PhotoDeleted => "photo_deleted",
            Notice::SongsUploaded { .. } => "songs_uploaded",
            Notice::NothingUploaded => "nothing_uploaded",
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::MissingFields | Notice::NothingUploaded => NoticeLevel::Warning,
            Notice::NoteSaved => NoticeLevel::Info,
            _ => NoticeLevel::Success,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::WishSent => "Your wish has been sent!".to_string(),
            Notice::WishDeleted => "Wish deleted successfully!".to_string(),
            Notice::MissingFields => "Please fill in both your name and your wish.".to_string(),
            Notice::PhotosUploaded { stored, skipped } => {
                with_skipped(format!("{} photo(s) uploaded", stored), *skipped)
            }
            Notice::NoteSaved => "Note saved.".to_string(),
            Notice::PhotoDeleted => "Photo deleted.".to_string(),
            Notice::SongsUploaded { stored, skipped } => {
                with_skipped(format!("{} song(s) uploaded", stored), *skipped)
            }
            Notice::NothingUploaded => "No files were uploaded. Check the file types.".to_string(),
        }
    }

    fn to_query(&self) -> String {
        match self {
            Notice::PhotosUploaded { stored, skipped }
            | Notice::SongsUploaded { stored, skipped } => {
                let mut query = format!("notice={}&count={}", self.code(), stored);
                if *skipped > 0 {
                    query.push_str(&format!("&skipped={}", skipped));
                }
                query
            }
            _ => format!("notice={}", self.code()),
        }
    }
}

fn with_skipped(mut message: String, skipped: usize) -> String {
    if skipped > 0 {
        message.push_str(&format!(", {} skipped (wrong type or too large)", skipped));
    }
    message.push('!');
    message
}

/// Query parameters for page loads. A malformed query (stale link, repeated
/// key, bad number) falls back to the default instead of failing the page.
pub fn lenient_query<T: DeserializeOwned + Default>(req: &HttpRequest) -> T {
    match web::Query::<T>::from_query(req.query_string()) {
        Ok(query) => query.into_inner(),
        Err(e) => {
            log::warn!("Ignoring malformed query {:?}: {}", req.query_string(), e);
            T::default()
        }
    }
}

/// `303 See Other` back to the page with the next state
pub fn redirect(view: &ViewState, notice: Option<Notice>) -> HttpResponse {
    let mut query = view.to_query();
    if let Some(notice) = notice {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&notice.to_query());
    }
    let location = if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query)
    };

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
