//! The birthday page, rendered from the view state and the stores.

use super::escape_html;
use crate::db::Wish;
use crate::view_state::{Notice, NoticeLevel, ViewState};

/// A gallery image with its note
#[derive(Debug, Clone)]
pub struct Photo {
    pub filename: String,
    pub note: String,
}

/// Everything one render needs. Sections that are closed carry `None` so
/// the handler can skip loading them.
#[derive(Debug, Default)]
pub struct PageData {
    pub view: ViewState,
    pub notice: Option<Notice>,
    pub wishes: Option<Vec<Wish>>,
    pub photos: Option<Vec<Photo>>,
    pub songs: Vec<String>,
    pub hero_present: bool,
    pub music_present: bool,
}

pub fn render_page(data: &PageData) -> String {
    let view = &data.view;

    let notice_html = match &data.notice {
        Some(n) => alert(n.level(), &n.message()),
        None => String::new(),
    };

    let hero_html = if data.hero_present {
        r#"<figure class="hero">
      <img src="/assets/birthday_person.jpg" alt="The birthday star">
      <figcaption>Wishing you the best day!</figcaption>
    </figure>"#
            .to_string()
    } else {
        alert(NoticeLevel::Warning, "Birthday photo not found (assets/birthday_person.jpg).")
    };

    let music_html = if data.music_present {
        r#"<audio class="background" src="/assets/birthday_song.mp3" autoplay loop controls></audio>"#
            .to_string()
    } else {
        alert(NoticeLevel::Warning, "Background music not found (assets/birthday_song.mp3).")
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Birthday Wishes</title>
<style>
  * {{ box-sizing: border-box; }}
  body {{ margin: 0; padding: 24px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; min-height: 100vh;
         background-image: linear-gradient(to right top, #fbc2eb, #f8b2e5, #f5a2e0, #f192db, #ed82d6); color: #654321; }}
  main {{ max-width: 960px; margin: 0 auto; }}
  h1 {{ text-align: center; font-size: 2.6em; margin: 8px 0 20px; }}
  h2, h3 {{ color: #654321; }}
  .hero {{ margin: 0 auto; text-align: center; }}
  .hero img {{ border: 10px solid #fff; border-radius: 10px; box-shadow: 5px 5px 15px rgba(0,0,0,0.2); max-height: 75vh; max-width: 100%; width: auto; object-fit: contain; }}
  .hero figcaption {{ margin-top: 10px; }}
  .tagline {{ font-size: 1.3em; font-weight: 600; text-align: center; }}
  hr {{ border: none; border-top: 1px solid rgba(101,67,33,0.3); margin: 24px 0; }}
  details, .panel {{ background: rgba(255,255,255,0.6); border-radius: 10px; padding: 14px 18px; margin-bottom: 16px; }}
  summary {{ cursor: pointer; font-weight: 600; }}
  label {{ display: block; margin: 10px 0 4px; }}
  input[type=text], textarea {{ width: 100%; padding: 8px; border: 1px solid #d9b8d0; border-radius: 6px; font: inherit; }}
  button, .button {{ background: #fff; color: #654321; border: 1px solid #d9b8d0; border-radius: 6px; padding: 6px 14px; cursor: pointer; text-decoration: none; display: inline-block; font: inherit; }}
  .toggle {{ font-weight: 600; margin: 8px 0; display: inline-block; }}
  .alert {{ border-radius: 8px; padding: 10px 14px; margin: 10px 0; }}
  .alert.success {{ background: #d7f5dd; }}
  .alert.info {{ background: #dbeafe; }}
  .alert.warning {{ background: #fff3c4; }}
  .wish {{ display: flex; gap: 12px; align-items: center; margin-bottom: 10px; }}
  .wish .body {{ flex: 1; }}
  .wish .msg {{ background: #dbeafe; border-radius: 8px; padding: 8px 12px; margin-top: 4px; white-space: pre-wrap; }}
  .gallery {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px; }}
  .photo img {{ width: 100%; border: 6px solid #fff; border-radius: 8px; }}
  .photo form {{ margin-top: 6px; }}
  .songs li {{ margin: 6px 0; }}
  .playing {{ font-weight: 700; }}
  .balloons span {{ position: fixed; bottom: -80px; font-size: 48px; animation: rise 9s ease-in infinite; pointer-events: none; }}
  @keyframes rise {{ to {{ transform: translateY(-120vh); opacity: 0.2; }} }}
</style>
</head>
<body>
<div class="balloons" aria-hidden="true">
  <span style="left:8%">🎈</span><span style="left:28%; animation-delay:2s">🎈</span>
  <span style="left:52%; animation-delay:4s">🎈</span><span style="left:76%; animation-delay:1s">🎈</span>
</div>
<main>
  <h1>🎉 Happy Birthday! 🎉</h1>
  {notice_html}
  {hero_html}
  {music_html}
  <p class="tagline">Hope you have a wonderful day filled with joy and laughter! 🎈</p>
  <hr>

  <details{form_open}>
    <summary>💌 Send a Birthday Wish!</summary>
    <form method="post" action="{wish_action}">
      <label for="name">Your Name</label>
      <input type="text" id="name" name="name">
      <label for="message">Your Wish</label>
      <textarea id="message" name="message" rows="4"></textarea>
      <p><button type="submit">Send Wish</button></p>
    </form>
  </details>

  <a class="toggle button" href="{wishes_toggle}">📜 {wishes_label}</a>
  {wishes_html}
  <hr>

  <a class="toggle button" href="{memories_toggle}">📸 {memories_label}</a>
  {memories_html}
  <hr>

  {songs_html}
</main>
</body>
</html>"#,
        notice_html = notice_html,
        hero_html = hero_html,
        music_html = music_html,
        form_open = if data.notice == Some(Notice::MissingFields) { " open" } else { "" },
        wish_action = link(view, "/wishes"),
        wishes_toggle = link(view, "/toggle/wishes"),
        wishes_label = if view.show_wishes { "Hide Wishes" } else { "See All Wishes" },
        wishes_html = render_wishes(view, data.wishes.as_deref()),
        memories_toggle = link(view, "/toggle/memories"),
        memories_label = if view.show_memories { "Close Memories" } else { "Open Memories" },
        memories_html = render_memories(view, data.photos.as_deref()),
        songs_html = render_songs(view, &data.songs),
    );

    html
}

/// `view.href(path)` escaped for use inside an attribute
fn link(view: &ViewState, path: &str) -> String {
    escape_html(&view.href(path))
}

fn alert(level: NoticeLevel, text: &str) -> String {
    let class = match level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
    };
    format!(r#"<div class="alert {}">{}</div>"#, class, escape_html(text))
}

fn render_wishes(view: &ViewState, wishes: Option<&[Wish]>) -> String {
    let wishes = match (view.show_wishes, wishes) {
        (true, Some(w)) => w,
        _ => return String::new(),
    };
    if wishes.is_empty() {
        return alert(NoticeLevel::Info, "No wishes have been sent yet. Be the first!");
    }

    let mut rows = String::new();
    for wish in wishes {
        rows.push_str(&format!(
            r#"<div class="wish">
      <div class="body"><strong>From:</strong> {name}<div class="msg"><strong>Message:</strong> {message}</div></div>
      <form method="post" action="{action}"><button type="submit" title="Delete wish">🗑️</button></form>
    </div>
"#,
            name = escape_html(&wish.name),
            message = escape_html(&wish.message),
            action = link(view, &format!("/wishes/{}/delete", wish.id)),
        ));
    }

    format!(
        r#"<div class="panel"><h3>All the lovely wishes just for you!</h3>
    {}</div>"#,
        rows
    )
}

fn render_memories(view: &ViewState, photos: Option<&[Photo]>) -> String {
    let photos = match (view.show_memories, photos) {
        (true, Some(p)) => p,
        _ => return String::new(),
    };

    let uploader = if view.show_uploader {
        format!(
            r#"<form method="post" action="{}" enctype="multipart/form-data">
      <input type="file" name="files" accept=".jpg,.jpeg,.png" multiple>
      <button type="submit">Upload</button>
    </form>"#,
            link(view, "/memories/upload")
        )
    } else {
        String::new()
    };

    let gallery = if photos.is_empty() {
        alert(NoticeLevel::Info, "No photos yet. Upload some memories!")
    } else {
        let mut cards = String::new();
        for photo in photos {
            let encoded = urlencoding::encode(&photo.filename);
            cards.push_str(&format!(
                r#"<div class="photo">
        <img src="/assets/memories/{encoded}" alt="{alt}">
        <form method="post" action="{note_action}">
          <textarea name="note" rows="2" placeholder="Add a note...">{note}</textarea>
          <button type="submit">Save note</button>
        </form>
        <form method="post" action="{delete_action}"><button type="submit">Delete</button></form>
      </div>
"#,
                encoded = encoded,
                alt = escape_html(&photo.filename),
                note = escape_html(&photo.note),
                note_action = link(view, &format!("/memories/{}/note", encoded)),
                delete_action = link(view, &format!("/memories/{}/delete", encoded)),
            ));
        }
        format!(r#"<div class="gallery">{}</div>"#, cards)
    };

    format!(
        r#"<div class="panel"><h2>📸 Beautiful Photo Memories</h2>
    <a class="button" href="{uploader_toggle}">{uploader_label}</a>
    {uploader}
    {gallery}
  </div>"#,
        uploader_toggle = link(view, "/toggle/uploader"),
        uploader_label = if view.show_uploader { "Hide uploader" } else { "Add photos" },
        uploader = uploader,
        gallery = gallery,
    )
}

fn render_songs(view: &ViewState, songs: &[String]) -> String {
    let mut items = String::new();
    for song in songs {
        let encoded = urlencoding::encode(song);
        let playing = view.playing.as_deref() == Some(song.as_str());
        items.push_str(&format!(
            r#"<li{class}>{name} <a class="button" href="{play}">▶ Play</a></li>
"#,
            class = if playing { r#" class="playing""# } else { "" },
            name = escape_html(song),
            play = link(view, &format!("/songs/{}/play", encoded)),
        ));
    }
    let list = if items.is_empty() {
        alert(NoticeLevel::Info, "No songs yet. Dedicate one!")
    } else {
        format!(r#"<ul class="songs">{}</ul>"#, items)
    };

    let player = match &view.playing {
        Some(song) if songs.contains(song) => format!(
            r#"<audio src="/assets/songs/{}" autoplay controls></audio>"#,
            urlencoding::encode(song)
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="panel"><h2>🎵 Songs for You</h2>
    <form method="post" action="{action}" enctype="multipart/form-data">
      <input type="file" name="files" accept=".mp3" multiple>
      <button type="submit">Upload songs</button>
    </form>
    {list}
    {player}
  </div>"#,
        action = link(view, "/songs/upload"),
        list = list,
        player = player,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn wish(id: i64, name: &str, message: &str) -> Wish {
        Wish {
            id,
            name: name.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hidden_sections_render_nothing() {
        let html = render_page(&PageData::default());
        assert!(html.contains("Happy Birthday!"));
        assert!(html.contains("See All Wishes"));
        assert!(!html.contains("All the lovely wishes"));
        assert!(!html.contains("Beautiful Photo Memories"));
    }

    #[test]
    fn test_missing_assets_warn() {
        let html = render_page(&PageData::default());
        assert!(html.contains("Birthday photo not found"));
        assert!(html.contains("Background music not found"));

        let html = render_page(&PageData {
            hero_present: true,
            music_present: true,
            ..Default::default()
        });
        assert!(html.contains(r#"src="/assets/birthday_person.jpg""#));
        assert!(html.contains(r#"src="/assets/birthday_song.mp3""#));
        assert!(!html.contains("not found"));
    }

    #[test]
    fn test_wishes_escaped_and_linked() {
        let view = ViewState::default().with_wishes_shown();
        let html = render_page(&PageData {
            view,
            wishes: Some(vec![wish(7, "<b>Ann</b>", "Happy day!")]),
            ..Default::default()
        });
        assert!(html.contains("All the lovely wishes just for you!"));
        assert!(html.contains("&lt;b&gt;Ann&lt;/b&gt;"));
        assert!(html.contains(r#"action="/wishes/7/delete?show_wishes=1""#));
    }

    #[test]
    fn test_empty_wish_list() {
        let html = render_page(&PageData {
            view: ViewState::default().with_wishes_shown(),
            wishes: Some(Vec::new()),
            ..Default::default()
        });
        assert!(html.contains("No wishes have been sent yet. Be the first!"));
    }

    #[test]
    fn test_gallery_with_notes_and_uploader() {
        let view = ViewState::default().toggled_memories().toggled_uploader();
        let html = render_page(&PageData {
            view,
            photos: Some(vec![Photo {
                filename: "cake day.jpg".to_string(),
                note: "so much cake".to_string(),
            }]),
            ..Default::default()
        });
        assert!(html.contains(r#"src="/assets/memories/cake%20day.jpg""#));
        assert!(html.contains("so much cake"));
        assert!(html.contains(r#"action="/memories/upload?show_memories=1&amp;show_uploader=1""#));
    }

    #[test]
    fn test_playing_song_gets_player() {
        let view = ViewState::default().with_playing("tune.mp3");
        let html = render_page(&PageData {
            view,
            songs: vec!["other.mp3".to_string(), "tune.mp3".to_string()],
            ..Default::default()
        });
        assert!(html.contains(r#"<audio src="/assets/songs/tune.mp3" autoplay controls>"#));
        assert!(html.contains(r#"<li class="playing">tune.mp3"#));
    }

    #[test]
    fn test_notice_rendered() {
        let html = render_page(&PageData {
            notice: Some(Notice::MissingFields),
            ..Default::default()
        });
        assert!(html.contains(r#"<div class="alert warning">Please fill in both your name and your wish.</div>"#));
        assert!(html.contains("<details open>"));
    }
}
