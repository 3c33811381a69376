//! Video identifier extraction from the URL shapes people paste.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

static ID_TOKEN: OnceLock<Regex> = OnceLock::new();

fn id_token() -> &'static Regex {
    ID_TOKEN.get_or_init(|| {
        Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})")
            .expect("valid video id pattern")
    })
}

/// Returns the video id, or `None` when nothing in `input` looks like one.
///
/// Handles `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/embed/<id>` and
/// `/shorts/<id>`, then falls back to scanning for an 11 character id token.
pub fn resolve(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(input) {
        if let Some(id) = from_url(&url) {
            return Some(id);
        }
    }
    id_token()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

fn from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    if host == "youtu.be" || host == "www.youtu.be" {
        return url
            .path_segments()?
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string);
    }
    if !host.ends_with("youtube.com") {
        return None;
    }
    if url.path() == "/watch" {
        return url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
    }
    let mut segments = url.path_segments()?;
    match (segments.next(), segments.next()) {
        (Some("embed" | "shorts"), Some(id)) if !id.is_empty() => Some(id.to_string()),
        _ => None,
    }
}
