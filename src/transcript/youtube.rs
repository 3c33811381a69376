//! YouTube caption tracks.
//!
//! The watch page embeds the player response, whose `captionTracks` list
//! carries one signed `baseUrl` per track. The chosen track is downloaded in
//! the `json3` timed-text format.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{FetchError, TranscriptSource};
use crate::types::{Segment, Transcript, VideoDetails};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";
const VIDEO_DETAILS_KEY: &str = "\"videoDetails\":";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: TrackName,
    /// "asr" for auto-generated tracks
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Deserialize)]
struct TextRun {
    text: String,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn display_name(&self) -> String {
        match &self.name.simple_text {
            Some(text) => text.clone(),
            None => self.name.runs.iter().map(|run| run.text.as_str()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideoDetails {
    title: String,
    author: String,
    /// Sent as a decimal string
    length_seconds: String,
    #[serde(default)]
    thumbnail: RawThumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct RawThumbnails {
    #[serde(default)]
    thumbnails: Vec<RawThumbnail>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedSeg {
    #[serde(default)]
    utf8: String,
}

pub struct YoutubeTranscriptSource {
    client: Client,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    /// `languages` lists preferred language codes, most preferred first.
    pub fn new(languages: Vec<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        Ok(Self { client, languages })
    }

    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unknown(format!("{} returned {}", url, status)));
        }
        response
            .text()
            .map_err(|e| FetchError::Unknown(e.to_string()))
    }
}

impl TranscriptSource for YoutubeTranscriptSource {
    fn fetch(&self, video_id: &str) -> Result<Transcript, FetchError> {
        let html = self.get_text(WATCH_URL, &[("v", video_id)])?;
        let details = video_details(&html);
        let tracks = caption_tracks(&html)?;
        debug!(video_id, tracks = tracks.len(), "found caption tracks");
        let track = select_track(&tracks, &self.languages).ok_or(FetchError::NoTranscriptFound)?;
        info!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "downloading caption track"
        );
        let body = self.get_text(&track.base_url, &[("fmt", "json3")])?;
        let segments = parse_json3(&body)?;
        Ok(Transcript {
            segments,
            language: Some(track.display_name()),
            language_code: Some(track.language_code.clone()),
            is_generated: Some(track.is_generated()),
            details,
        })
    }
}

fn caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, FetchError> {
    let Some(raw) = extract_json_value(html, CAPTION_TRACKS_KEY, b'[', b']') else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(FetchError::Unknown(
                "request blocked by a captcha; too many requests".to_string(),
            ));
        }
        if html.contains("\"playabilityStatus\":{\"status\":\"ERROR\"") {
            return Err(FetchError::Unknown("video is unavailable".to_string()));
        }
        return Err(FetchError::TranscriptsDisabled);
    };
    serde_json::from_str(raw)
        .map_err(|e| FetchError::Unknown(format!("malformed caption track list: {}", e)))
}

/// Metadata is optional; a page without usable details only logs a warning.
fn video_details(html: &str) -> Option<VideoDetails> {
    let Some(raw) = extract_json_value(html, VIDEO_DETAILS_KEY, b'{', b'}') else {
        warn!("watch page has no video details; continuing without them");
        return None;
    };
    match parse_video_details(raw) {
        Ok(details) => Some(details),
        Err(err) => {
            warn!(error = %err, "could not load video details; continuing without them");
            None
        }
    }
}

fn parse_video_details(raw: &str) -> Result<VideoDetails, String> {
    let details: RawVideoDetails = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let length_seconds = details
        .length_seconds
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid lengthSeconds {:?}: {}", details.length_seconds, e))?;
    Ok(VideoDetails {
        title: details.title,
        author: details.author,
        length_seconds,
        // thumbnails are listed smallest first
        thumbnail_url: details.thumbnail.thumbnails.into_iter().last().map(|t| t.url),
    })
}

/// Manual tracks win over generated ones for the same language; earlier
/// languages win over later ones.
fn select_track<'t>(tracks: &'t [CaptionTrack], languages: &[String]) -> Option<&'t CaptionTrack> {
    languages.iter().find_map(|code| {
        let matching = move || tracks.iter().filter(move |t| &t.language_code == code);
        matching()
            .find(|t| !t.is_generated())
            .or_else(|| matching().find(|t| t.is_generated()))
    })
}

fn parse_json3(body: &str) -> Result<Vec<Segment>, FetchError> {
    let timed: TimedText = serde_json::from_str(body)
        .map_err(|e| FetchError::Unknown(format!("malformed timed text: {}", e)))?;
    Ok(timed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|seg| seg.utf8.as_str()).collect();
            let text = text.replace('\n', " ");
            let text = text.trim();
            (!text.is_empty()).then(|| Segment {
                text: text.to_string(),
                start_time: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}

/// Slice out the JSON array or object that follows `key`, delimited by
/// `open`/`close`, honoring nesting and string literals.
fn extract_json_value<'a>(html: &'a str, key: &str, open: u8, close: u8) -> Option<&'a str> {
    let after_key = html.find(key)? + key.len();
    let start = after_key + html[after_key..].find(open as char)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &byte) in html.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if byte == b'"' {
            in_string = true;
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(&html[start..=start + offset]);
            }
        }
    }
    None
}
