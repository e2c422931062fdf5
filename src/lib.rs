pub mod cache;
pub mod config;
pub mod error;
pub mod gemini;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod store;
pub mod transcript;
pub mod youtube;

use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use error::{Error, ErrorKind, Result};

/// A single timed unit of spoken text, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Which retrieval path produced the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptSource {
    Primary,
    Captions,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub source: TranscriptSource,
    pub segments: Vec<Segment>,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Primary => write!(f, "transcript"),
            TranscriptSource::Captions => write!(f, "captions"),
        }
    }
}

/// One user submission: a non-empty transcript plus an optional focused request
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    video_id: String,
    segments: Vec<Segment>,
    specific_request: Option<String>,
}

impl AnalysisRequest {
    pub fn new(video_id: impl Into<String>, segments: Vec<Segment>, specific_request: Option<String>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::EmptyTranscript);
        }
        if segments.windows(2).any(|w| w[1].start < w[0].start) {
            warn!("Transcript segments are not in chronological order; keeping input order");
        }
        Ok(Self {
            video_id: video_id.into(),
            segments,
            specific_request,
        })
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The focused request, if one was given and is not blank
    pub fn specific_request(&self) -> Option<&str> {
        self.specific_request
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:[^/\s]+/.+/|(?:v|e(?:mbed)?|shorts)/|.*[?&]v=)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("video id pattern is valid")
});

/// Extract the 11-character video ID from a YouTube URL
pub fn parse_video_id(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::InvalidUrl("Video URL is required".to_string()));
    }

    VIDEO_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, start: f64) -> Segment {
        Segment {
            text: text.to_string(),
            start,
            duration: 1.0,
        }
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=pcC4Dr6Wj2Q&t=1s").unwrap(),
            "pcC4Dr6Wj2Q"
        );
    }

    #[test]
    fn test_watch_url_v_not_first() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?feature=share&v=pcC4Dr6Wj2Q").unwrap(),
            "pcC4Dr6Wj2Q"
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(parse_video_id("https://youtu.be/pcC4Dr6Wj2Q").unwrap(), "pcC4Dr6Wj2Q");
        assert_eq!(parse_video_id("https://youtu.be/pcC4Dr6Wj2Q?si=abc").unwrap(), "pcC4Dr6Wj2Q");
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?start=30").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = parse_video_id("https://example.com/video").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert!(parse_video_id("not-a-valid-url").is_err());
    }

    #[test]
    fn test_empty_input() {
        let err = parse_video_id("   ").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(ref msg) if msg == "Video URL is required"));
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(parse_video_id("  https://youtu.be/dQw4w9WgXcQ  ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_request_rejects_empty_transcript() {
        let err = AnalysisRequest::new("dQw4w9WgXcQ", vec![], None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyTranscript);
    }

    #[test]
    fn test_request_keeps_input_order() {
        let req = AnalysisRequest::new("dQw4w9WgXcQ", vec![seg("b", 10.0), seg("a", 2.0)], None).unwrap();
        assert_eq!(req.segments()[0].text, "b");
        assert_eq!(req.segments()[1].text, "a");
    }

    #[test]
    fn test_blank_specific_request_is_none() {
        let req = AnalysisRequest::new("dQw4w9WgXcQ", vec![seg("a", 0.0)], Some("   ".into())).unwrap();
        assert_eq!(req.specific_request(), None);
        let req = AnalysisRequest::new("dQw4w9WgXcQ", vec![seg("a", 0.0)], Some(" recipes ".into())).unwrap();
        assert_eq!(req.specific_request(), Some("recipes"));
    }
}
