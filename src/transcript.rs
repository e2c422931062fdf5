//! Transcript acquisition: session, video info, structured transcript, and the
//! caption-track fallback, each remote call bounded by its own timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::{Error, Result, Segment, Transcript, TranscriptSource};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(8);

/// Raw segment as returned by the structured transcript endpoint (milliseconds)
#[derive(Debug, Clone, Default)]
pub struct RawSegment {
    pub text: Option<String>,
    pub start_ms: Option<f64>,
    pub end_ms: Option<f64>,
}

/// A video platform able to open client sessions
#[async_trait]
pub trait Platform: Send + Sync {
    async fn create_session(&self) -> eyre::Result<Box<dyn Session>>;
}

#[async_trait]
pub trait Session: Send + Sync {
    async fn video_info(&self, video_id: &str) -> eyre::Result<Box<dyn VideoInfo>>;

    /// Flat caption list for the video, used when the structured transcript fails
    async fn captions(&self, video_id: &str) -> eyre::Result<Vec<Segment>>;
}

#[async_trait]
pub trait VideoInfo: Send + Sync {
    fn title(&self) -> Option<String>;

    /// Structured transcript; `None` when the response lacks the segment list
    async fn transcript(&self) -> eyre::Result<Option<Vec<RawSegment>>>;
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Bound applied to each remote call
    pub call_timeout: Duration,
    /// Optional bound over the whole fetch stage
    pub overall_deadline: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            overall_deadline: None,
        }
    }
}

/// Race `fut` against `bound`; the future is dropped when the timer wins.
async fn guard<T, F>(stage: &'static str, bound: Duration, fut: F) -> Result<eyre::Result<T>>
where
    F: Future<Output = eyre::Result<T>>,
{
    tokio::time::timeout(bound, fut).await.map_err(|_| {
        warn!("Timed out after {bound:?} while {stage}");
        Error::Timeout { stage, after: bound }
    })
}

/// Fetch the transcript for `video_id`, falling back to captions when the
/// structured transcript is missing or malformed.
pub async fn fetch_transcript(platform: &dyn Platform, video_id: &str, opts: &FetchOptions) -> Result<Transcript> {
    match opts.overall_deadline {
        Some(deadline) => tokio::time::timeout(deadline, fetch_stages(platform, video_id, opts.call_timeout))
            .await
            .map_err(|_| {
                warn!("Transcript fetch for {video_id} exceeded overall deadline {deadline:?}");
                Error::Timeout {
                    stage: "fetching the transcript",
                    after: deadline,
                }
            })?,
        None => fetch_stages(platform, video_id, opts.call_timeout).await,
    }
}

async fn fetch_stages(platform: &dyn Platform, video_id: &str, bound: Duration) -> Result<Transcript> {
    debug!("Initializing YouTube session");
    let session = guard("initializing the YouTube session", bound, platform.create_session())
        .await?
        .map_err(|e| Error::Init(format!("{e:#}")))?;

    debug!("Fetching video info for {video_id}");
    let info = guard("fetching video info", bound, session.video_info(video_id))
        .await?
        .map_err(|e| Error::Info(format!("{e:#}")))?;
    let title = info.title().unwrap_or_default();

    info!("Fetching transcript for video ID: {video_id}");
    let primary = match guard("fetching the transcript", bound, info.transcript()).await? {
        Ok(Some(raw)) => validate_segments(raw),
        Ok(None) => Err("Invalid transcript data structure".to_string()),
        Err(e) => Err(format!("{e:#}")),
    };

    let primary_err = match primary {
        Ok(segments) => {
            info!("Retrieved transcript with {} segments", segments.len());
            return Ok(Transcript {
                video_id: video_id.to_string(),
                title,
                source: TranscriptSource::Primary,
                segments,
            });
        }
        Err(e) => e,
    };

    warn!("Primary transcript fetch failed: {primary_err}; attempting captions fallback");
    match guard("fetching captions", bound, session.captions(video_id)).await? {
        Ok(segments) if !segments.is_empty() => {
            info!("Retrieved {} caption segments as fallback", segments.len());
            Ok(Transcript {
                video_id: video_id.to_string(),
                title,
                source: TranscriptSource::Captions,
                segments,
            })
        }
        Ok(_) => {
            warn!("Captions fallback failed: no captions available");
            Err(Error::TranscriptUnavailable(primary_err))
        }
        Err(e) => {
            warn!("Captions fallback failed: {e:#}");
            Err(Error::TranscriptUnavailable(primary_err))
        }
    }
}

/// Require a non-empty list where every segment carries text, start and end.
fn validate_segments(raw: Vec<RawSegment>) -> std::result::Result<Vec<Segment>, String> {
    if raw.is_empty() {
        return Err("Transcript contains no segments".to_string());
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, seg)| match (seg.text, seg.start_ms, seg.end_ms) {
            (Some(_), Some(start_ms), Some(end_ms)) if end_ms < start_ms => Err(format!(
                "Invalid transcript data structure: segment {i} ends before it starts"
            )),
            (Some(text), Some(start_ms), Some(end_ms)) => Ok(Segment {
                text,
                start: start_ms / 1000.0,
                duration: (end_ms - start_ms) / 1000.0,
            }),
            _ => Err(format!("Invalid transcript data structure: segment {i} is incomplete")),
        })
        .collect()
}
