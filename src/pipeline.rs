//! Parser → Fetcher → Prompt Builder → Requester, strictly in that order.

use log::info;

use crate::gemini::GeminiClient;
use crate::prompt::build_prompt;
use crate::transcript::{FetchOptions, Platform, fetch_transcript};
use crate::{AnalysisRequest, Result, Segment, Transcript, parse_video_id};

pub struct Pipeline {
    platform: Box<dyn Platform>,
    analyzer: GeminiClient,
    fetch_options: FetchOptions,
}

impl Pipeline {
    pub fn new(platform: Box<dyn Platform>, analyzer: GeminiClient, fetch_options: FetchOptions) -> Self {
        Self {
            platform,
            analyzer,
            fetch_options,
        }
    }

    /// Parse the URL and fetch its transcript
    pub async fn fetch(&self, video_url: &str) -> Result<Transcript> {
        let video_id = parse_video_id(video_url)?;
        fetch_transcript(self.platform.as_ref(), &video_id, &self.fetch_options).await
    }

    /// Analyze an already retrieved transcript
    pub async fn analyze_transcript(
        &self,
        video_id: &str,
        segments: Vec<Segment>,
        specific_request: Option<String>,
    ) -> Result<String> {
        let request = AnalysisRequest::new(video_id, segments, specific_request)?;
        info!("Processing transcript with {} segments", request.segments().len());

        let prompt = build_prompt(&request);
        self.analyzer.generate(&prompt).await
    }

    /// Fetch and analyze in one go, without a confirmation step
    pub async fn analyze(&self, video_url: &str, specific_request: Option<String>) -> Result<String> {
        let transcript = self.fetch(video_url).await?;
        self.analyze_transcript(&transcript.video_id, transcript.segments, specific_request)
            .await
    }
}
