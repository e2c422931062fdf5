use crate::{AnalysisRequest, Segment};

/// Render a start offset as `M:SS`
pub fn format_timestamp(start: f64) -> String {
    let start = start.max(0.0);
    let minutes = (start / 60.0).floor() as u64;
    let seconds = (start % 60.0).floor() as u64;
    format!("{minutes}:{seconds:02}")
}

/// One `[M:SS] text` line per segment, in input order
pub fn format_transcript(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("[{}] {}", format_timestamp(s.start), s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt sent to the provider
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let transcript = format_transcript(request.segments());

    match request.specific_request() {
        Some(specific) => focused_prompt(request.video_id(), specific, &transcript),
        None => summary_prompt(&transcript),
    }
}

fn focused_prompt(video_id: &str, specific: &str, transcript: &str) -> String {
    format!(
        "You are an expert video content analyzer with the ability to extract specific information from video transcripts.

I have a YouTube video with ID: {video_id}
The user has requested: \"{specific}\"

Below is the transcript with timestamps. Please focus specifically on what the user requested.
Include relevant timestamps in your response to help the user navigate to the important parts of the video.

Format your response in markdown with clear sections and use timestamps like [MM:SS] when referring to specific parts of the video.
If the request asks for specific information that isn't in the transcript, clearly state that.

TRANSCRIPT WITH TIMESTAMPS:
{transcript}"
    )
}

fn summary_prompt(transcript: &str) -> String {
    format!(
        "You are an expert video content analyzer. Your task is to analyze video transcripts and provide insightful, well-structured summaries.

Format your response in markdown with the following sections:
1. **Summary**: A concise 2-3 sentence overview of what the video is about
2. **Key Points**: 3-5 main ideas or arguments presented in the video with timestamps [MM:SS]
3. **Insights**: 2-3 deeper observations or implications from the content
4. **Highlights**: 3-5 notable moments in the video with their timestamps [MM:SS]
5. **Audience**: Who would find this video most valuable
6. **Conclusion**: A brief closing thought

Keep your analysis professional, clear, and easy to read. Use headings (##) for each section.
Include timestamps [MM:SS] when referring to specific parts of the video to help the user navigate to important moments.

TRANSCRIPT WITH TIMESTAMPS:
{transcript}"
    )
}
