use crate::Transcript;
use crate::prompt::format_transcript;

/// Render transcript as `[M:SS] text` lines
pub fn render_text(transcript: &Transcript) -> String {
    format_transcript(&transcript.segments)
}

/// Render transcript as the `{ "transcript": [...] }` payload
pub fn render_json(transcript: &Transcript) -> String {
    crate::response::Response::transcript(transcript.segments.clone()).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Segment, TranscriptSource};

    fn sample_transcript() -> Transcript {
        Transcript {
            video_id: "test1234567".to_string(),
            title: "Test Video".to_string(),
            source: TranscriptSource::Primary,
            segments: vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "This is a test".to_string(),
                    start: 61.5,
                    duration: 2.0,
                },
            ],
        }
    }

    #[test]
    fn test_render_text() {
        let output = render_text(&sample_transcript());
        assert_eq!(output, "[0:00] Hello world\n[1:01] This is a test");
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample_transcript())).unwrap();
        assert_eq!(json["transcript"][1]["text"], "This is a test");
        assert_eq!(json["transcript"][1]["start"], 61.5);
    }

    #[test]
    fn test_render_text_empty() {
        let t = Transcript {
            segments: vec![],
            ..sample_transcript()
        };
        assert_eq!(render_text(&t), "");
    }
}
