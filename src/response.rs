use serde::Serialize;

use crate::{Error, ErrorKind, Segment};

const MODEL_ERROR_DETAILS: &str =
    "The specified model is not available. Please check your Gemini API key and model configuration.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Analysis {
        analysis: String,
    },
    Transcript {
        transcript: Vec<Segment>,
    },
    Failure {
        error: String,
        details: String,
        #[serde(rename = "originalError", skip_serializing_if = "Option::is_none")]
        original_error: Option<String>,
    },
}

/// What the caller renders: an HTTP-style status plus a JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: Body,
}

impl Response {
    pub fn analysis(text: String) -> Self {
        Self {
            status: 200,
            body: Body::Analysis { analysis: text },
        }
    }

    pub fn transcript(segments: Vec<Segment>) -> Self {
        Self {
            status: 200,
            body: Body::Transcript { transcript: segments },
        }
    }

    pub fn failure(err: &Error) -> Self {
        let kind = err.kind();
        let body = match kind {
            ErrorKind::ProviderModelError => Body::Failure {
                error: kind.as_str().to_string(),
                details: MODEL_ERROR_DETAILS.to_string(),
                original_error: Some(err.to_string()),
            },
            _ => Body::Failure {
                error: kind.as_str().to_string(),
                details: err.to_string(),
                original_error: None,
            },
        };

        Self {
            status: kind.status(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_default()
    }
}

impl From<crate::Result<String>> for Response {
    fn from(result: crate::Result<String>) -> Self {
        match result {
            Ok(text) => Response::analysis(text),
            Err(e) => Response::failure(&e),
        }
    }
}
