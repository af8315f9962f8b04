use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use thiserror::Error;

use crate::models::ResumeAnalysis;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OpenAI returned no content")]
    EmptyContent,
}

/// The analysis either parsed into the expected shape or it didn't. A
/// model response we cannot read is not a failure of the request; callers
/// render it as "analysis unavailable" (the proxy sends all-empty arrays).
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Ready(ResumeAnalysis),
    Unavailable,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Resume-review client for the OpenAI chat-completions API.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    api_key: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Returns None when OPENAI_API_KEY is unset; the surrounding layer
    /// decides whether that is a 503 or a friendly CLI message.
    pub fn from_env() -> Option<Self> {
        env::var("OPENAI_API_KEY").ok().map(Self::new)
    }

    /// One review round-trip. No retries, no client-side timeout beyond
    /// what reqwest enforces; a request in flight is prevented upstream by
    /// disabling the trigger, not by cancellation.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let prompt = build_prompt(resume_text, job_description);
        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, message });
        }

        let body: ChatResponse = response.json().await?;
        let text = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or(AnalysisError::EmptyContent)?;

        Ok(match extract_analysis(text) {
            Some(analysis) => AnalysisOutcome::Ready(analysis),
            None => AnalysisOutcome::Unavailable,
        })
    }
}

fn build_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "You are a resume coach. Given the resume text and optional job description,\n\
         return STRICT JSON with keys: strengths, improvements, tailoring (arrays of strings).\n\
         No prose. Example:\n\
         {{\n  \"strengths\": [\"...\"],\n  \"improvements\": [\"...\"],\n  \"tailoring\": [\"...\"]\n}}\n\n\
         Resume:\n{resume_text}\n\n\
         Job description (optional):\n{job_description}"
    )
}

/// Pulls a structured analysis out of a model response that may or may not
/// be clean JSON. Tries the whole text first, then the first-`{`-to-last-`}`
/// substring, then gives up. Fields that are not arrays coerce to empty.
pub fn extract_analysis(text: &str) -> Option<ResumeAnalysis> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(coerce(&value));
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let value: Value = serde_json::from_str(&text[start..=end]).ok()?;
    Some(coerce(&value))
}

fn coerce(value: &Value) -> ResumeAnalysis {
    ResumeAnalysis {
        strengths: string_array(value, "strengths"),
        improvements: string_array(value, "improvements"),
        tailoring: string_array(value, "tailoring"),
    }
}

fn string_array(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
