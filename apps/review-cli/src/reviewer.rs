//! Claude API client for specification review.
//!
//! Single-model design: every review runs against one pinned model. Rate
//! limits and connection failures retry with exponential backoff; other API
//! errors surface immediately.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use review_types::{Finding, ReviewResult};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::prompts;

/// Single allowed model for this tool.
pub const MODEL: &str = "claude-opus-4-5-20251101";

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 32_768;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 600;

pub fn api_key() -> Result<String> {
    std::env::var("ANTHROPIC_API_KEY")
        .context("ANTHROPIC_API_KEY environment variable not set")
}

/// Send the combined specifications for review.
pub async fn review_specs(combined_content: &str, verbose: bool) -> Result<ReviewResult> {
    let key = api_key()?;
    let started = Instant::now();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    let payload = json!({
        "model": MODEL,
        "max_tokens": MAX_OUTPUT_TOKENS,
        "system": prompts::SYSTEM_PROMPT,
        "messages": [
            { "role": "user", "content": prompts::user_message(combined_content) }
        ],
    });

    let mut last_error = String::new();

    for attempt in 0..MAX_RETRIES {
        if verbose {
            info!("Calling the review model (attempt {}/{})", attempt + 1, MAX_RETRIES);
        }

        let response = match client
            .post(API_URL)
            .header("x-api-key", &key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                last_error = format!("Connection error: {}", e);
                let wait = Duration::from_secs(5 * 2u64.pow(attempt));
                warn!("{}; retrying in {}s", last_error, wait.as_secs());
                tokio::time::sleep(wait).await;
                continue;
            }
        };

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            last_error = format!("Rate limit: {}", response.status());
            let wait = Duration::from_secs(10 * 2u64.pow(attempt));
            warn!("{}; retrying in {}s", last_error, wait.as_secs());
            tokio::time::sleep(wait).await;
            continue;
        }

        if !response.status().is_success() {
            bail!("Review call failed with status {}", response.status());
        }

        let body: Value = response.json().await.context("Failed to parse API response")?;
        let raw_response =
            extract_response_text(&body).context("Response missing text content")?;
        let (input_tokens, output_tokens) = extract_usage(&body);

        return Ok(ReviewResult {
            findings: parse_findings(&raw_response),
            raw_response,
            model: MODEL.to_string(),
            input_tokens,
            output_tokens,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        });
    }

    bail!("Failed after {} attempts. Last error: {}", MAX_RETRIES, last_error)
}

/// Response text is the concatenation of all `content[].text` blocks.
fn extract_response_text(body: &Value) -> Option<String> {
    let content = body.get("content")?.as_array()?;
    let mut chunks = Vec::new();
    for part in content {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            chunks.push(text.to_string());
        }
    }
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

fn extract_usage(body: &Value) -> (u64, u64) {
    let usage = body.get("usage");
    let input = usage
        .and_then(|u| u.get("input_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output = usage
        .and_then(|u| u.get("output_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    (input, output)
}

/// Extract findings from the model response.
///
/// The prompt asks for an analysis summary followed by a single top-level
/// JSON array. Candidate slices are tried from each `[` through the last
/// `]` so a bracket inside the prose summary cannot derail parsing.
/// Entries that fail to deserialize or lack an issue are skipped.
pub(crate) fn parse_findings(response: &str) -> Vec<Finding> {
    let Some(last) = response.rfind(']') else {
        return Vec::new();
    };

    for (start, _) in response.match_indices('[') {
        if start > last {
            break;
        }
        let candidate = &response[start..=last];
        if let Ok(values) = serde_json::from_str::<Vec<Value>>(candidate) {
            return values
                .into_iter()
                .filter_map(|v| serde_json::from_value::<Finding>(v).ok())
                .filter(|f| !f.issue.trim().is_empty())
                .collect();
        }
    }

    Vec::new()
}
