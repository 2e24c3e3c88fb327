use crate::settings::TtsVoiceConfig;
use anyhow::{anyhow, Context, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::json;

/// Synthesize the reference clip for a word string.
///
/// Posts to an OpenAI-compatible `/audio/speech` endpoint and returns the
/// encoded clip bytes (format per the voice config, mp3 by default).
pub async fn synthesize(voice: &TtsVoiceConfig, api_key: &str, text: &str) -> Result<Vec<u8>> {
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key is required for speech synthesis"));
    }

    let base_url = voice.base_url.trim_end_matches('/');
    let url = format!("{}/audio/speech", base_url);
    debug!("Sending synthesis request to: {} (voice: {})", url, voice.voice);

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .context("invalid authorization header value")?,
    );

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .context("failed to build HTTP client")?;

    let request_body = json!({
        "model": voice.model,
        "voice": voice.voice,
        "input": text,
        "response_format": voice.format,
    });

    let response = client
        .post(&url)
        .json(&request_body)
        .send()
        .await
        .context("speech synthesis request failed")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        return Err(anyhow!(
            "speech synthesis failed with status {}: {}",
            status,
            error_text
        ));
    }

    let bytes = response
        .bytes()
        .await
        .context("failed to read synthesis response")?;

    debug!("Synthesized {} bytes for {:?}", bytes.len(), text);
    Ok(bytes.to_vec())
}
