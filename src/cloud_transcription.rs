use crate::audio_toolkit::audio::load_wav_file;
use crate::audio_toolkit::constants::TRANSCRIBE_SAMPLE_RATE;
use crate::settings::CloudTranscriptionProvider;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// The two failure outcomes the drill distinguishes. Both surface as a retry
/// prompt; neither ends the session.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("no speech was recognized in the recording")]
    NoSpeech,
    #[error("transcription service unavailable: {0}")]
    ServiceUnavailable(String),
}

fn samples_to_wav(samples: &[f32]) -> Result<Vec<u8>, TranscriptionError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TRANSCRIBE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut buffer, spec).map_err(|e| {
            TranscriptionError::ServiceUnavailable(format!("failed to create WAV writer: {}", e))
        })?;

        for &sample in samples {
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(sample_i16).map_err(|e| {
                TranscriptionError::ServiceUnavailable(format!("failed to write sample: {}", e))
            })?;
        }

        writer.finalize().map_err(|e| {
            TranscriptionError::ServiceUnavailable(format!("failed to finalize WAV: {}", e))
        })?;
    }

    Ok(buffer.into_inner())
}

fn build_headers(api_key: &str) -> Result<HeaderMap, TranscriptionError> {
    let mut headers = HeaderMap::new();

    if !api_key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                TranscriptionError::ServiceUnavailable(format!(
                    "invalid authorization header value: {}",
                    e
                ))
            })?,
        );
    }

    Ok(headers)
}

/// Trims the raw service output and rejects results that carry no speech.
/// Whisper-style endpoints mark silent clips with bracketed tags like
/// `[BLANK_AUDIO]`.
fn finalize_transcript(raw: &str) -> Result<String, TranscriptionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || (trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Err(TranscriptionError::NoSpeech);
    }
    Ok(trimmed.to_string())
}

/// Transcribe the hand-off WAV file written after a recording.
pub async fn transcribe_file(
    provider: &CloudTranscriptionProvider,
    api_key: &str,
    model: &str,
    path: &Path,
    language: Option<&str>,
) -> Result<String, TranscriptionError> {
    let samples = load_wav_file(path).map_err(|e| {
        TranscriptionError::ServiceUnavailable(format!("failed to read hand-off file: {}", e))
    })?;
    transcribe(provider, api_key, model, samples, language).await
}

pub async fn transcribe(
    provider: &CloudTranscriptionProvider,
    api_key: &str,
    model: &str,
    audio_samples: Vec<f32>,
    language: Option<&str>,
) -> Result<String, TranscriptionError> {
    if api_key.trim().is_empty() {
        return Err(TranscriptionError::ServiceUnavailable(format!(
            "API key is required for cloud transcription with {}",
            provider.label
        )));
    }

    if audio_samples.is_empty() {
        return Err(TranscriptionError::NoSpeech);
    }

    debug!(
        "Starting cloud transcription with provider '{}' (model: {}, samples: {})",
        provider.id,
        model,
        audio_samples.len()
    );

    let wav_data = samples_to_wav(&audio_samples)?;
    debug!("Converted audio to WAV format ({} bytes)", wav_data.len());

    let base_url = provider.base_url.trim_end_matches('/');
    let url = format!("{}/audio/transcriptions", base_url);
    debug!("Sending transcription request to: {}", url);

    let headers = build_headers(api_key)?;
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .map_err(|e| {
            TranscriptionError::ServiceUnavailable(format!("failed to build HTTP client: {}", e))
        })?;

    let audio_part = Part::bytes(wav_data)
        .file_name("audio.wav")
        .mime_str("audio/wav")
        .map_err(|e| {
            TranscriptionError::ServiceUnavailable(format!("failed to create audio part: {}", e))
        })?;

    let mut form = Form::new()
        .part("file", audio_part)
        .text("model", model.to_string())
        .text("response_format", "text")
        .text("temperature", "0");

    if let Some(lang) = language {
        if !lang.is_empty() && lang != "auto" {
            form = form.text("language", lang.to_string());
        }
    }

    let response = client.post(&url).multipart(form).send().await.map_err(|e| {
        TranscriptionError::ServiceUnavailable(format!("HTTP request failed: {}", e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        return Err(TranscriptionError::ServiceUnavailable(format!(
            "status {}: {}",
            status, error_text
        )));
    }

    let transcription = response.text().await.map_err(|e| {
        TranscriptionError::ServiceUnavailable(format!(
            "failed to read transcription response: {}",
            e
        ))
    })?;

    debug!(
        "Cloud transcription completed. Output length: {} chars",
        transcription.len()
    );

    finalize_transcript(&transcription)
}
