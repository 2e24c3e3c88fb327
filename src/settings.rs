use crate::managers::session::PracticeMode;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lower bound of the practice number range.
pub const NUMBER_MIN: u32 = 1;
/// Upper bound of the practice number range.
pub const NUMBER_MAX: u32 = 100;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CloudTranscriptionProvider {
    pub id: String,
    pub label: String,
    pub base_url: String,
}

/// TTS voice configuration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TtsVoiceConfig {
    pub base_url: String,
    pub model: String,
    pub voice: String,
    pub format: String,
}

impl Default for TtsVoiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            format: "mp3".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    #[serde(default = "default_number_start")]
    pub number_start: u32,
    #[serde(default = "default_number_end")]
    pub number_end: u32,
    #[serde(default = "default_threshold_great")]
    pub threshold_great: u8,
    #[serde(default = "default_threshold_close")]
    pub threshold_close: u8,
    #[serde(default = "default_practice_mode")]
    pub practice_mode: PracticeMode,
    #[serde(default)]
    pub tolerance: bool,
    #[serde(default)]
    pub selected_microphone: Option<String>,
    #[serde(default = "default_selected_language")]
    pub selected_language: String,
    #[serde(default = "default_transcription_provider")]
    pub transcription_provider: CloudTranscriptionProvider,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    #[serde(default)]
    pub tts_voice: TtsVoiceConfig,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl AppSettings {
    /// Repairs inconsistent practice values instead of erroring: a reversed
    /// range is swapped, out-of-range values are clamped, and the close
    /// threshold is never allowed above the great threshold.
    pub fn normalize_practice_fields(&mut self) {
        if self.number_start > self.number_end {
            std::mem::swap(&mut self.number_start, &mut self.number_end);
        }
        self.number_start = self.number_start.clamp(NUMBER_MIN, NUMBER_MAX);
        self.number_end = self.number_end.clamp(NUMBER_MIN, NUMBER_MAX);

        self.threshold_great = self.threshold_great.clamp(70, 95);
        self.threshold_close = self.threshold_close.clamp(50, 90);
        if self.threshold_close > self.threshold_great {
            self.threshold_close = self.threshold_great;
        }
    }
}

fn default_number_start() -> u32 {
    1
}

fn default_number_end() -> u32 {
    20
}

fn default_threshold_great() -> u8 {
    85
}

fn default_threshold_close() -> u8 {
    70
}

fn default_practice_mode() -> PracticeMode {
    PracticeMode::Sequential
}

fn default_selected_language() -> String {
    "en".to_string()
}

fn default_transcription_provider() -> CloudTranscriptionProvider {
    CloudTranscriptionProvider {
        id: "openai".to_string(),
        label: "OpenAI".to_string(),
        base_url: "https://api.openai.com/v1".to_string(),
    }
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_api_key_env() -> String {
    "CHIRP_API_KEY".to_string()
}

pub fn get_default_settings() -> AppSettings {
    AppSettings {
        number_start: default_number_start(),
        number_end: default_number_end(),
        threshold_great: default_threshold_great(),
        threshold_close: default_threshold_close(),
        practice_mode: default_practice_mode(),
        tolerance: false,
        selected_microphone: None,
        selected_language: default_selected_language(),
        transcription_provider: default_transcription_provider(),
        transcription_model: default_transcription_model(),
        tts_voice: TtsVoiceConfig::default(),
        api_key_env: default_api_key_env(),
    }
}

/// Reads the settings file, creating it with defaults when missing. A file
/// that fails to parse falls back to defaults rather than aborting the run.
pub fn load_or_create_settings(path: &Path) -> Result<AppSettings> {
    let mut settings = if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {:?}", path))?;
        match serde_json::from_str::<AppSettings>(&raw) {
            Ok(settings) => {
                debug!("Found existing settings: {:?}", settings);
                settings
            }
            Err(e) => {
                warn!("Failed to parse settings file {:?}: {}", path, e);
                get_default_settings()
            }
        }
    } else {
        let defaults = get_default_settings();
        write_settings(path, &defaults)?;
        defaults
    };

    settings.normalize_practice_fields();
    Ok(settings)
}

pub fn write_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    let raw = serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, raw).with_context(|| format!("failed to write settings file {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_and_thresholds() {
        let settings = get_default_settings();
        assert_eq!(settings.number_start, 1);
        assert_eq!(settings.number_end, 20);
        assert_eq!(settings.threshold_great, 85);
        assert_eq!(settings.threshold_close, 70);
        assert_eq!(settings.practice_mode, PracticeMode::Sequential);
        assert!(!settings.tolerance);
    }

    #[test]
    fn test_normalize_swaps_reversed_range() {
        let mut settings = get_default_settings();
        settings.number_start = 30;
        settings.number_end = 10;
        settings.normalize_practice_fields();
        assert_eq!(settings.number_start, 10);
        assert_eq!(settings.number_end, 30);
    }

    #[test]
    fn test_normalize_clamps_thresholds() {
        let mut settings = get_default_settings();
        settings.threshold_great = 99;
        settings.threshold_close = 10;
        settings.normalize_practice_fields();
        assert_eq!(settings.threshold_great, 95);
        assert_eq!(settings.threshold_close, 50);
    }

    #[test]
    fn test_normalize_keeps_close_at_or_below_great() {
        let mut settings = get_default_settings();
        settings.threshold_great = 70;
        settings.threshold_close = 90;
        settings.normalize_practice_fields();
        assert!(settings.threshold_close <= settings.threshold_great);
    }

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        let parsed: AppSettings =
            serde_json::from_str(r#"{"number_start": 3, "tolerance": true}"#).unwrap();
        assert_eq!(parsed.number_start, 3);
        assert!(parsed.tolerance);
        assert_eq!(parsed.number_end, 20);
        assert_eq!(parsed.transcription_model, "whisper-1");
        assert_eq!(parsed.api_key_env, "CHIRP_API_KEY");
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chirp.json");

        let settings = load_or_create_settings(&path).unwrap();
        assert!(path.exists());
        assert_eq!(settings.number_end, 20);

        // Second load reads the file it just wrote.
        let reloaded = load_or_create_settings(&path).unwrap();
        assert_eq!(reloaded.threshold_great, settings.threshold_great);
    }
}
