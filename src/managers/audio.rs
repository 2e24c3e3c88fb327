use crate::audio_toolkit::constants::TRANSCRIBE_SAMPLE_RATE;
use crate::audio_toolkit::{list_input_devices, AudioRecorder};
use crate::settings::AppSettings;
use log::{debug, error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

/// Owns the microphone life-cycle for the drill.
///
/// The stream is opened on demand for each recording and closed again when
/// the recording ends, so the microphone is only live while the learner is
/// actually speaking.
pub struct AudioRecordingManager {
    state: RecordingState,
    recorder: Option<AudioRecorder>,
    selected_microphone: Option<String>,
}

impl AudioRecordingManager {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            state: RecordingState::Idle,
            recorder: None,
            selected_microphone: settings.selected_microphone.clone(),
        }
    }

    /// Resolve the configured microphone by name, falling back to the host
    /// default when it is missing or unlisted.
    fn resolve_device(&self) -> Option<cpal::Device> {
        let device_name = self.selected_microphone.as_ref()?;

        match list_input_devices() {
            Ok(devices) => {
                let found = devices
                    .into_iter()
                    .find(|d| d.name == *device_name)
                    .map(|d| d.device);
                if found.is_none() {
                    debug!("Microphone {:?} not found, using default", device_name);
                }
                found
            }
            Err(e) => {
                debug!("Failed to list devices, using default: {}", e);
                None
            }
        }
    }

    pub fn try_start_recording(&mut self) -> bool {
        if self.state != RecordingState::Idle {
            return false;
        }

        if self.recorder.is_none() {
            match AudioRecorder::new() {
                Ok(recorder) => self.recorder = Some(recorder),
                Err(e) => {
                    error!("Failed to create recorder: {}", e);
                    return false;
                }
            }
        }

        let device = self.resolve_device();
        let Some(recorder) = self.recorder.as_mut() else {
            return false;
        };

        if let Err(e) = recorder.open(device) {
            error!("Failed to open microphone stream: {}", e);
            return false;
        }
        if let Err(e) = recorder.start() {
            error!("Failed to start recording: {}", e);
            recorder.close();
            return false;
        }

        self.state = RecordingState::Recording;
        debug!("Recording started");
        true
    }

    pub fn stop_recording(&mut self) -> Option<Vec<f32>> {
        if self.state != RecordingState::Recording {
            return None;
        }
        self.state = RecordingState::Idle;

        let samples = match self.recorder.as_mut() {
            Some(recorder) => {
                let samples = match recorder.stop() {
                    Ok(buf) => buf,
                    Err(e) => {
                        error!("stop() failed: {}", e);
                        Vec::new()
                    }
                };
                recorder.close();
                samples
            }
            None => {
                error!("Recorder not available");
                Vec::new()
            }
        };

        // Pad if very short
        let s_len = samples.len();
        if s_len > 0 && s_len < TRANSCRIBE_SAMPLE_RATE as usize {
            let mut padded = samples;
            padded.resize(TRANSCRIBE_SAMPLE_RATE as usize * 5 / 4, 0.0);
            Some(padded)
        } else {
            Some(samples)
        }
    }

    /// Cancel any ongoing recording without returning audio samples
    pub fn cancel_recording(&mut self) {
        if self.state != RecordingState::Recording {
            return;
        }
        self.state = RecordingState::Idle;

        if let Some(recorder) = self.recorder.as_mut() {
            let _ = recorder.stop();
            recorder.close();
        }
        debug!("Recording cancelled");
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }
}
