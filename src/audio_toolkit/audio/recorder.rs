use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use log::{debug, error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::resampler::{mix_to_mono, FrameResampler};
use crate::audio_toolkit::constants::TRANSCRIBE_SAMPLE_RATE;

// Output frame duration used to regroup resampled capture.
const CAPTURE_FRAME_DUR: Duration = Duration::from_millis(20);

/// State shared with the cpal callback thread.
struct CaptureShared {
    samples: Mutex<Vec<f32>>,
    resampler: Mutex<Option<FrameResampler>>,
    collecting: AtomicBool,
}

impl CaptureShared {
    fn push(&self, data: &[f32], channels: usize) {
        if !self.collecting.load(Ordering::Relaxed) {
            return;
        }

        let mono = mix_to_mono(data, channels);
        let mut resampler = self.resampler.lock().unwrap();
        if let Some(ref mut resampler) = *resampler {
            let mut samples = self.samples.lock().unwrap();
            resampler.push(&mono, |frame| samples.extend_from_slice(frame));
        }
    }
}

/// Microphone capture that always delivers mono samples at
/// [`TRANSCRIBE_SAMPLE_RATE`].
///
/// The stream is opened at the device's native configuration; channel mixdown
/// and resampling happen inside the capture callback. `open` / `close` manage
/// the stream, `start` / `stop` bracket one recording.
pub struct AudioRecorder {
    stream: Option<cpal::Stream>,
    shared: Arc<CaptureShared>,
}

impl AudioRecorder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            stream: None,
            shared: Arc::new(CaptureShared {
                samples: Mutex::new(Vec::new()),
                resampler: Mutex::new(None),
                collecting: AtomicBool::new(false),
            }),
        })
    }

    /// Open the capture stream on `device`, or the host default when `None`.
    pub fn open(&mut self, device: Option<cpal::Device>) -> Result<()> {
        if self.stream.is_some() {
            debug!("Capture stream already open");
            return Ok(());
        }

        let device = match device {
            Some(device) => device,
            None => super::device::default_input_device()
                .ok_or_else(|| anyhow!("No input device available"))?,
        };

        let supported = device.default_input_config()?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        let channels = config.channels as usize;
        let in_hz = config.sample_rate.0 as usize;

        debug!(
            "Opening capture stream on {:?}: {} Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "<unnamed>".to_string()),
            in_hz,
            channels,
            sample_format
        );

        *self.shared.resampler.lock().unwrap() = Some(FrameResampler::new(
            in_hz,
            TRANSCRIBE_SAMPLE_RATE as usize,
            CAPTURE_FRAME_DUR,
        ));

        let stream = match sample_format {
            SampleFormat::F32 => {
                let shared = self.shared.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        shared.push(data, channels);
                    },
                    |e| error!("Capture stream error: {}", e),
                    None,
                )?
            }
            SampleFormat::I16 => {
                let shared = self.shared.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let floats: Vec<f32> =
                            data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                        shared.push(&floats, channels);
                    },
                    |e| error!("Capture stream error: {}", e),
                    None,
                )?
            }
            other => return Err(anyhow!("Unsupported input sample format: {:?}", other)),
        };

        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Begin collecting samples. Clears anything left from a prior recording.
    pub fn start(&self) -> Result<()> {
        if self.stream.is_none() {
            return Err(anyhow!("Capture stream is not open"));
        }

        self.shared.samples.lock().unwrap().clear();
        if let Some(ref mut resampler) = *self.shared.resampler.lock().unwrap() {
            resampler.reset();
        }
        self.shared.collecting.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Stop collecting and return the recording.
    pub fn stop(&self) -> Result<Vec<f32>> {
        self.shared.collecting.store(false, Ordering::Relaxed);

        // Flush the resampler tail into the buffer before draining it.
        {
            let mut resampler = self.shared.resampler.lock().unwrap();
            if let Some(ref mut resampler) = *resampler {
                let mut samples = self.shared.samples.lock().unwrap();
                resampler.finish(|frame| samples.extend_from_slice(frame));
            }
        }

        let samples = std::mem::take(&mut *self.shared.samples.lock().unwrap());
        debug!("Captured {} samples", samples.len());
        Ok(samples)
    }

    /// Tear down the capture stream. The recorder can be reopened later.
    pub fn close(&mut self) {
        self.shared.collecting.store(false, Ordering::Relaxed);
        self.stream = None;
        *self.shared.resampler.lock().unwrap() = None;
        self.shared.samples.lock().unwrap().clear();
        debug!("Capture stream closed");
    }
}
