use rubato::{FftFixedIn, Resampler};
use std::time::Duration;

// Fixed input chunk size fed to rubato.
const RESAMPLER_CHUNK_SIZE: usize = 1024;

/// Streaming mono resampler that emits fixed-duration frames.
///
/// Input is buffered into `RESAMPLER_CHUNK_SIZE` chunks for the FFT
/// resampler; output is regrouped into frames of `frame_dur` at the output
/// rate. When input and output rates match, samples pass straight through to
/// the frame regrouping stage.
pub struct FrameResampler {
    resampler: Option<FftFixedIn<f32>>,
    chunk_in: usize,
    in_buf: Vec<f32>,
    frame_samples: usize,
    pending: Vec<f32>,
}

impl FrameResampler {
    pub fn new(in_hz: usize, out_hz: usize, frame_dur: Duration) -> Self {
        let frame_samples = ((out_hz as f64 * frame_dur.as_secs_f64()).round()) as usize;
        assert!(frame_samples > 0, "frame duration too short");

        let chunk_in = RESAMPLER_CHUNK_SIZE;

        let resampler = (in_hz != out_hz).then(|| {
            FftFixedIn::<f32>::new(in_hz, out_hz, chunk_in, 1, 1)
                .expect("Failed to create resampler")
        });

        Self {
            resampler,
            chunk_in,
            in_buf: Vec::with_capacity(chunk_in),
            frame_samples,
            pending: Vec::with_capacity(frame_samples),
        }
    }

    /// Drops buffered input and pending output so the next capture starts
    /// clean. The tail of a previous recording must never leak into a new one.
    pub fn reset(&mut self) {
        self.in_buf.clear();
        self.pending.clear();
    }

    pub fn push(&mut self, mut src: &[f32], mut emit: impl FnMut(&[f32])) {
        if self.resampler.is_none() {
            self.emit_frames(src, &mut emit);
            return;
        }

        while !src.is_empty() {
            let space = self.chunk_in - self.in_buf.len();
            let take = space.min(src.len());
            self.in_buf.extend_from_slice(&src[..take]);
            src = &src[take..];

            if self.in_buf.len() == self.chunk_in {
                if let Some(ref mut resampler) = self.resampler {
                    if let Ok(out) = resampler.process(&[&self.in_buf[..]], None) {
                        self.emit_frames(&out[0], &mut emit);
                    }
                }
                self.in_buf.clear();
            }
        }
    }

    pub fn finish(&mut self, mut emit: impl FnMut(&[f32])) {
        // Process any remaining input samples
        if let Some(ref mut resampler) = self.resampler {
            if !self.in_buf.is_empty() {
                // Pad with zeros to reach chunk size
                self.in_buf.resize(self.chunk_in, 0.0);
                if let Ok(out) = resampler.process(&[&self.in_buf[..]], None) {
                    self.emit_frames(&out[0], &mut emit);
                }
                self.in_buf.clear();
            }
        }

        // Emit any remaining pending frame (padded with zeros)
        if !self.pending.is_empty() {
            self.pending.resize(self.frame_samples, 0.0);
            emit(&self.pending);
            self.pending.clear();
        }
    }

    fn emit_frames(&mut self, mut data: &[f32], emit: &mut impl FnMut(&[f32])) {
        while !data.is_empty() {
            let space = self.frame_samples - self.pending.len();
            let take = space.min(data.len());
            self.pending.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.pending.len() == self.frame_samples {
                emit(&self.pending);
                self.pending.clear();
            }
        }
    }
}

/// Average interleaved samples down to a single channel.
pub fn mix_to_mono(samples: &[f32], num_channels: usize) -> Vec<f32> {
    if num_channels <= 1 {
        return samples.to_vec();
    }

    let num_frames = samples.len() / num_channels;
    let mut mono = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let mut sum = 0.0f32;
        for ch in 0..num_channels {
            sum += samples[frame_idx * num_channels + ch];
        }
        mono.push(sum / num_channels as f32);
    }

    mono
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_mono_is_identity() {
        let samples = vec![0.0f32, 0.5f32, 1.0f32, -1.0f32];
        let result = mix_to_mono(&samples, 1);

        assert_eq!(result, samples);
    }

    #[test]
    fn test_mix_stereo_averages_frames() {
        // Stereo samples: [L1, R1, L2, R2]
        let samples = vec![0.1f32, 0.3f32, 0.5f32, 0.7f32];
        let result = mix_to_mono(&samples, 2);

        assert_eq!(result.len(), 2);
        assert!((result[0] - 0.2).abs() < 0.001);
        assert!((result[1] - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_passthrough_emits_whole_frames() {
        // Same in/out rate: no resampling, just frame regrouping.
        let mut resampler = FrameResampler::new(16_000, 16_000, Duration::from_millis(10));
        let frame_samples = 160; // 10ms at 16kHz

        let mut emitted = Vec::new();
        let input = vec![0.25f32; frame_samples * 2 + 40];
        resampler.push(&input, |frame| emitted.extend_from_slice(frame));

        // Two complete frames emitted, 40 samples still pending.
        assert_eq!(emitted.len(), frame_samples * 2);

        resampler.finish(|frame| emitted.extend_from_slice(frame));
        assert_eq!(emitted.len(), frame_samples * 3);
        // The flushed frame is the leftover input padded with silence.
        assert_eq!(emitted[frame_samples * 2 + 39], 0.25);
        assert_eq!(emitted[frame_samples * 3 - 1], 0.0);
    }

    #[test]
    fn test_reset_discards_pending_tail() {
        let mut resampler = FrameResampler::new(16_000, 16_000, Duration::from_millis(10));

        let mut emitted = Vec::new();
        resampler.push(&vec![1.0f32; 50], |frame| emitted.extend_from_slice(frame));
        assert!(emitted.is_empty());

        resampler.reset();
        resampler.finish(|frame| emitted.extend_from_slice(frame));
        assert!(emitted.is_empty());
    }
}
