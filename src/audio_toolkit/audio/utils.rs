use crate::audio_toolkit::constants::TRANSCRIBE_SAMPLE_RATE;
use anyhow::Result;
use hound::{WavReader, WavSpec, WavWriter};
use log::debug;
use std::path::Path;

/// Save mono 16 kHz samples as a 16-bit PCM WAV file.
///
/// This is the hand-off container between capture and transcription.
pub fn save_wav_file<P: AsRef<Path>>(file_path: P, samples: &[f32]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TRANSCRIBE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(file_path.as_ref(), spec)?;

    // Convert f32 samples to i16 for WAV
    for sample in samples {
        let sample_i16 = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        writer.write_sample(sample_i16)?;
    }

    writer.finalize()?;
    debug!("Saved WAV file: {:?}", file_path.as_ref());
    Ok(())
}

/// Load audio samples from a WAV file, normalized to [-1.0, 1.0].
pub fn load_wav_file<P: AsRef<Path>>(file_path: P) -> Result<Vec<f32>> {
    let mut reader = WavReader::open(file_path.as_ref())?;
    let spec = reader.spec();

    debug!("Loading WAV file: {:?}, spec: {:?}", file_path.as_ref(), spec);

    let samples: Result<Vec<f32>, _> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|sample| sample as f32 / i16::MAX as f32))
                .collect(),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|sample| sample as f32 / i32::MAX as f32))
                .collect(),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported bit depth: {}",
                    spec.bits_per_sample
                ))
            }
        },
        hound::SampleFormat::Float => reader.samples::<f32>().collect(),
    };

    let audio_samples = samples?;
    debug!("Loaded {} samples from WAV file", audio_samples.len());
    Ok(audio_samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.wav");

        let samples = vec![0.0f32, 0.25, -0.25, 0.5, -0.5, 1.0, -1.0];
        save_wav_file(&path, &samples).unwrap();

        let loaded = load_wav_file(&path).unwrap();
        assert_eq!(loaded.len(), samples.len());
        for (orig, got) in samples.iter().zip(loaded.iter()) {
            // 16-bit quantization error bound
            assert!((orig - got).abs() < 1.0 / 16_000.0, "{} vs {}", orig, got);
        }
    }

    #[test]
    fn test_save_clamps_out_of_range_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");

        save_wav_file(&path, &[2.0f32, -2.0f32]).unwrap();
        let loaded = load_wav_file(&path).unwrap();
        assert!(loaded[0] <= 1.0 && loaded[0] > 0.99);
        assert!(loaded[1] >= -1.01 && loaded[1] < -0.99);
    }
}
