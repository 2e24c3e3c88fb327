/// Sample rate every capture delivers to the rest of the pipeline.
///
/// The transcription contract is 16 kHz mono; device-native rates are
/// resampled to this, never guessed at.
pub const TRANSCRIBE_SAMPLE_RATE: u32 = 16_000;
