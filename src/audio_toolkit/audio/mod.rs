// Re-export all audio components
pub mod device;
pub mod recorder;
pub mod resampler;
pub mod utils;

pub use device::{list_input_devices, CpalDeviceInfo};
pub use recorder::AudioRecorder;
pub use resampler::{mix_to_mono, FrameResampler};
pub use utils::{load_wav_file, save_wav_file};
