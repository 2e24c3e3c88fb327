pub mod audio;
pub mod constants;
pub mod text;

pub use audio::{list_input_devices, AudioRecorder, CpalDeviceInfo, FrameResampler};
pub use text::{matches_variant, normalize};
