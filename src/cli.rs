use crate::managers::session::PracticeMode;
use crate::settings::AppSettings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "chirp", about = "Chirp - number pronunciation practice for kids")]
pub struct CliArgs {
    /// Path to the settings file
    #[arg(long, default_value = "chirp.json")]
    pub settings: PathBuf,

    /// First number in the practice range (1-100)
    #[arg(long)]
    pub start: Option<u32>,

    /// Last number in the practice range (1-100)
    #[arg(long)]
    pub end: Option<u32>,

    /// Practice mode
    #[arg(long, value_enum)]
    pub mode: Option<PracticeMode>,

    /// "Great" score threshold in percent (70-95)
    #[arg(long)]
    pub great: Option<u8>,

    /// "Close" score threshold in percent (50-90)
    #[arg(long)]
    pub close: Option<u8>,

    /// Accept known kid mispronunciations ("free" for "three", ...)
    #[arg(long)]
    pub tolerance: bool,

    /// Input device name (see --list-devices)
    #[arg(long)]
    pub microphone: Option<String>,

    /// List available input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Enable debug mode with verbose logging
    #[arg(long)]
    pub debug: bool,
}

/// Command-line flags win over whatever the settings file says.
pub fn apply_overrides(settings: &mut AppSettings, args: &CliArgs) {
    if let Some(start) = args.start {
        settings.number_start = start;
    }
    if let Some(end) = args.end {
        settings.number_end = end;
    }
    if let Some(mode) = args.mode {
        settings.practice_mode = mode;
    }
    if let Some(great) = args.great {
        settings.threshold_great = great;
    }
    if let Some(close) = args.close {
        settings.threshold_close = close;
    }
    if args.tolerance {
        settings.tolerance = true;
    }
    if let Some(ref microphone) = args.microphone {
        settings.selected_microphone = Some(microphone.clone());
    }
}
