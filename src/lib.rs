pub mod audio_toolkit;
pub mod cli;
pub mod cloud_transcription;
pub mod cloud_tts;
pub mod drill;
pub mod managers;
pub mod numbers;
pub mod playback;
pub mod scoring;
pub mod settings;

pub use cli::CliArgs;

use anyhow::Result;

pub fn run(args: CliArgs) -> Result<()> {
    if args.list_devices {
        let devices = audio_toolkit::list_input_devices()?;
        if devices.is_empty() {
            println!("No input devices found.");
        } else {
            println!("Input devices:");
            for info in devices {
                println!("  {}", info.name);
            }
        }
        return Ok(());
    }

    let mut settings = settings::load_or_create_settings(&args.settings)?;
    cli::apply_overrides(&mut settings, &args);
    settings.normalize_practice_fields();
    log::debug!("Effective settings: {:?}", settings);

    drill::run(settings)
}
