use anyhow::{Context, Result};
use log::debug;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;

/// Decode an encoded clip (mp3/wav/...) and play it to completion on the
/// default output device.
pub fn play_clip(bytes: Vec<u8>) -> Result<()> {
    debug!("Playing {} byte clip", bytes.len());

    let (_stream, handle) =
        OutputStream::try_default().context("no audio output device available")?;
    let sink = Sink::try_new(&handle).context("failed to open audio output")?;

    let source = Decoder::new(Cursor::new(bytes)).context("failed to decode reference clip")?;
    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}
