use crate::audio_toolkit::audio::save_wav_file;
use crate::cloud_transcription::{self, TranscriptionError};
use crate::cloud_tts;
use crate::managers::audio::AudioRecordingManager;
use crate::managers::session::{PracticeMode, PracticeSession};
use crate::numbers::number_to_words;
use crate::playback;
use crate::scoring::{score_number_attempt, verdict_for, ScoreOptions, Verdict};
use crate::settings::AppSettings;
use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;

/// Runs one interactive practice round on stdin/stdout.
///
/// The loop is single threaded; cloud requests are driven to completion on a
/// runtime owned here, which keeps the capture stream on this thread.
pub fn run(settings: AppSettings) -> Result<()> {
    let runtime = Runtime::new().context("failed to start async runtime")?;

    let api_key = std::env::var(&settings.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        warn!(
            "{} is not set; cloud speech requests will fail until it is",
            settings.api_key_env
        );
    }

    let mut session = PracticeSession::new(
        settings.practice_mode,
        settings.number_start,
        settings.number_end,
    );
    let opts = ScoreOptions {
        tolerance: settings.tolerance,
    };
    let mut recorder = AudioRecordingManager::new(&settings);

    match settings.practice_mode {
        PracticeMode::Sequential => info!(
            "Sequential round over {}..={}",
            settings.number_start, settings.number_end
        ),
        PracticeMode::Challenge => info!(
            "Challenge round: {} questions from {}..={}",
            session.len(),
            settings.number_start,
            settings.number_end
        ),
    }

    println!("Chirp: listen to the voice, then say the number back.");
    println!("Commands: [Enter] record, [p] play voice again, [s] skip, [q] quit\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'round: while let Some(number) = session.current() {
        let target = number_to_words(number);
        let (done, total) = session.progress();
        println!("Question {} of {}", done + 1, total);
        println!("\n    {}\n", number);
        speak(&runtime, &settings, &api_key, &target);

        loop {
            print!("[Enter] record  [p] play  [s] skip  [q] quit > ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                break 'round;
            };
            match line?.trim() {
                "" => {}
                "q" => break 'round,
                "s" => {
                    session.skip();
                    println!("Skipped.\n");
                    continue 'round;
                }
                "p" => {
                    speak(&runtime, &settings, &api_key, &target);
                    continue;
                }
                other => {
                    println!("Unknown command {:?}", other);
                    continue;
                }
            }

            if !recorder.try_start_recording() {
                println!("Could not open the microphone. Check --list-devices.");
                continue;
            }
            println!("Recording... press Enter when you're done.");
            match lines.next() {
                Some(line) => {
                    line?;
                }
                None => {
                    recorder.cancel_recording();
                    break 'round;
                }
            }
            let Some(samples) = recorder.stop_recording() else {
                continue;
            };
            if samples.is_empty() {
                println!("I didn't hear anything. Let's try again!\n");
                continue;
            }

            match evaluate(&runtime, &settings, &api_key, number, &target, &opts, samples) {
                Ok((transcript, score)) => {
                    println!("Heard: {:?}  (score {:.0}%)", transcript, score);
                    match verdict_for(score, settings.threshold_great, settings.threshold_close) {
                        Verdict::Great => {
                            println!("Great job!\n");
                            session.advance(true);
                            continue 'round;
                        }
                        Verdict::Close => {
                            println!("So close! Listen once more and try again.\n");
                        }
                        Verdict::TryAgain => {
                            println!("Not quite. Let's try that one again.\n");
                        }
                    }
                }
                Err(TranscriptionError::NoSpeech) => {
                    println!("I couldn't make that out. Try again, a little louder!\n");
                }
                Err(TranscriptionError::ServiceUnavailable(reason)) => {
                    warn!("Transcription unavailable: {}", reason);
                    println!("The listening service can't be reached right now. Try again in a moment.\n");
                }
            }
        }
    }

    finish(&session)
}

/// Record-to-transcript-to-score for one attempt. The capture is written to a
/// temporary WAV hand-off file and transcribed from there.
fn evaluate(
    runtime: &Runtime,
    settings: &AppSettings,
    api_key: &str,
    number: u32,
    target: &str,
    opts: &ScoreOptions,
    samples: Vec<f32>,
) -> Result<(String, f32), TranscriptionError> {
    let handoff = tempfile::Builder::new()
        .prefix("chirp-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| {
            TranscriptionError::ServiceUnavailable(format!("failed to create hand-off file: {}", e))
        })?;
    save_wav_file(handoff.path(), &samples).map_err(|e| {
        TranscriptionError::ServiceUnavailable(format!("failed to write hand-off file: {}", e))
    })?;
    debug!("Wrote hand-off file {:?}", handoff.path());

    let transcript = runtime.block_on(cloud_transcription::transcribe_file(
        &settings.transcription_provider,
        api_key,
        &settings.transcription_model,
        handoff.path(),
        Some(&settings.selected_language),
    ))?;

    let score = score_number_attempt(number, target, &transcript, opts);
    info!(
        "Target {:?} heard {:?} scored {:.1}",
        target, transcript, score
    );
    Ok((transcript, score))
}

/// Fetch and play the reference voice. Failure is not fatal: the target word
/// is shown instead so the round can continue.
fn speak(runtime: &Runtime, settings: &AppSettings, api_key: &str, target: &str) {
    match runtime.block_on(cloud_tts::synthesize(&settings.tts_voice, api_key, target)) {
        Ok(bytes) => {
            if let Err(e) = playback::play_clip(bytes) {
                warn!("Playback failed: {:#}", e);
                println!("(couldn't play the voice; the words are {:?})", target);
            }
        }
        Err(e) => {
            warn!("Synthesis failed: {:#}", e);
            println!("(couldn't fetch the voice; the words are {:?})", target);
        }
    }
}

fn finish(session: &PracticeSession) -> Result<()> {
    let (answered, total) = session.progress();
    println!(
        "\nRound over! {} of {} correct ({} answered).",
        session.correct(),
        total,
        answered
    );
    println!("{}", session.summary_tier().message());
    info!(
        "Round finished at {} with {}/{} correct",
        Local::now().format("%Y-%m-%d %H:%M"),
        session.correct(),
        total
    );
    Ok(())
}
