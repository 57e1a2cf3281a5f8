use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use askbox::voice::{AudioPlayback, AudioSink, SpeechService, TextToSpeech, list_output_devices};
use askbox::{Config, Daemon};

/// askbox - chat-driven voice Q&A gateway for live streams
#[derive(Parser)]
#[command(name = "askbox", version, about)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(short, long, env = "ASKBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List audio output devices and their indices
    Devices,
    /// Test speaker output with a short tone
    TestSpeaker {
        /// Output device (index or name fragment)
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
        /// Output device (index or name fragment)
        #[arg(short, long)]
        device: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,askbox=info",
        1 => "info,askbox=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Devices => cmd_devices(),
            Command::TestSpeaker { device } => test_speaker(device.as_deref()).await,
            Command::TestTts { text, device } => {
                test_tts(cli.config.as_deref(), &text, device.as_deref()).await
            }
        };
    }

    let config = Config::load(cli.config.as_deref())?;
    tracing::info!(channel = %config.chat.channel, "starting askbox gateway");

    Daemon::new(config).run().await?;

    Ok(())
}

/// List audio output devices
fn cmd_devices() -> anyhow::Result<()> {
    let devices = list_output_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found");
        return Ok(());
    }

    println!("Audio output devices:");
    for (index, name) in devices.iter().enumerate() {
        println!("  [{index}] {name}");
    }
    println!("\nUse the index or a name fragment for audio.question_device / audio.answer_device");

    Ok(())
}

/// Test speaker output with a sine wave
async fn test_speaker(device: Option<&str>) -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new();

    // Generate 2 seconds of 440Hz sine wave at 24kHz sample rate
    let sample_rate = 24000_u32;
    let frequency = 440.0_f32;
    let num_samples = (sample_rate * 2) as usize;

    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    playback.play_samples(samples, sample_rate, device).await?;

    println!("If you heard the tone, your speakers are working!");
    Ok(())
}

/// Test TTS synthesis and playback
async fn test_tts(config: Option<&std::path::Path>, text: &str, device: Option<&str>) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load(config)?;
    let tts = TextToSpeech::new(
        config.openai.api_key.clone(),
        config.openai.tts_model.clone(),
        Duration::from_secs(30),
    )?;

    println!("Synthesizing speech...");
    let audio = tts.synthesize(text, &config.openai.tts_voice).await?;
    println!("Got {} bytes of audio data", audio.len());

    println!("Playing audio...");
    let playback = AudioPlayback::new();
    playback.play(&audio, device).await?;

    println!("\nIf you heard the speech, TTS is working!");
    Ok(())
}
