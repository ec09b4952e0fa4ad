//! Command-line entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the CLI.
//! 3. Load [`AppConfig`] from disk (returns defaults on first run).
//! 4. For network commands, build a tokio runtime and the send pipeline;
//!    transcription runs fully synchronously.
//!
//! Every command prints a human-readable summary and exits non-zero on
//! failure.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use feishu_voice::{
    asr::AsrService,
    audio::FfmpegTranscoder,
    config::{AppConfig, AppPaths, Credentials},
    feishu::FeishuClient,
    pipeline::{SendOptions, VoiceSender},
    tts::{self, Gender, TtsDispatcher},
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "feishu-voice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send TTS voice messages to Feishu and transcribe audio locally")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize text and deliver it as Feishu voice messages
    Send {
        /// Text to speak
        text: String,

        /// Voice id or a description like "温柔的女声"
        #[arg(short, long)]
        voice: Option<String>,

        /// Recipient open_id (defaults to the configured target user)
        #[arg(short, long)]
        user: Option<String>,

        /// Disable automatic segmentation of long text
        #[arg(long)]
        no_split: bool,

        /// Maximum characters per segment
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Synthesize text to a local audio file
    Tts {
        /// Text to synthesize
        text: String,

        /// Output file
        #[arg(short, long, default_value = "output.mp3")]
        output: PathBuf,

        /// Voice id or description
        #[arg(short, long)]
        voice: Option<String>,
    },

    /// Transcribe an audio file with the local speech model
    Transcribe {
        /// Audio file to transcribe
        audio: PathBuf,

        /// Explicit model file (overrides the configured model)
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// List available voices
    Voices {
        /// Filter by gender (男/女)
        #[arg(short, long)]
        gender: Option<String>,

        /// Filter by engine (cosyvoice/piper)
        #[arg(short, long)]
        engine: Option<String>,
    },

    /// Show which voice a description resolves to
    Match {
        /// Free-form description, e.g. "像新闻主播"
        description: String,
    },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    match cli.command {
        Command::Send {
            text,
            voice,
            user,
            no_split,
            max_chars,
        } => cmd_send(&config, text, voice, user, no_split, max_chars),
        Command::Tts {
            text,
            output,
            voice,
        } => cmd_tts(&config, text, output, voice),
        Command::Transcribe { audio, model } => cmd_transcribe(&config, audio, model),
        Command::Voices { gender, engine } => cmd_voices(gender, engine),
        Command::Match { description } => cmd_match(&description),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

// ---------------------------------------------------------------------------
// send
// ---------------------------------------------------------------------------

fn cmd_send(
    config: &AppConfig,
    text: String,
    voice: Option<String>,
    user: Option<String>,
    no_split: bool,
    max_chars: Option<usize>,
) -> Result<()> {
    let credentials = Credentials::resolve(Credentials::default());

    let dispatcher =
        TtsDispatcher::from_config(&config.tts, credentials.dashscope_api_key.as_deref());
    let transcoder = Arc::new(FfmpegTranscoder::new()?);
    let client = FeishuClient::new(&credentials, &config.feishu);
    let sender = VoiceSender::new(
        dispatcher,
        transcoder,
        client,
        credentials.target_user.clone(),
    );

    let options = SendOptions {
        voice: voice.or_else(|| Some(config.tts.default_voice.clone())),
        target_user: user,
        auto_split: !no_split && config.send.auto_split,
        max_segment_chars: max_chars.unwrap_or(config.send.max_segment_chars),
    };

    let receipts = runtime()?.block_on(sender.send_voice(&text, &options))?;

    if receipts.len() > 1 {
        println!("Sent {} voice messages", receipts.len());
        for (i, receipt) in receipts.iter().enumerate() {
            println!("  message {}: {}", i + 1, receipt.message_id);
        }
    } else if let Some(receipt) = receipts.first() {
        println!("Voice message sent");
        println!("  message id: {}", receipt.message_id);
        if let Some(chat_id) = &receipt.chat_id {
            println!("  chat id:    {chat_id}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// tts
// ---------------------------------------------------------------------------

fn cmd_tts(
    config: &AppConfig,
    text: String,
    output: PathBuf,
    voice: Option<String>,
) -> Result<()> {
    let credentials = Credentials::resolve(Credentials::default());
    let dispatcher =
        TtsDispatcher::from_config(&config.tts, credentials.dashscope_api_key.as_deref());

    let requested = voice.or_else(|| Some(config.tts.default_voice.clone()));
    let used = runtime()?.block_on(dispatcher.synthesize(
        &text,
        requested.as_deref(),
        &output,
    ))?;

    println!("Generated {} (voice: {} / {})", output.display(), used.name, used.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// transcribe
// ---------------------------------------------------------------------------

fn cmd_transcribe(config: &AppConfig, audio: PathBuf, model: Option<PathBuf>) -> Result<()> {
    let paths = AppPaths::new();
    let service = match model {
        Some(path) => AsrService::with_model_path(path, &config.asr),
        None => AsrService::new(&config.asr, &paths),
    };

    let text = service
        .transcribe_file(&audio)
        .with_context(|| format!("transcription of {} failed", audio.display()))?;

    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// voices / match
// ---------------------------------------------------------------------------

fn cmd_voices(gender: Option<String>, engine: Option<String>) -> Result<()> {
    let gender = match gender {
        Some(g) => match Gender::parse(&g) {
            Some(g) => Some(g),
            None => bail!("unknown gender filter: {g} (use 男/女)"),
        },
        None => None,
    };
    let engine = match engine.as_deref() {
        Some("cosyvoice") => Some(tts::EngineKind::CosyVoice),
        Some("piper") => Some(tts::EngineKind::Piper),
        Some(other) => bail!("unknown engine filter: {other} (use cosyvoice/piper)"),
        None => None,
    };

    for v in tts::list_voices(gender, engine) {
        println!(
            "{}: {} ({}) - {} [{}]",
            v.id,
            v.name,
            v.gender.label(),
            v.style,
            v.engine.label()
        );
    }
    Ok(())
}

fn cmd_match(description: &str) -> Result<()> {
    let v = tts::match_voice(description);
    println!("{} ({}) - {}", v.name, v.id, v.style);
    Ok(())
}
