//! Application entry point: farming voice assistant.
//!
//! # Startup sequence
//!
//! 1. Parse the command line.
//! 2. Initialise logging.
//! 3. Load [`AppConfig`] (default on first run) and apply CLI overrides.
//! 4. Create the [`tokio`] runtime.
//! 5. Either answer one `--text` / `--audio` question, run the interactive
//!    prompt, or run the `yield` estimate sub-command.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use agri_voice::{
    audio::AudioClip,
    config::{AppConfig, AppPaths},
    language::LanguageCode,
    pipeline::{ConversationSession, PipelineResult, TurnInput},
    yield_model::{YieldEstimator, YieldQuery},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "agri-voice")]
#[command(about = "Multilingual voice assistant for farmers")]
#[command(version)]
struct Cli {
    /// Language you speak or type in (e.g. hi, en, ta, "Marathi")
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// Path to settings.toml (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ask one question from a WAV/MP3 recording and exit
    #[arg(long, conflicts_with = "text")]
    audio: Option<PathBuf>,

    /// Ask one typed question and exit
    #[arg(long)]
    text: Option<String>,

    /// Write the synthesised answer (MP3) to this path
    #[arg(long)]
    save_audio: Option<PathBuf>,

    /// Answer from the built-in keyword table instead of the AI model
    #[arg(long)]
    no_ai: bool,

    /// Do not synthesise or play speech
    #[arg(long)]
    no_speech: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate crop production for a district, season, crop and area
    Yield {
        #[arg(long)]
        district: String,
        #[arg(long)]
        season: String,
        #[arg(long)]
        crop: String,
        /// Cultivated area in hectares (at least 1)
        #[arg(long)]
        area: f64,
        /// Directory holding label-encoders.json and yield-model.json
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Configuration
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    if let Some(language) = cli.language.as_deref() {
        config.session.language = LanguageCode::parse_or_default(language);
    }
    if cli.no_ai {
        config.session.use_ai = false;
    }
    if cli.no_speech {
        config.session.synthesize = false;
        config.session.auto_play = false;
    }

    if let Some(Commands::Yield {
        district,
        season,
        crop,
        area,
        artifacts,
    }) = cli.command
    {
        return estimate_yield(
            YieldQuery {
                district,
                season,
                crop,
                area_hectares: area,
            },
            artifacts.as_deref(),
        );
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let Cli {
        audio,
        text,
        save_audio,
        ..
    } = cli;

    rt.block_on(async move {
        let language = config.session.language;
        let mut session = ConversationSession::from_config(&config);
        log::info!(
            "agri-voice ready (language: {}, AI answers: {})",
            language.display_name(),
            session.options().use_ai
        );

        let save_audio = save_audio.as_deref();
        if let Some(path) = audio.as_deref() {
            let clip = AudioClip::read_from(path)
                .with_context(|| format!("cannot read audio file {}", path.display()))?;
            let result = session.turn(TurnInput::Audio(clip), language).await;
            return finish_one_shot(&session, &result, save_audio);
        }
        if let Some(text) = text {
            let result = session.turn(TurnInput::Text(text), language).await;
            return finish_one_shot(&session, &result, save_audio);
        }

        interactive(&mut session, language, save_audio).await
    })
}

// ---------------------------------------------------------------------------
// Interactive prompt
// ---------------------------------------------------------------------------

const HELP: &str = "\
Type a question, or one of:
  /audio <file>   ask from a WAV/MP3 recording
  /speak <n>      replay answer #n from /history
  /stop           stop playback
  /history        show the conversation
  /clear          clear the conversation
  /quit           exit";

async fn interactive(
    session: &mut ConversationSession,
    language: LanguageCode,
    save_audio: Option<&Path>,
) -> Result<()> {
    let mut notice = session.configuration_notice();
    if let Some(notice) = notice.as_deref() {
        println!("ℹ {notice}");
    }
    println!("Asking in {}.  {HELP}", language.display_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/stop" => session.stop_playback(),
            "/clear" => {
                session.clear();
                println!("Conversation cleared.");
            }
            "/history" => print_history(session),
            "/speak" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => {
                    if let Err(e) = session.speak_turn(n - 1).await {
                        println!("⚠ {e} ({} problem)", e.class());
                    }
                }
                _ => println!("usage: /speak <n>"),
            },
            "/audio" => {
                if arg.is_empty() {
                    println!("usage: /audio <file>");
                    continue;
                }
                match AudioClip::read_from(Path::new(arg)) {
                    Ok(clip) => {
                        let result = session.turn(TurnInput::Audio(clip), language).await;
                        print_result(&result, save_audio)?;
                    }
                    Err(e) => println!("⚠ cannot read {arg}: {e}"),
                }
            }
            _ => {
                let result = session
                    .turn(TurnInput::Text(line.to_string()), language)
                    .await;
                print_result(&result, save_audio)?;
            }
        }

        // The model can reject its key mid-session.
        let current = session.configuration_notice();
        if current != notice {
            if let Some(text) = current.as_deref() {
                println!("ℹ {text}");
            }
            notice = current;
        }
    }
    session.stop_playback();
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Print a single `--text` / `--audio` turn; exits non-zero when the turn
/// produced no answer.
fn finish_one_shot(
    session: &ConversationSession,
    result: &PipelineResult,
    save_audio: Option<&Path>,
) -> Result<()> {
    if let Some(notice) = session.configuration_notice() {
        eprintln!("ℹ {notice}");
    }
    print_result(result, save_audio)?;
    if !result.answered() {
        let reason = result
            .errors
            .first()
            .map_or("no answer", |e| e.message.as_str());
        anyhow::bail!("question not answered: {reason}");
    }
    Ok(())
}

fn print_result(result: &PipelineResult, save_audio: Option<&Path>) -> Result<()> {
    if result.duplicate {
        println!("(same question as last time, skipped)");
        return Ok(());
    }
    if let Some(heard) = result.transcribed_text.as_deref() {
        println!("You said: {heard}");
    }
    if let Some(answer) = result
        .translated_answer_text
        .as_deref()
        .or(result.answer_text.as_deref())
    {
        println!("\n{answer}\n");
    }
    for error in &result.errors {
        if error.ends_turn() {
            println!("✗ {}: {}", error.stage, error.message);
        } else {
            println!("⚠ {} ({} problem): {}", error.stage, error.class, error.message);
        }
    }

    if let (Some(path), Some(clip)) = (save_audio, result.audio_clip.as_ref()) {
        std::fs::write(path, &clip.bytes)
            .with_context(|| format!("cannot write audio to {}", path.display()))?;
        println!("Audio saved to {}", path.display());
    }
    Ok(())
}

fn print_history(session: &ConversationSession) {
    if session.history().is_empty() {
        println!("(no messages yet)");
        return;
    }
    for (i, turn) in session.history().iter().enumerate() {
        println!(
            "#{:<3} [{}] {}: {}",
            i + 1,
            turn.time_label(),
            turn.role().label(),
            turn.text()
        );
    }
}

// ---------------------------------------------------------------------------
// yield sub-command
// ---------------------------------------------------------------------------

fn estimate_yield(query: YieldQuery, artifacts: Option<&Path>) -> Result<()> {
    let estimator = match artifacts {
        Some(dir) => YieldEstimator::from_dir(dir),
        None => YieldEstimator::from_paths(&AppPaths::new()),
    }
    .context("cannot load yield model")?;

    match estimator.estimate(&query) {
        Ok(kilotons) => println!("Predicted Production: {kilotons:.2} kilotons"),
        Err(e) if e.class().ends_turn() => println!("{e}"),
        Err(e) => return Err(e).context("yield model artifacts do not match"),
    }
    Ok(())
}
