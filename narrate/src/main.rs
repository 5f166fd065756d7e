//! narrate - Convert a text document into a single narrated audio file

mod audio;
mod config;
mod input;
mod pipeline;
mod synth;
mod text;

use anyhow::{Context, Result};
use audio::ffmpeg::{self, FfmpegMerger};
use clap::{Parser, Subcommand};
use config::NarrateConfig;
use pipeline::Pipeline;
use std::path::PathBuf;
use synth::Synthesizer;
use tts_client::OpenAiSpeechProvider;

#[derive(Parser, Debug)]
#[command(name = "narrate")]
#[command(about = "Convert a text document into narrated audio", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the input text file
    input_file: Option<PathBuf>,

    /// Voice to narrate with (overrides config)
    #[arg(long)]
    voice: Option<String>,

    /// Token budget per synthesis request (overrides config)
    #[arg(long)]
    token_budget: Option<usize>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the default voice
    SetVoice {
        /// Voice name (e.g. alloy, nova)
        voice: String,
    },
    /// Set the per-request token budget
    SetTokenBudget {
        /// Maximum tokens per synthesis request
        budget: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle subcommands
    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    // Require an input file for conversion
    let input_path = args.input_file.clone().ok_or_else(|| {
        anyhow::anyhow!("Input file path is required. Run 'narrate --help' for usage.")
    })?;

    // Load configuration and apply CLI overrides
    let mut config = NarrateConfig::load().context("Failed to load configuration")?;
    if let Some(voice) = args.voice.clone() {
        config.voice = voice;
    }
    if let Some(budget) = args.token_budget {
        config.token_budget = budget;
    }

    // Resolve the credential before touching any file
    let api_key = config.resolve_api_key()?;

    if args.debug {
        eprintln!("Input: {}", input_path.display());
        eprintln!("Model: {}", config.model);
        eprintln!("Voice: {}", config.voice);
        eprintln!("Token budget: {}", config.token_budget);
        eprintln!("Max retries: {}", config.max_retries);
    }

    // Validate and read the document
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let (resolved_path, content) =
        input::load_document(&input_path, &home, config.max_file_size)?;

    if !ffmpeg::is_ffmpeg_available() {
        anyhow::bail!("ffmpeg not found on PATH; it is required to merge audio segments");
    }

    let prefix = resolved_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let output_dir = resolved_path
        .parent()
        .context("Input file has no parent directory")?
        .to_path_buf();

    let provider = OpenAiSpeechProvider::openai(&config.model, api_key)?;
    let synthesizer = Synthesizer::new(Box::new(provider), &config);
    let pipeline = Pipeline::new(&synthesizer, &FfmpegMerger, &config);

    eprintln!("Splitting text based on token length...");
    let merged = pipeline.run(&content, &prefix, &output_dir).await?;

    let size_mb = std::fs::metadata(&merged)?.len() as f64 / (1024.0 * 1024.0);
    eprintln!("All done!");
    eprintln!("Output file: {} ({:.1} MB)", merged.display(), size_mb);

    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarrateConfig::load()?;
            println!("Configuration file: {:?}", NarrateConfig::config_path()?);
            println!();
            if config.api_key.is_some() {
                println!("api_key = (set)");
            } else {
                println!("api_key = (from {} if set)", config::API_KEY_ENV_VAR);
            }
            println!("model = \"{}\"", config.model);
            println!("voice = \"{}\"", config.voice);
            println!("response_format = \"{}\"", config.response_format);
            println!("token_budget = {}", config.token_budget);
            println!("max_retries = {}", config.max_retries);
            println!("retry_delay_secs = {}", config.retry_delay_secs);
            println!("max_file_size = {}", config.max_file_size);
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = NarrateConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", config.voice);
        }
        ConfigAction::SetTokenBudget { budget } => {
            let mut config = NarrateConfig::load()?;
            config.token_budget = *budget;
            config.save()?;
            println!("Default token budget set to: {}", config.token_budget);
        }
    }
    Ok(())
}
