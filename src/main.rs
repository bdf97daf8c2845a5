//! CLI entry point: turn a PDF, EPUB, or text file into a narrated audiobook.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use audiobook::engines::piper::{
    PiperEngine, PiperInferenceParams, PiperModelParams, AVAILABLE_VOICES, DEFAULT_MODEL,
};
use audiobook::{
    check_inputs, check_output, load_paragraphs, AudiobookConfig, AudiobookError,
    AudiobookGenerator, Metadata, OutputFormat, SynthesisEngine,
};

#[derive(Parser, Debug)]
#[command(name = "audiobook", version)]
#[command(about = "Generate an audiobook from PDF/EPUB/TXT via Piper TTS")]
struct Args {
    /// Path to input file (PDF, EPUB, TXT)
    #[arg(required_unless_present = "list_models")]
    input: Option<PathBuf>,

    /// Path to output audio file (.wav or .mp3)
    #[arg(required_unless_present = "list_models")]
    output: Option<PathBuf>,

    /// Path to Piper ONNX model file
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: PathBuf,

    /// List available voice models and exit
    #[arg(long)]
    list_models: bool,

    /// Title metadata for MP3
    #[arg(long)]
    title: Option<String>,

    /// Artist metadata for MP3
    #[arg(long)]
    artist: Option<String>,

    /// JSON file overriding pause, normalization, and export settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// espeak-ng binary to use instead of the one on PATH
    #[arg(long)]
    espeak_ng: Option<PathBuf>,

    /// espeak-ng data directory
    #[arg(long)]
    espeak_data: Option<PathBuf>,

    /// Number of inference threads
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();

    if args.list_models {
        list_models();
        return Ok(());
    }

    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        bail!("input and output paths are required");
    };

    check_inputs(input, &args.model)?;
    check_output(output)?;

    let config = match &args.config {
        Some(path) => AudiobookConfig::from_json_file(path).context("Failed to load config")?,
        None => AudiobookConfig::default(),
    };

    let paragraphs = load_paragraphs(input).context("Failed to load document")?;
    if paragraphs.is_empty() {
        return Err(AudiobookError::NoText.into());
    }

    log::info!("🔄 Loading Piper TTS model...");
    let mut engine = PiperEngine::with_espeak(args.espeak_ng.clone(), args.espeak_data.clone());
    engine
        .load_model_with_params(
            &args.model,
            PiperModelParams {
                num_threads: args.threads,
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to load voice model: {e}"))?;

    let metadata = metadata_for(output, args.title.clone(), args.artist.clone());

    let mut generator = AudiobookGenerator::new(engine, config)
        .with_params(PiperInferenceParams::default())
        .with_progress(progress_bar()?);
    generator.generate(&paragraphs, output, metadata.as_ref())?;

    Ok(())
}

/// Print bundled voice model names and paths.
fn list_models() {
    for (name, path) in AVAILABLE_VOICES {
        println!("{name}: {path}");
    }
}

/// Tags only apply to MP3 output, and are omitted entirely when none are given.
fn metadata_for(output: &Path, title: Option<String>, artist: Option<String>) -> Option<Metadata> {
    if OutputFormat::from_path(output) != OutputFormat::Mp3 {
        return None;
    }
    let metadata = Metadata { title, artist };
    (!metadata.is_empty()).then_some(metadata)
}

fn progress_bar() -> Result<ProgressBar> {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{msg}: {percent:>3}%|{bar:40.cyan/blue}| {pos}/{len} [{elapsed_precise}<{eta_precise}, {per_sec}]")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    progress.set_message("Synthesizing");
    Ok(progress)
}
