//! Neo TTS CLI - serve the web front-end or run one-shot synthesis
//!
//! Subcommands:
//! - `serve`: start the HTTP server for the browser UI
//! - `generate`: synthesize one utterance from the command line
//! - `voices`: list a model's voices
//! - `models`: list registered models

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use neo_tts::service::{GenerationLog, GenerationRequest, GenerationService};
use neo_tts::{build_registry, AppConfig, TtsServer, VoiceCache, VERSION};

/// Neo TTS - local TTS front-end with pluggable backends
#[derive(Parser, Debug)]
#[command(name = "neo-tts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "neo-tts.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Synthesize one utterance
    Generate {
        /// Model to use
        #[arg(short, long)]
        model: String,

        /// Text to synthesize
        #[arg(short, long)]
        text: String,

        /// Voice id (required for multi-voice models)
        #[arg(long)]
        voice: Option<String>,

        /// Reference audio for cloning-capable models
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List a model's voices
    Voices {
        /// Model to enumerate
        #[arg(short, long)]
        model: String,
    },

    /// List registered models
    Models,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb
}

fn build_service(config: &AppConfig) -> Result<GenerationService> {
    let registry = Arc::new(build_registry(config)?);
    let voices = Arc::new(VoiceCache::new(Arc::clone(&registry)));
    let log = Arc::new(GenerationLog::new(config.log_file()));
    let service = GenerationService::new(
        registry,
        voices,
        log,
        config.output_dir.clone(),
        config.serialize_all_synthesis,
    )?;
    Ok(service)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config =
        AppConfig::load_or_default(&cli.config).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            info!("Neo TTS v{}", VERSION);
            let server = TtsServer::new(config).context("Failed to initialize server")?;
            server.run().await.context("Server exited with an error")?;
            Ok(())
        }

        Commands::Generate {
            model,
            text,
            voice,
            reference,
            output_dir,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let service = build_service(&config)?;

            let pb = create_spinner(&format!("Generating with {}...", model));
            let start = Instant::now();

            let result = service
                .generate(GenerationRequest {
                    model,
                    voice,
                    text,
                    reference_path: reference,
                })
                .await
                .context("Generation failed")?;

            pb.finish_with_message(format!(
                "Generated {:.1}s of audio in {:.1}s",
                result.duration_secs,
                start.elapsed().as_secs_f32(),
            ));

            println!("{}", result.output_path.display());
            if let Some(warning) = result.warning {
                eprintln!("warning: {}", warning);
            }
            Ok(())
        }

        Commands::Voices { model } => {
            let registry = Arc::new(build_registry(&config)?);
            let voices = VoiceCache::new(Arc::clone(&registry));

            let list = voices
                .get_voices(&model)
                .await
                .context("Voice enumeration failed")?;

            if list.is_empty() {
                println!("{} is single-speaker; no voice selection", model);
            } else {
                for voice in list.iter() {
                    println!("{:<24} {}", voice.id, voice.label);
                }
            }
            Ok(())
        }

        Commands::Models => {
            let registry = build_registry(&config)?;
            for desc in registry.descriptors() {
                let mut notes = Vec::new();
                if desc.supports_voice_selection {
                    notes.push("voices");
                }
                if desc.supports_reference_cloning {
                    notes.push("cloning");
                }
                println!("{:<12} {:<16} [{}]", desc.id, desc.label, notes.join(", "));
            }
            Ok(())
        }
    }
}
