use std::{
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vidsight_core::{
    AnalysisContext, Analyzer, Backend, BackendConfig, ChatBackend, Provider, VideoMetadata,
    fetch_video, format_bundle_readable, segment::DEFAULT_WINDOW_COUNT,
};

const MAX_WINDOWS: u64 = 100;
const DEFAULT_LOG_FILTER: &str = "vidsight=info,vidsight_core=info";

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    LmStudio,
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::LmStudio => Provider::LmStudio,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidsight")]
#[command(about = "Analyze YouTube videos from their captions with an LLM backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Text-generation backend
    #[arg(short, long, global = true, default_value = "lm-studio")]
    provider: CliProvider,

    /// Override the backend API root (e.g. http://localhost:1234/v1)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the model identifier
    #[arg(long, global = true)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a YouTube URL or a local WebVTT file
    Analyze {
        /// YouTube URL or path to a .vtt file
        source: String,

        /// Video title used in prompts. Defaults to the video's title or the file name.
        #[arg(short, long)]
        title: Option<String>,

        /// Number of time windows for the per-segment analysis
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_WINDOW_COUNT,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_WINDOWS)
        )]
        windows: usize,

        /// Print the result as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Check whether the backend is reachable
    Health,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    // Validate API key early
    let mut config = match BackendConfig::from_provider(&provider) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_api_base(base_url);
    }
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    let backend = ChatBackend::new(config);

    match cli.command {
        Command::Health => health(&provider, &backend).await,
        Command::Analyze {
            source,
            title,
            windows,
            json,
        } => analyze(&provider, backend, &source, title, windows, json).await,
    }
}

async fn health(provider: &Provider, backend: &ChatBackend) -> Result<()> {
    let spinner = create_spinner(&format!("Probing {}...", provider.name()));
    let available = backend.is_available().await;

    if available {
        spinner.finish_with_message(format!(
            "{} {} is available at {} {}",
            style("✓").green().bold(),
            provider.name(),
            style(backend.endpoint()).cyan(),
            style(format!("(model {})", backend.model())).dim()
        ));
        Ok(())
    } else {
        spinner.finish_with_message(format!(
            "{} {} is not reachable at {}",
            style("✗").red().bold(),
            provider.name(),
            style(backend.endpoint()).cyan()
        ));
        anyhow::bail!("backend unavailable")
    }
}

async fn analyze(
    provider: &Provider,
    backend: ChatBackend,
    source: &str,
    title: Option<String>,
    window_count: usize,
    json: bool,
) -> Result<()> {
    eprintln!(
        "\n{}  {}\n",
        style("vidsight").cyan().bold(),
        style("Video Analyzer").dim()
    );
    eprintln!("{}", style("─".repeat(60)).dim());

    let total_start = Instant::now();
    tracing::debug!(provider = provider.name(), source, window_count, "starting analysis");

    // Step 1: Captions, from a local file or through yt-dlp
    let step_start = Instant::now();
    let local = Path::new(source);
    let (markup, metadata, default_title) = if local.is_file() {
        let markup = fs::read_to_string(local)
            .await
            .with_context(|| format!("failed to read {}", local.display()))?;
        let stem = local
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        eprintln!(
            "{} Loaded captions: {}",
            style("✓").green().bold(),
            style(local.display()).dim()
        );
        (markup, None, stem)
    } else {
        let spinner = create_spinner("Fetching video info and captions...");
        let video = fetch_video(source).await?;
        let track = video
            .track
            .as_ref()
            .map(|t| format!("{}{}", t.language, if t.automatic { ", auto" } else { "" }))
            .unwrap_or_else(|| "none".to_string());
        spinner.finish_with_message(format!(
            "{} Fetched: {} {} {}",
            style("✓").green().bold(),
            style(&video.metadata.title).yellow(),
            style(format!("(captions: {})", track)).dim(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
        let title = video.metadata.title.clone();
        (video.markup.unwrap_or_default(), Some(video.metadata), title)
    };

    // Step 2: Analysis
    let step_start = Instant::now();
    let ctx = AnalysisContext {
        title: title.unwrap_or(default_title),
        window_count,
    };
    let spinner = create_spinner(&format!("Analyzing with {}...", provider.name()));
    let analyzer = Analyzer::new(backend);
    let bundle = match analyzer.analyze(&markup, &ctx).await {
        Ok(bundle) => bundle,
        Err(e) => {
            spinner.finish_with_message(format!("{} {}", style("✗").red().bold(), e));
            return Err(e.into());
        }
    };
    spinner.finish_with_message(format!(
        "{} Analyzed {} captions, {} segments ({}) {}",
        style("✓").green().bold(),
        bundle.total_segments,
        bundle.timestamped_analysis.len(),
        provider.name(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    eprintln!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    eprintln!("{}", style("─".repeat(60)).dim());

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        let metadata: Option<&VideoMetadata> = metadata.as_ref();
        println!("{}", format_bundle_readable(&bundle, metadata));
    }

    Ok(())
}
