use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use digest_pulse::{
    ollama::OllamaClient,
    openai::OpenAIClient,
    scan::ScanDriver,
    tracing::init_tracing_subscriber,
    travel::{self, TripRequest},
    yt::{captions::CaptionFetcher, scraper::Scraper},
    Conversation, Error, PlaylistProcessor, PlaylistProcessorBuilder,
};
use notes_ledger::FileLedger;
use serp_jobs::{BrightData, BrightDataConfig, JobPoller};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "digest-pulse", about = "YouTube playlist summarizer and trip search")]
struct Cli {
    #[command(flatten)]
    summarizer: SummarizerArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct SummarizerArgs {
    /// Directory for summary notes and the processed ledger
    #[arg(long, global = true, env = "SUMMARIES_DIR", default_value = "summaries")]
    output_dir: PathBuf,

    /// Ollama server URL
    #[arg(long, global = true, env = "OLLAMA_URL", default_value = OllamaClient::DEFAULT_BASE_URL)]
    ollama_url: String,

    /// Ollama model used for summaries
    #[arg(long, global = true, env = "OLLAMA_MODEL", default_value = OllamaClient::DEFAULT_MODEL)]
    model: String,

    /// Transcript chunk duration in seconds
    #[arg(long, global = true, default_value = "900")]
    chunk_duration: f64,

    /// Caption languages in order of preference
    #[arg(long, global = true, value_delimiter = ',', default_value = "pl,en")]
    languages: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize every new video of a playlist once and exit
    Run {
        #[arg(long, env = "PLAYLIST_URL")]
        playlist_url: String,
    },
    /// Re-scan a playlist on an interval until interrupted
    Watch {
        #[arg(long, env = "PLAYLIST_URL")]
        playlist_url: String,

        /// Seconds between scans
        #[arg(long, default_value = "600")]
        interval: u64,
    },
    /// Search flights and hotels and ask for a recommendation
    Travel(TravelArgs),
    /// Ask the Ollama model a question, optionally about images
    Ask {
        question: String,

        /// Image files sent along with the question
        #[arg(long)]
        image: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct TravelArgs {
    /// Encoded Google Flights search
    #[arg(long)]
    tfs: String,

    #[arg(long)]
    destination: String,

    /// YYYY-MM-DD
    #[arg(long)]
    check_in: NaiveDate,

    /// YYYY-MM-DD
    #[arg(long)]
    check_out: NaiveDate,

    #[arg(long, default_value = "2")]
    travelers: u32,

    #[arg(long, default_value = "USD")]
    currency: String,

    /// Preferences the recommendation should account for
    #[arg(long, default_value = "")]
    requirements: String,

    #[arg(long, env = "BRIGHTDATA_API_KEY")]
    brightdata_api_key: String,

    #[arg(long, env = "BRIGHTDATA_CUSTOMER")]
    brightdata_customer: String,

    #[arg(long, env = "BRIGHTDATA_ZONE")]
    brightdata_zone: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_key: String,

    /// Follow-up questions about the trip, answered in order
    #[arg(long)]
    ask: Vec<String>,
}

type YtProcessor = PlaylistProcessor<FileLedger, OllamaClient, CaptionFetcher, Scraper>;

async fn build_processor(args: &SummarizerArgs) -> anyhow::Result<YtProcessor> {
    let ledger = FileLedger::open_in(&args.output_dir)
        .await
        .context("Failed to open processed ledger")?;
    let completion = OllamaClient::new()
        .with_base_url(&args.ollama_url)
        .with_model(&args.model);
    let scraper = Scraper::default();

    Ok(PlaylistProcessorBuilder::new(&args.output_dir)
        .ledger(ledger)
        .completion(completion)
        .transcripts(CaptionFetcher::new(scraper.clone()).with_languages(args.languages.clone()))
        .playlists(scraper)
        .chunk_duration(args.chunk_duration)
        .build())
}

async fn run_travel(args: TravelArgs) -> anyhow::Result<()> {
    let config = BrightDataConfig::new(
        args.brightdata_api_key,
        args.brightdata_customer,
        args.brightdata_zone,
    );
    let poller = JobPoller::new(BrightData::new(config));
    let openai = OpenAIClient::new(args.openai_key);

    let request = TripRequest {
        flight_tfs: args.tfs,
        destination: args.destination,
        check_in: args.check_in,
        check_out: args.check_out,
        travelers: args.travelers,
        currency: args.currency,
    };

    let results = travel::search_travel_options(&poller, &request).await;
    if results.flights.is_none() && results.hotels.is_none() {
        anyhow::bail!("No flight or hotel results, try again later");
    }

    let recommendation = travel::recommend(&openai, &results, &args.requirements).await;
    println!("{recommendation}");

    let mut conversation = travel::trip_conversation(&request, &results, &args.requirements);
    for question in args.ask {
        let answer = conversation
            .ask(&openai, question.as_str())
            .await
            .with_context(|| format!("Failed to answer {question:?}"))?;
        println!("\n> {question}\n{answer}");
    }
    Ok(())
}

async fn run_ask(
    args: &SummarizerArgs,
    question: String,
    images: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let mut attachments = Vec::with_capacity(images.len());
    for path in &images {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        attachments.push(bytes);
    }

    let ollama = OllamaClient::new()
        .with_base_url(&args.ollama_url)
        .with_model(&args.model);
    let answer = Conversation::new()
        .ask_with_images(&ollama, question, attachments)
        .await?;
    println!("{answer}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Run { playlist_url } => {
            tracing::info!(%playlist_url, "Running playlist pass once...");
            let processor = build_processor(&cli.summarizer).await?;
            let report = processor.scan_once(&playlist_url).await?;
            tracing::info!(?report, "Done");
        }
        Command::Watch {
            playlist_url,
            interval,
        } => {
            if playlist_url.trim().is_empty() {
                return Err(Error::MissingPlaylistUrl.into());
            }
            tracing::info!(%playlist_url, interval, "Watching playlist...");
            let processor = Arc::new(build_processor(&cli.summarizer).await?);

            let token = CancellationToken::new();
            let handle = ScanDriver::new(processor, playlist_url, Duration::from_secs(interval))
                .spawn(token);

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            tracing::info!("Received interrupt signal, finishing current pass...");
            handle.stop().await?;
        }
        Command::Travel(args) => run_travel(args).await?,
        Command::Ask { question, image } => run_ask(&cli.summarizer, question, image).await?,
    }

    Ok(())
}
