use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use studio_core::{is_accepted_upload, FileHandle, Msg, SuggestionTarget};
use studio_engine::{FsContentReader, Studio, TokioScheduler};
use studio_logging::{studio_info, studio_warn};
use tokio::runtime::Runtime;
use tokio::time::{timeout_at, Instant};

use super::logging::{self, LogDestination};
use super::render;
use super::settings::{load_resume, load_settings, DEFAULT_SETTINGS_FILE};

/// Extra time allowed past the last scheduled event before giving up on extraction.
const GRACE: Duration = Duration::from_secs(1);

/// Resume studio: keyword gap analysis and simulated job-description uploads.
#[derive(Debug, Parser)]
#[command(name = "studio", version)]
struct Cli {
    /// Tracker settings in RON format.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Resume document in JSON format.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Keyword category used with --text.
    #[arg(long, default_value = "technical")]
    category: String,

    /// Text to check for missing keywords.
    #[arg(long)]
    text: Option<String>,

    /// Print the final view as JSON.
    #[arg(long)]
    json: bool,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Files to submit as one upload batch. The first one is the job description.
    files: Vec<PathBuf>,
}

fn parse_level(value: &str) -> std::result::Result<LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log level {value:?}"))
}

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level);

    let runtime = Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.settings);
    let reader = FsContentReader::new(settings.max_read_bytes);
    let mut studio = Studio::tokio(
        settings,
        Arc::new(reader),
        tokio::runtime::Handle::current(),
    );

    if let Some(path) = &cli.resume {
        let resume = load_resume(path)?;
        studio_info!("Loaded resume from {:?}", path);
        studio = studio.with_resume(resume);
    }

    if let Some(text) = &cli.text {
        let gaps = studio.find_gaps(text, &cli.category);
        if gaps.is_empty() {
            println!("{}: no missing keywords", cli.category);
        } else {
            println!("{}: {}", cli.category, gaps.join(", "));
        }
    }

    if cli.resume.is_some() {
        print_resume_recommendations(&mut studio);
    }

    let files = upload_batch(&cli.files);
    if !files.is_empty() {
        run_uploads(&mut studio, files).await;
    }

    if cli.json {
        let view = serde_json::to_string_pretty(&studio.view())
            .context("failed to serialize the view")?;
        println!("{view}");
    }
    Ok(())
}

fn print_resume_recommendations(studio: &mut Studio<TokioScheduler>) {
    let mut targets = vec![SuggestionTarget::Summary, SuggestionTarget::Skills];
    targets.extend(
        (0..studio.state().resume().experience.len()).map(SuggestionTarget::ExperienceDescription),
    );

    for target in targets {
        studio.dispatch(Msg::RecommendationsRequested(target));
        if let Some(open) = studio.view().recommendations {
            println!("{}", render::render_recommendations(&open));
        }
    }
    studio.dispatch(Msg::RecommendationsDismissed);
}

fn upload_batch(paths: &[PathBuf]) -> Vec<FileHandle> {
    paths
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            if !is_accepted_upload(&name) {
                studio_warn!("Skipping {:?}: only .pdf, .docx and .txt are accepted", path);
                return None;
            }
            Some(FileHandle::new(
                name,
                media_type_for(path),
                path.to_string_lossy(),
            ))
        })
        .collect()
}

fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Submits `files` and waits until every upload settled and extraction is done.
/// Returns whether a job description was delivered.
async fn run_uploads(studio: &mut Studio<TokioScheduler>, files: Vec<FileHandle>) -> bool {
    let id = studio.subscribe(|view| {
        for line in render::render_uploads(view) {
            println!("{line}");
        }
    });

    let extracted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&extracted);
    studio.on_extraction(move |text| {
        println!("Job description:\n{text}");
        flag.store(true, Ordering::SeqCst);
    });

    let deadline = Instant::now()
        + studio.settings().max_completion_delay()
        + studio.settings().extraction_delay()
        + GRACE;
    studio.submit_batch(files);

    while !studio.aggregate_progress().is_complete() || studio.extraction_pending() {
        match timeout_at(deadline, studio.next_message()).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(_) => {
                studio_warn!("Stopped waiting for uploads at the deadline");
                break;
            }
        }
    }

    studio.unsubscribe(id);
    studio.clear_extraction_callback();
    extracted.load(Ordering::SeqCst)
}
