use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::{info, warn};
use serde::Deserialize;

use ytlens::config::{API_KEY_ENV, Config};
use ytlens::gemini::GeminiClient;
use ytlens::pipeline::Pipeline;
use ytlens::response::{Body, Response};
use ytlens::store::{AnalysisRepository, JsonFileStore, NewAnalysis, StoreError};
use ytlens::youtube::InnerTube;
use ytlens::{Segment, Transcript};

mod cli;

use cli::{Cli, Command, OutputFormat, SavedAction};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytlens.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytlens")
        .join("logs")
}

fn build_after_help(config: &Config) -> String {
    let key_line = match config.api_key(std::env::var(API_KEY_ENV).ok()) {
        Some(_) => format!("  \x1b[32m✅\x1b[0m {API_KEY_ENV}"),
        None => format!("  \x1b[31m❌\x1b[0m {API_KEY_ENV}  (not set, needed for analysis)"),
    };

    format!(
        "\nCONFIGURATION:\n{key_line}\n\nConfig file: {}\nLogs are written to: {}",
        ytlens::config::config_path().display(),
        log_dir().join("ytlens.log").display()
    )
}

/// Print a response the way the caller expects; returns whether it succeeded
fn render(resp: &Response, json: bool) -> bool {
    if json {
        println!("{}", resp.to_json());
        return resp.is_success();
    }

    match &resp.body {
        Body::Analysis { analysis } => println!("{analysis}"),
        Body::Transcript { transcript } => println!("{}", ytlens::prompt::format_transcript(transcript)),
        Body::Failure { error, details, .. } => {
            eprintln!("Error ({}): {error}\n{details}", resp.status);
            eprintln!("\nRun the command again to retry.");
        }
    }
    resp.is_success()
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn fetch_cached(pipeline: &Pipeline, url: &str, no_cache: bool) -> ytlens::Result<Transcript> {
    let cache_dir = ytlens::cache::cache_dir();
    let video_id = ytlens::parse_video_id(url)?;

    if !no_cache {
        if let Some(t) = ytlens::cache::load(&cache_dir, &video_id) {
            return Ok(t);
        }
    }

    let transcript = pipeline.fetch(url).await?;
    if let Err(e) = ytlens::cache::save(&cache_dir, &transcript) {
        warn!("Failed to cache transcript: {e:#}");
    }
    Ok(transcript)
}

/// Accept either a bare segment list or the `{ "transcript": [...] }` payload
#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Segments(Vec<Segment>),
    Wrapped { transcript: Vec<Segment> },
}

fn read_segments(path: &Path) -> Result<Vec<Segment>> {
    let data = std::fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    let parsed: TranscriptFile =
        serde_json::from_str(&data).wrap_err_with(|| format!("parsing transcript JSON in {}", path.display()))?;
    Ok(match parsed {
        TranscriptFile::Segments(segments) => segments,
        TranscriptFile::Wrapped { transcript } => transcript,
    })
}

fn store_failure(err: StoreError) -> ! {
    eprintln!("Error ({}): {err}", err.status());
    std::process::exit(1);
}

fn run_saved(store: &JsonFileStore, user_id: &str, action: SavedAction) -> Result<()> {
    match action {
        SavedAction::List => {
            let analyses = store.list(user_id).unwrap_or_else(|e| store_failure(e));
            if analyses.is_empty() {
                eprintln!("No saved analyses for {user_id}");
            }
            for a in analyses {
                println!("{}  {}  {} ({})", a.id, a.created_at, a.video_title, a.video_id);
            }
        }
        SavedAction::Show { id } => {
            let a = store.get(user_id, &id).unwrap_or_else(|e| store_failure(e));
            println!("# {} ({})\n\n{}", a.video_title, a.video_id, a.analysis);
        }
        SavedAction::Edit { id, file } => {
            let text = std::fs::read_to_string(&file).wrap_err_with(|| format!("reading {}", file.display()))?;
            let a = store.update(user_id, &id, &text).unwrap_or_else(|e| store_failure(e));
            eprintln!("Updated {} at {}", a.id, a.updated_at);
        }
        SavedAction::Delete { id } => {
            store.delete(user_id, &id).unwrap_or_else(|e| store_failure(e));
            eprintln!("Deleted {id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {e:#}");
        Config::default()
    });

    let cmd = <Cli as clap::CommandFactory>::command().after_help(build_after_help(&config));
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    if cli.verbose {
        let config_path = ytlens::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    let client = reqwest::Client::new();
    let pipeline = Pipeline::new(
        Box::new(InnerTube::new(client.clone(), config.lang())),
        GeminiClient::with_reqwest(config.gemini(std::env::var(API_KEY_ENV).ok()), client),
        config.fetch_options(),
    );
    let store = JsonFileStore::new(ytlens::store::default_store_path());

    let ok = match cli.command {
        Command::Transcript {
            url,
            format,
            output,
            no_cache,
        } => match fetch_cached(&pipeline, &url, no_cache).await {
            Ok(transcript) => {
                if cli.verbose {
                    eprintln!(
                        "Video: {} ({})\nSource: {}\nSegments: {}",
                        transcript.title,
                        transcript.video_id,
                        transcript.source,
                        transcript.segments.len(),
                    );
                }

                let rendered = match format {
                    OutputFormat::Text => ytlens::output::render_text(&transcript),
                    OutputFormat::Json => ytlens::output::render_json(&transcript),
                };

                if let Some(ref path) = output {
                    std::fs::write(path, &rendered)?;
                    if cli.verbose {
                        eprintln!("Output written to: {}", path.display());
                    }
                } else {
                    println!("{rendered}");
                }
                true
            }
            Err(e) => render(&Response::failure(&e), format == OutputFormat::Json),
        },

        Command::Analyze {
            url,
            request,
            yes,
            save,
            title,
            json,
            no_cache,
        } => {
            let transcript = match fetch_cached(&pipeline, &url, no_cache).await {
                Ok(t) => t,
                Err(e) => {
                    render(&Response::failure(&e), json);
                    std::process::exit(1);
                }
            };

            eprintln!(
                "Video: {} ({})\nSource: {}\nSegments: {}",
                transcript.title,
                transcript.video_id,
                transcript.source,
                transcript.segments.len(),
            );

            if !yes && !confirm("Analyze this transcript now?")? {
                eprintln!("Analysis cancelled");
                return Ok(());
            }

            let video_title = title.or_else(|| Some(transcript.title.clone()));
            let result = pipeline
                .analyze_transcript(&transcript.video_id, transcript.segments, request)
                .await;
            let resp = Response::from(result);

            if save {
                if let Body::Analysis { analysis } = &resp.body {
                    let saved = store
                        .create(
                            config.user_id(),
                            NewAnalysis {
                                video_id: transcript.video_id.clone(),
                                video_title,
                                analysis: analysis.clone(),
                            },
                        )
                        .unwrap_or_else(|e| store_failure(e));
                    eprintln!("Saved analysis {}", saved.id);
                }
            }

            render(&resp, json)
        }

        Command::AnalyzeTranscript {
            file,
            video_id,
            request,
            json,
        } => {
            let segments = read_segments(&file)?;
            let result = pipeline.analyze_transcript(&video_id, segments, request).await;
            render(&Response::from(result), json)
        }

        Command::Saved { action, user } => {
            let user_id = user.unwrap_or_else(|| config.user_id().to_string());
            run_saved(&store, &user_id, action)?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
