use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytlens",
    about = "Fetch YouTube transcripts and analyze them with Gemini",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show extraction method and metadata
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube video URL
        url: String,

        /// Output format: text (default), json
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ignore the transcript cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Fetch a video's transcript and analyze it
    Analyze {
        /// YouTube video URL
        url: String,

        /// Ask something specific instead of the default summary
        #[arg(short, long)]
        request: Option<String>,

        /// Skip the confirmation prompt between fetching and analyzing
        #[arg(short, long)]
        yes: bool,

        /// Save the analysis when it succeeds
        #[arg(short, long)]
        save: bool,

        /// Title stored with a saved analysis (defaults to the video title)
        #[arg(long)]
        title: Option<String>,

        /// Print the JSON response body instead of markdown
        #[arg(long)]
        json: bool,

        /// Ignore the transcript cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Analyze a transcript previously saved with `transcript --format json`
    AnalyzeTranscript {
        /// JSON file holding a segment list or a `{ "transcript": [...] }` object
        file: PathBuf,

        /// Video ID the transcript belongs to
        #[arg(long)]
        video_id: String,

        /// Ask something specific instead of the default summary
        #[arg(short, long)]
        request: Option<String>,

        /// Print the JSON response body instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Manage saved analyses
    Saved {
        #[command(subcommand)]
        action: SavedAction,

        /// User the analyses belong to (defaults to the configured local user)
        #[arg(long, global = true)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SavedAction {
    /// List saved analyses, newest first
    List,

    /// Print one saved analysis
    Show { id: String },

    /// Replace the text of a saved analysis with the contents of a file
    Edit {
        id: String,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a saved analysis
    Delete { id: String },
}
