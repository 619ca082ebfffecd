//! iaprof CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "iaprof", version, about = "80/20 exam-preparation mentor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter iaprof.toml
    Init,

    /// List preset courses and exam boards
    Catalog,

    /// List the key subjects for a course
    Subjects {
        /// Course, e.g. "PRF" or "ENEM"
        #[arg(long)]
        course: String,

        /// Exam board (not needed for ENEM)
        #[arg(long)]
        board: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the 80/20 study plan for a course
    Plan {
        /// Course, e.g. "PRF" or "ENEM"
        #[arg(long)]
        course: String,

        /// Exam board (not needed for ENEM)
        #[arg(long)]
        board: Option<String>,

        /// Focus subject; general Pareto focus when omitted
        #[arg(long)]
        subject: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Start an interactive practice session
    Study {
        /// Course, e.g. "PRF" or "ENEM"
        #[arg(long)]
        course: String,

        /// Exam board (not needed for ENEM)
        #[arg(long)]
        board: Option<String>,

        /// Focus subject; general Pareto focus when omitted
        #[arg(long)]
        subject: Option<String>,

        /// What you are preparing for
        #[arg(long)]
        goal: String,

        /// Report format: json, html, md, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Solve a question from a photo
    Solve {
        /// JPEG image of the question
        #[arg(long)]
        image: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score an essay against the ENEM competencies
    #[command(group(ArgGroup::new("input").required(true).args(["file", "text", "image"])))]
    Essay {
        /// Plain-text essay file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Essay text given inline
        #[arg(long)]
        text: Option<String>,

        /// JPEG photo of a handwritten essay
        #[arg(long)]
        image: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("iaprof=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Catalog => commands::catalog::execute(),
        Commands::Subjects {
            course,
            board,
            config,
        } => commands::subjects::execute(course, board, config).await,
        Commands::Plan {
            course,
            board,
            subject,
            config,
        } => commands::plan::execute(course, board, subject, config).await,
        Commands::Study {
            course,
            board,
            subject,
            goal,
            format,
            config,
        } => commands::study::execute(course, board, subject, goal, format, config).await,
        Commands::Solve { image, config } => commands::solve::execute(image, config).await,
        Commands::Essay {
            file,
            text,
            image,
            config,
        } => commands::essay::execute(file, text, image, config).await,
        Commands::ListModels { config } => commands::list_models::execute(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
