//! quizdeck CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "Timed quizzes from question spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz on the terminal
    Take {
        /// Question bank (.csv or .json rows); optional with --resume
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of randomly drawn questions (0 = whole bank)
        #[arg(long)]
        random_count: Option<usize>,

        /// Time limit in minutes (0 = untimed)
        #[arg(long)]
        time_limit: Option<u32>,

        /// Output directory for reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format: json, html, all
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Continue the saved session instead of starting a new one
        #[arg(long)]
        resume: bool,
    },

    /// Validate a question bank
    Validate {
        /// Path to the question bank
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show a saved quiz report
    Report {
        /// Report JSON written by `quizdeck take`
        #[arg(long)]
        input: PathBuf,

        /// Also export the report as HTML
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the report as a markdown table instead
        #[arg(long)]
        markdown: bool,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            random_count,
            time_limit,
            output,
            format,
            config,
            resume,
        } => {
            commands::take::execute(commands::take::TakeArgs {
                bank,
                random_count,
                time_limit,
                output,
                format,
                config,
                resume,
            })
            .await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Report {
            input,
            html,
            markdown,
        } => commands::report::execute(input, html, markdown),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
