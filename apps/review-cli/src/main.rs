//! M&P specification review tool.
//!
//! Extracts text from .docx specification sections, strips editorial
//! boilerplate, flags LEED references and unresolved placeholders, checks
//! the batch against the model context budget, and sends it for review.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod pipeline;
mod prompts;
mod report;
mod reviewer;

#[derive(Parser)]
#[command(name = "review-cli", version, about = "M&P specification review tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Review specification .docx files in a directory
    Review {
        /// Directory containing .docx specification files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory for review results
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,

        /// Process files but do not call the API
        #[arg(long)]
        dry_run: bool,

        /// Show detailed processing information
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("review_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Review {
            input_dir,
            output_dir,
            dry_run,
            verbose,
        } => {
            let options = pipeline::RunOptions {
                input_dir,
                output_dir,
                dry_run,
                verbose,
            };
            let outputs = pipeline::run_review(&options).await?;
            info!("Outputs written to: {}", outputs.run_dir.display());
        }
    }

    Ok(())
}
