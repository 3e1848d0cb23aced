use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a CSV of test cases and judge the results
    Run {
        /// Path to the test case CSV
        #[arg(long, short)]
        input: PathBuf,

        /// Model whose output is being judged
        #[arg(long)]
        model: String,

        /// Model producing the score/explanation
        #[arg(long)]
        judge_model: String,

        /// Generation backend base URL (default: http://localhost:11434)
        #[arg(long)]
        base_url: Option<String>,

        /// Context window in tokens [512-8192]
        #[arg(long)]
        num_ctx: Option<u32>,

        /// Sampling temperature [0.0-2.0]
        #[arg(long)]
        temperature: Option<f32>,

        /// Where to write results; format follows the file extension
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Force the export format regardless of extension
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Skip cases that already carry a judgment and no error
        #[arg(long)]
        resume: bool,
    },
    /// List models installed on the generation backend
    Models {
        /// Generation backend base URL (default: http://localhost:11434)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Summarize a previously exported results CSV without running anything
    Show {
        /// Path to the results CSV
        #[arg(long, short)]
        input: PathBuf,
    },
}
