mod cli;
mod client;
mod commands;
mod config;
mod extract;
mod output;
mod pipeline;
mod store;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run {
            input,
            model,
            judge_model,
            base_url,
            num_ctx,
            temperature,
            output,
            format,
            resume,
        } => {
            commands::handle_run_command(
                input,
                model,
                judge_model,
                base_url.as_deref(),
                *num_ctx,
                *temperature,
                output.as_ref(),
                *format,
                *resume,
            )
            .await
        }
        Commands::Models { base_url } => commands::handle_models_command(base_url.as_deref()).await,
        Commands::Show { input } => commands::handle_show_command(input),
    }
}
