use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::ExportFormat;
use crate::client::GenerationClient;
use crate::config::Config;
use crate::output;
use crate::pipeline::Pipeline;
use crate::store::{self, TestCaseStore};

#[allow(clippy::too_many_arguments)]
pub async fn handle_run_command(
    input: &Path,
    model: &str,
    judge_model: &str,
    base_url: Option<&str>,
    num_ctx: Option<u32>,
    temperature: Option<f32>,
    output_path: Option<&PathBuf>,
    format: Option<ExportFormat>,
    resume: bool,
) -> Result<()> {
    let config = Config::load_or_default();
    let base_url = config.base_url(base_url);
    let options = config.generation_options(num_ctx, temperature);

    let file = File::open(input)
        .with_context(|| format!("Failed to open test case file: {}", input.display()))?;
    let cases = store::import_csv(file)
        .with_context(|| format!("Failed to import test cases from {}", input.display()))?;

    let mut store = TestCaseStore::new();
    store.replace(cases);
    println!("Imported {} test case(s) from {}", store.len(), input.display());

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            eprintln!("\nCancellation requested; finishing the current case...");
            cancel.store(true, std::sync::atomic::Ordering::SeqCst);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let pipeline = Pipeline::new(GenerationClient::new(base_url));
    let summary = pipeline
        .run(
            store.cases_mut(),
            model,
            judge_model,
            &options,
            resume,
            &cancel,
            |_, _| {},
            output::print_progress,
            |event| output::print_log_event(&event),
        )
        .await?;

    if let Some(path) = output_path {
        export_results(store.cases(), path, format)?;
        println!("Results written to {}", path.display());
    }

    output::print_run_summary(&summary);
    Ok(())
}

pub async fn handle_models_command(base_url: Option<&str>) -> Result<()> {
    let config = Config::load_or_default();
    let client = GenerationClient::new(config.base_url(base_url));

    let models = client
        .list_models()
        .await
        .context("Failed to list models from the generation backend")?;

    output::print_model_list(&models);
    Ok(())
}

pub fn handle_show_command(input: &Path) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open results file: {}", input.display()))?;
    let cases = store::import_csv(file)
        .with_context(|| format!("Failed to import results from {}", input.display()))?;

    output::print_case_table(&cases);
    Ok(())
}

fn export_results(
    cases: &[store::TestCase],
    path: &Path,
    format: Option<ExportFormat>,
) -> Result<()> {
    let format = format.unwrap_or_else(|| match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ExportFormat::Json,
        _ => ExportFormat::Csv,
    });

    match format {
        ExportFormat::Csv => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            store::export_csv(cases, file)
                .with_context(|| format!("Failed to write CSV results to {}", path.display()))?;
        }
        ExportFormat::Json => {
            let json = store::export_json(cases).context("Failed to serialize results as JSON")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write JSON results to {}", path.display()))?;
        }
    }

    Ok(())
}
