use crate::client::ModelInfo;
use crate::pipeline::{LogEvent, LogLevel, RunSummary};
use crate::store::TestCase;

pub fn print_log_event(event: &LogEvent) {
    let timestamp = chrono::Local::now().format("%H:%M:%S");
    let tag = match event.level {
        LogLevel::Info => "info",
        LogLevel::Success => " ok ",
        LogLevel::Warning => "warn",
        LogLevel::Error => "FAIL",
    };
    println!("[{}] [{}] {}", timestamp, tag, event.message);
}

pub fn print_progress(percent: u8) {
    println!("Progress: {}%", percent);
}

pub fn print_run_summary(summary: &RunSummary) {
    println!("\n--- Run Summary ---");
    println!("Cases: {}", summary.total);
    println!(
        "Completed: {} ({} succeeded, {} failed, {} skipped)",
        summary.completed, summary.succeeded, summary.failed, summary.skipped
    );
    if summary.cancelled {
        println!("Run was cancelled before finishing");
    }
    match summary.mean_score {
        Some(mean) => println!("Mean score: {:.2}", mean),
        None => println!("Mean score: n/a"),
    }
}

pub fn print_model_list(models: &[ModelInfo]) {
    if models.is_empty() {
        println!("No models installed");
        return;
    }

    println!("Available models:");
    for model in models {
        println!("  {}", model.display_name);
    }
}

pub fn print_case_table(cases: &[TestCase]) {
    println!("{:<40} | {:>5} | {}", "Case", "Score", "Status");
    println!("{}", "-".repeat(72));

    for case in cases {
        let score = case
            .judgment_score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string());
        let status = if let Some(error) = &case.error {
            format!("error: {}", error)
        } else if case.judgment_score.is_some() {
            "judged".to_string()
        } else if case.generated_output.is_some() {
            "generated".to_string()
        } else {
            "pending".to_string()
        };
        println!("{:<40} | {:>5} | {}", truncate(&case.id, 40), score, status);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
