//! Sequential generate-then-judge evaluation pipeline.
//!
//! One case at a time, one request in flight at a time, in input order.
//! Item *i*'s generation completes before its judgment begins, and its
//! judgment completes before item *i+1*'s generation begins. A failure on
//! one case never stops the run; the only early exit is the cancel flag,
//! checked between items.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;

use crate::client::{GenerationClient, GenerationOptions};
use crate::extract;
use crate::store::TestCase;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// A model choice is missing. Reported before any network activity.
    #[error("no {role} model selected")]
    ModelSelection { role: &'static str },
    /// Nothing to evaluate. Also reported before any network activity.
    #[error("no test cases to evaluate")]
    EmptyRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One user-facing run event, delivered through the `on_log` callback.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

impl LogEvent {
    pub fn info(message: impl Into<String>) -> Self {
        LogEvent {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        LogEvent {
            level: LogLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        LogEvent {
            level: LogLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        LogEvent {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

/// Aggregate outcome of a run, printed by the CLI once the loop ends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
    pub mean_score: Option<f64>,
}

pub struct Pipeline {
    client: GenerationClient,
}

impl Pipeline {
    pub fn new(client: GenerationClient) -> Self {
        Pipeline { client }
    }

    /// Drive every case through generation and judgment, committing state
    /// back into `cases` one item at a time.
    ///
    /// `on_item` fires after every per-case state change (generation result,
    /// judgment result, or error), `on_progress` with the rounded percentage
    /// after each case completes, `on_log` with user-facing run events.
    /// `cancel` is checked before each case; a set flag ends the run between
    /// items without touching already-committed state. With `resume`, cases
    /// that already carry a judgment and no error are skipped.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &self,
        cases: &mut [TestCase],
        eval_model: &str,
        judge_model: &str,
        options: &GenerationOptions,
        resume: bool,
        cancel: &AtomicBool,
        mut on_item: impl FnMut(usize, &TestCase),
        mut on_progress: impl FnMut(u8),
        mut on_log: impl FnMut(LogEvent),
    ) -> Result<RunSummary, PipelineError> {
        if eval_model.is_empty() {
            return Err(PipelineError::ModelSelection { role: "evaluation" });
        }
        if judge_model.is_empty() {
            return Err(PipelineError::ModelSelection { role: "judge" });
        }
        if cases.is_empty() {
            return Err(PipelineError::EmptyRun);
        }

        let options = options.clamped();
        let total = cases.len();
        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };

        on_log(LogEvent::info(format!(
            "Starting run: {} case(s), eval model '{}', judge model '{}' (num_ctx {}, temperature {})",
            total, eval_model, judge_model, options.num_ctx, options.temperature
        )));

        for (index, case) in cases.iter_mut().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                summary.cancelled = true;
                on_log(LogEvent::warning(format!(
                    "Run cancelled; {} of {} case(s) processed",
                    summary.completed, total
                )));
                break;
            }

            if resume && case.is_judged() {
                summary.completed += 1;
                summary.skipped += 1;
                on_log(LogEvent::info(format!(
                    "[{}/{}] Skipping '{}': already judged",
                    index + 1,
                    total,
                    case.id
                )));
                on_progress(percent(summary.completed, total));
                continue;
            }

            // Reset the evaluation-facing fields so a reprocessed item
            // starts clean and the state invariant holds at every commit.
            case.error = None;
            case.generated_output = None;
            case.judgment_explanation = None;
            case.judgment_score = None;

            on_log(LogEvent::info(format!(
                "[{}/{}] Evaluating '{}'",
                index + 1,
                total,
                case.id
            )));

            let generated = match self.client.generate(eval_model, &case.input, &options).await {
                Ok(text) => {
                    case.generated_output = Some(text.clone());
                    on_item(index, case);
                    on_log(LogEvent::info(format!(
                        "[{}/{}] Generation for '{}' complete",
                        index + 1,
                        total,
                        case.id
                    )));
                    text
                }
                Err(e) => {
                    case.error = Some(e.to_string());
                    on_item(index, case);
                    on_log(LogEvent::error(format!(
                        "[{}/{}] Generation for '{}' failed: {}",
                        index + 1,
                        total,
                        case.id,
                        e
                    )));
                    summary.completed += 1;
                    summary.failed += 1;
                    on_progress(percent(summary.completed, total));
                    continue;
                }
            };

            on_log(LogEvent::info(format!(
                "[{}/{}] Judging '{}'",
                index + 1,
                total,
                case.id
            )));

            let prompt = judge_prompt(&case.input, &case.expected_output, &generated);
            match self.client.generate(judge_model, &prompt, &options).await {
                Ok(raw) => {
                    let judgment = extract::extract(&raw);
                    case.judgment_score = Some(judgment.score);
                    case.judgment_explanation = Some(judgment.explanation);
                    on_item(index, case);
                    on_log(LogEvent::success(format!(
                        "[{}/{}] '{}' scored {:.1}",
                        index + 1,
                        total,
                        case.id,
                        judgment.score
                    )));
                    summary.succeeded += 1;
                }
                Err(e) => {
                    case.error = Some(e.to_string());
                    on_item(index, case);
                    on_log(LogEvent::error(format!(
                        "[{}/{}] Judgment for '{}' failed: {}",
                        index + 1,
                        total,
                        case.id,
                        e
                    )));
                    summary.failed += 1;
                }
            }

            summary.completed += 1;
            on_progress(percent(summary.completed, total));
        }

        summary.mean_score = mean_score(cases);

        if !summary.cancelled {
            on_log(LogEvent::success(format!(
                "Run complete: {} succeeded, {} failed, {} skipped",
                summary.succeeded, summary.failed, summary.skipped
            )));
        }

        Ok(summary)
    }
}

fn percent(completed: usize, total: usize) -> u8 {
    ((100.0 * completed as f64) / total as f64).round() as u8
}

fn mean_score(cases: &[TestCase]) -> Option<f64> {
    let scores: Vec<f64> = cases.iter().filter_map(|c| c.judgment_score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// The exact prompt the judge model receives.
pub fn judge_prompt(input: &str, expected: &str, generated: &str) -> String {
    format!(
        r#"You are an expert evaluator of LLM responses. Your task is to judge the quality of a generated response compared to an expected response.

Context:
- Input prompt: {input}
- Expected response: {expected}
- Generated response: {generated}

Evaluate the generated response based on the following criteria:
1. Accuracy: Does the generated response convey the same facts as the expected response?
2. Completeness: Does it cover all key points of the expected response?
3. Clarity: Is it well-structured and easy to understand?
4. Relevance: Does it stay on topic for the input prompt?

Your response should be in JSON format. Nothing else.
{{
  "score": <number>,
  "explanation": "<your detailed judgment>"
}}"#
    )
}
