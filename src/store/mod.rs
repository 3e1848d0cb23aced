//! In-memory test case collection and its CSV/JSON import-export formats.
//!
//! The store is the source of truth for everything the pipeline produces.
//! There is exactly one writer (the pipeline loop); observers read between
//! per-item commits, so no locking is needed.

pub mod types;

use std::io;

use thiserror::Error;
use uuid::Uuid;

pub use types::TestCase;

/// Columns emitted on export, in order. `id` is optional on import only.
const CSV_HEADER: [&str; 7] = [
    "id",
    "input",
    "expected_output",
    "generated_output",
    "judgment",
    "judgment_score",
    "error",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file contains no test cases")]
    Empty,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Owns the test case collection. Replaced wholesale on a new import,
/// mutated one item at a time by the pipeline.
#[derive(Debug, Default)]
pub struct TestCaseStore {
    cases: Vec<TestCase>,
}

impl TestCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, cases: Vec<TestCase>) {
        self.cases = cases;
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn cases_mut(&mut self) -> &mut [TestCase] {
        &mut self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Parse CSV test cases from a reader.
///
/// The header row must contain at least `input` and `expected_output`.
/// Rows without an `id` receive a generated one. The optional result
/// columns pass through so a previously exported file re-imports cleanly.
pub fn import_csv(reader: impl io::Read) -> Result<Vec<TestCase>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let input_idx = column("input").ok_or(ImportError::MissingColumn("input"))?;
    let expected_idx =
        column("expected_output").ok_or(ImportError::MissingColumn("expected_output"))?;
    let id_idx = column("id");
    let generated_idx = column("generated_output");
    let judgment_idx = column("judgment");
    let score_idx = column("judgment_score");
    let error_idx = column("error");

    let field = |record: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut cases = Vec::new();
    for record in csv_reader.records() {
        let record = record?;

        let id = field(&record, id_idx).unwrap_or_else(generate_case_id);
        let input = field(&record, Some(input_idx)).unwrap_or_default();
        let expected = field(&record, Some(expected_idx)).unwrap_or_default();

        let score = match field(&record, score_idx) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(score) => Some(score),
                Err(_) => {
                    tracing::warn!(id = %id, value = %raw, "unparsable judgment_score, importing as unscored");
                    None
                }
            },
            None => None,
        };

        cases.push(TestCase {
            id,
            input,
            expected_output: expected,
            generated_output: field(&record, generated_idx),
            judgment_explanation: field(&record, judgment_idx),
            judgment_score: score,
            error: field(&record, error_idx),
        });
    }

    if cases.is_empty() {
        return Err(ImportError::Empty);
    }

    Ok(cases)
}

/// Serialize the full collection as CSV. Missing optional fields become
/// empty strings; the score is plain decimal text.
pub fn export_csv(cases: &[TestCase], writer: impl io::Write) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for case in cases {
        csv_writer.write_record([
            case.id.as_str(),
            case.input.as_str(),
            case.expected_output.as_str(),
            case.generated_output.as_deref().unwrap_or(""),
            case.judgment_explanation.as_deref().unwrap_or(""),
            &case
                .judgment_score
                .map(|s| s.to_string())
                .unwrap_or_default(),
            case.error.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize the full collection as a pretty-printed JSON array. Absent
/// optional fields are omitted.
pub fn export_json(cases: &[TestCase]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(cases)
}

fn generate_case_id() -> String {
    format!("case-{}", Uuid::new_v4())
}
