use serde::{Deserialize, Serialize};

/// One input/expected-output pair plus its accumulated evaluation state.
///
/// A case starts out with only `id`, `input`, and `expected_output` set.
/// The pipeline fills in `generated_output` and the judgment fields as the
/// run progresses, or `error` when a backend call fails. A failed case keeps
/// its error until it is reprocessed successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub input: String,
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judgment_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judgment_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestCase {
    pub fn new(
        id: impl Into<String>,
        input: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        TestCase {
            id: id.into(),
            input: input.into(),
            expected_output: expected_output.into(),
            generated_output: None,
            judgment_explanation: None,
            judgment_score: None,
            error: None,
        }
    }

    /// A case is judged once it carries a score and no error.
    pub fn is_judged(&self) -> bool {
        self.judgment_score.is_some() && self.error.is_none()
    }
}
