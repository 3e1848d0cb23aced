use assert_cmd::{cargo::cargo_bin_cmd, Command};

/// Get a Command for llm-case-eval
pub fn llm_case_eval() -> Command {
    cargo_bin_cmd!("llm-case-eval")
}
