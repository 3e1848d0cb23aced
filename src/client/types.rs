use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error contract the pipeline relies on. A single attempt per call; retry
/// policy, if any ever exists, belongs to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend could not be reached at all.
    #[error("generation backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with a non-success status. The status text is
    /// carried unmodified so callers can surface it as-is.
    #[error("generation backend returned {status}: {body}")]
    Status { status: String, body: String },
    /// The backend answered 2xx but the payload did not match the protocol.
    #[error("invalid generation backend response: {0}")]
    InvalidResponse(String),
}

/// Recognized generation options. Out-of-bounds values are clamped rather
/// than rejected; anything unrecognized falls back to the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Context window in tokens, bounds [512, 8192].
    pub num_ctx: u32,
    /// Sampling temperature, bounds [0.0, 2.0].
    pub temperature: f32,
}

pub const DEFAULT_NUM_CTX: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const NUM_CTX_BOUNDS: (u32, u32) = (512, 8192);
pub const TEMPERATURE_BOUNDS: (f32, f32) = (0.0, 2.0);

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            num_ctx: DEFAULT_NUM_CTX,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationOptions {
    pub fn clamped(self) -> Self {
        GenerationOptions {
            num_ctx: self.num_ctx.clamp(NUM_CTX_BOUNDS.0, NUM_CTX_BOUNDS.1),
            temperature: self
                .temperature
                .clamp(TEMPERATURE_BOUNDS.0, TEMPERATURE_BOUNDS.1),
        }
    }
}

/// A model installed on the backend. The backend's `name` doubles as the
/// identifier, so both fields start out equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
}

#[derive(Serialize)]
pub(super) struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: WireOptions,
}

#[derive(Serialize)]
pub(super) struct WireOptions {
    pub num_ctx: u32,
    pub temperature: f32,
}

#[derive(Deserialize)]
pub(super) struct GenerateResponse {
    pub response: String,
}

#[derive(Deserialize)]
pub(super) struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagModel>,
}

#[derive(Deserialize)]
pub(super) struct TagModel {
    pub name: String,
}
