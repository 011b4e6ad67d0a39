//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Seed used for deterministic sampling.
pub const DEFAULT_SEED: u64 = 1;

/// Settings controlling text generation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    /// Zero temperature and a fixed seed, so identical histories sent to the
    /// same model version yield the same completion where the provider honors it.
    pub fn deterministic() -> Self {
        Self {
            temperature: Some(0.0),
            seed: Some(DEFAULT_SEED),
            max_tokens: None,
        }
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}
