//! Per-analysis cost estimation.
//!
//! Rough numbers for business planning: each frame costs about 1,600 input
//! tokens at standard resolution, the system prompt about 800, and a typical
//! report about 500 output tokens.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const TOKENS_PER_IMAGE: u64 = 1_600;
pub const SYSTEM_PROMPT_TOKENS: u64 = 800;
pub const RESPONSE_TOKENS: u64 = 500;

/// USD per million input tokens.
pub const INPUT_COST_PER_MILLION: f64 = 15.00;
/// USD per million output tokens.
pub const OUTPUT_COST_PER_MILLION: f64 = 75.00;

/// Price charged per coaching session, used for the margin figure.
pub const SESSION_PRICE_USD: f64 = 25.00;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostEstimate {
    pub frames: u32,
    pub estimated_input_tokens: u64,
    pub estimated_output_tokens: u64,
    pub estimated_cost_usd: f64,
    pub gross_margin_usd: f64,
}

impl CostEstimate {
    pub fn for_frames(frames: u32) -> Self {
        let input_tokens = u64::from(frames) * TOKENS_PER_IMAGE + SYSTEM_PROMPT_TOKENS;
        let output_tokens = RESPONSE_TOKENS;

        let input_cost = input_tokens as f64 / 1_000_000.0 * INPUT_COST_PER_MILLION;
        let output_cost = output_tokens as f64 / 1_000_000.0 * OUTPUT_COST_PER_MILLION;
        let total = input_cost + output_cost;

        Self {
            frames,
            estimated_input_tokens: input_tokens,
            estimated_output_tokens: output_tokens,
            estimated_cost_usd: round_to(total, 4),
            gross_margin_usd: round_to(SESSION_PRICE_USD - total, 2),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
