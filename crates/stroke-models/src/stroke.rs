//! Stroke type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tennis stroke being analyzed.
///
/// Selects which focus fragment is appended to the coaching prompt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum StrokeType {
    Forehand,
    BackhandOneHanded,
    BackhandTwoHanded,
    Serve,
    Volley,
    /// Whatever strokes are most visible in the frames
    #[default]
    General,
}

impl StrokeType {
    pub const ALL: &'static [StrokeType] = &[
        StrokeType::Forehand,
        StrokeType::BackhandOneHanded,
        StrokeType::BackhandTwoHanded,
        StrokeType::Serve,
        StrokeType::Volley,
        StrokeType::General,
    ];

    /// Resolve a form tag, falling back to [`StrokeType::General`] for
    /// anything unrecognised.
    pub fn from_tag(tag: &str) -> Self {
        tag.trim().parse().unwrap_or_default()
    }

    /// Tag as sent by the upload form.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeType::Forehand => "forehand",
            StrokeType::BackhandOneHanded => "backhand_one_handed",
            StrokeType::BackhandTwoHanded => "backhand_two_handed",
            StrokeType::Serve => "serve",
            StrokeType::Volley => "volley",
            StrokeType::General => "general",
        }
    }

    /// Title-cased label used in prompts ("Backhand One Handed").
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for StrokeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrokeType {
    type Err = StrokeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forehand" => Ok(StrokeType::Forehand),
            "backhand_one_handed" => Ok(StrokeType::BackhandOneHanded),
            "backhand_two_handed" => Ok(StrokeType::BackhandTwoHanded),
            "serve" => Ok(StrokeType::Serve),
            "volley" => Ok(StrokeType::Volley),
            "general" => Ok(StrokeType::General),
            _ => Err(StrokeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown stroke type: {0}")]
pub struct StrokeParseError(String);
