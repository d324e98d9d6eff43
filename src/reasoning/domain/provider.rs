//! Reasoning-engine provider formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire format spoken by a reasoning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// OpenAI-compatible chat completions with function tools.
    OpenAi,
    /// Anthropic messages with `tool_use` content blocks.
    Anthropic,
    /// Gemini `generateContent` with function declarations.
    Gemini,
    /// Plain-text ReAct protocol (`Action:` / `Action Input:` /
    /// `Final Answer:`).
    ReAct,
}

impl Provider {
    /// Returns the canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::ReAct => "react",
        }
    }

    /// Returns `true` when the provider exchanges structured tool calls
    /// rather than text.
    #[must_use]
    pub const fn has_native_tools(self) -> bool {
        !matches!(self, Self::ReAct)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when a provider name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported provider '{0}' (expected: openai, anthropic, gemini, react)")]
pub struct ParseProviderError(pub String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            "react" => Ok(Self::ReAct),
            _ => Err(ParseProviderError(value.to_owned())),
        }
    }
}

impl TryFrom<&str> for Provider {
    type Error = ParseProviderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("openai", Provider::OpenAi)]
    #[case("OpenAI", Provider::OpenAi)]
    #[case(" Anthropic ", Provider::Anthropic)]
    #[case("GEMINI", Provider::Gemini)]
    #[case("ReAct", Provider::ReAct)]
    fn parses_case_insensitively(#[case] input: &str, #[case] expected: Provider) {
        assert_eq!(input.parse::<Provider>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_provider() {
        let err = Provider::try_from("ollama").expect_err("ollama is not supported");
        assert_eq!(err, ParseProviderError("ollama".to_owned()));
    }

    #[rstest]
    fn display_round_trips_through_parse() {
        for provider in [
            Provider::OpenAi,
            Provider::Anthropic,
            Provider::Gemini,
            Provider::ReAct,
        ] {
            assert_eq!(provider.to_string().parse::<Provider>(), Ok(provider));
        }
    }
}
