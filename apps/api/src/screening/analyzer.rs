//! Semantic analysis: the language-model collaborator behind the semantic
//! score and the improvement suggestions.
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`, chosen once at startup:
//! `LlmResumeAnalyzer` when a credential is configured, `DisabledAnalyzer`
//! otherwise. Analyzers report failures as `AnalyzerError`; the pipeline turns
//! them into fallback values.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::{LlmClient, LlmError};
use crate::screening::prompts::{fill_template, SEMANTIC_SCORE_PROMPT, SUGGESTIONS_PROMPT};
use crate::screening::text::split_lines;

/// Used when the model answers without any integer.
pub const NEUTRAL_SEMANTIC_SCORE: f64 = 25.0;

/// Suggestions are cut to this many lines for display.
pub const MAX_SUGGESTION_LINES: usize = 3;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("language model not configured")]
    Unavailable,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    /// Relevance of the resume to the JD, normalized to 0.0 – 50.0.
    async fn score_semantic_match(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<f64, AnalyzerError>;

    /// Bullet-point improvement suggestions, at most three lines.
    async fn generate_suggestions(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<String, AnalyzerError>;

    /// "llm" or "disabled", for logs.
    fn backend(&self) -> &'static str;
}

/// Picks the analyzer for this process from the configured credential.
/// A client that fails to build degrades to `DisabledAnalyzer`.
pub fn analyzer_from_config(config: &Config) -> Arc<dyn ResumeAnalyzer> {
    let Some(api_key) = config.google_api_key.clone() else {
        warn!("GOOGLE_API_KEY not set; semantic scoring and suggestions will be disabled.");
        return Arc::new(DisabledAnalyzer);
    };

    let timeout = Duration::from_secs(config.llm_timeout_secs);
    match LlmClient::new(api_key, config.llm_model.clone(), timeout) {
        Ok(llm) => {
            info!("LLM client initialized (model: {})", llm.model());
            Arc::new(LlmResumeAnalyzer::new(llm, timeout))
        }
        Err(e) => {
            warn!("Failed to initialize LLM client: {e}; semantic scoring and suggestions will be disabled.");
            Arc::new(DisabledAnalyzer)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmResumeAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmResumeAnalyzer {
    llm: LlmClient,
    /// Upper bound for one analyzer call, retries included.
    timeout: Duration,
}

impl LlmResumeAnalyzer {
    pub fn new(llm: LlmClient, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    async fn complete(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let response = tokio::time::timeout(self.timeout, self.llm.generate(prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;
        Ok(response.text().trim().to_string())
    }
}

#[async_trait]
impl ResumeAnalyzer for LlmResumeAnalyzer {
    async fn score_semantic_match(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<f64, AnalyzerError> {
        let prompt = fill_template(SEMANTIC_SCORE_PROMPT, resume_text, jd_text);
        let text = self.complete(&prompt).await?;
        Ok(parse_semantic_score(&text))
    }

    async fn generate_suggestions(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<String, AnalyzerError> {
        let prompt = fill_template(SUGGESTIONS_PROMPT, resume_text, jd_text);
        let text = self.complete(&prompt).await?;
        Ok(truncate_suggestions(&text))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DisabledAnalyzer
// ────────────────────────────────────────────────────────────────────────────

/// Stand-in when no credential is configured. Every call reports `Unavailable`.
pub struct DisabledAnalyzer;

#[async_trait]
impl ResumeAnalyzer for DisabledAnalyzer {
    async fn score_semantic_match(
        &self,
        _resume_text: &str,
        _jd_text: &str,
    ) -> Result<f64, AnalyzerError> {
        Err(AnalyzerError::Unavailable)
    }

    async fn generate_suggestions(
        &self,
        _resume_text: &str,
        _jd_text: &str,
    ) -> Result<String, AnalyzerError> {
        Err(AnalyzerError::Unavailable)
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response handling
// ────────────────────────────────────────────────────────────────────────────

/// First integer in the model answer, clamped to 0–100 and halved.
/// No integer at all yields the neutral score.
pub fn parse_semantic_score(text: &str) -> f64 {
    match INTEGER.find(text) {
        // Digit runs too long for u64 are far above 100 anyway.
        Some(m) => m.as_str().parse::<u64>().unwrap_or(u64::MAX).min(100) as f64 * 0.5,
        None => NEUTRAL_SEMANTIC_SCORE,
    }
}

/// Keeps the first three lines of a longer answer; shorter answers pass through unchanged.
pub fn truncate_suggestions(text: &str) -> String {
    let lines = split_lines(text);
    if lines.len() > MAX_SUGGESTION_LINES {
        lines[..MAX_SUGGESTION_LINES].join("\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(parse_semantic_score("85"), 42.5);
    }

    #[test]
    fn test_parse_takes_first_integer_in_prose() {
        assert_eq!(parse_semantic_score("Score: 70 out of 100"), 35.0);
    }

    #[test]
    fn test_parse_clamps_above_hundred() {
        assert_eq!(parse_semantic_score("150"), 50.0);
        assert_eq!(parse_semantic_score("99999999999999999999999999"), 50.0);
    }

    #[test]
    fn test_parse_ignores_minus_sign() {
        assert_eq!(parse_semantic_score("-20"), 10.0);
    }

    #[test]
    fn test_parse_without_integer_is_neutral() {
        assert_eq!(parse_semantic_score("I cannot rate this."), NEUTRAL_SEMANTIC_SCORE);
        assert_eq!(parse_semantic_score(""), NEUTRAL_SEMANTIC_SCORE);
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_semantic_score("0"), 0.0);
    }

    #[test]
    fn test_truncate_keeps_first_three_lines() {
        let text = "- add Docker\n- mention AWS\n- quantify impact\n- fix typos\n- shorten";
        assert_eq!(
            truncate_suggestions(text),
            "- add Docker\n- mention AWS\n- quantify impact"
        );
    }

    #[test]
    fn test_truncate_leaves_short_answers_untouched() {
        let text = "- add Docker\r\n- mention AWS";
        assert_eq!(truncate_suggestions(text), text);
    }

    #[tokio::test]
    async fn test_disabled_analyzer_is_unavailable() {
        let analyzer = DisabledAnalyzer;
        assert!(matches!(
            analyzer.score_semantic_match("r", "j").await,
            Err(AnalyzerError::Unavailable)
        ));
        assert!(matches!(
            analyzer.generate_suggestions("r", "j").await,
            Err(AnalyzerError::Unavailable)
        ));
        assert_eq!(analyzer.backend(), "disabled");
    }

    #[test]
    fn test_analyzer_from_config_without_key_is_disabled() {
        let analyzer = analyzer_from_config(&Config::default());
        assert_eq!(analyzer.backend(), "disabled");
    }

    #[test]
    fn test_analyzer_from_config_with_key_is_llm() {
        let config = Config {
            google_api_key: Some("test-key".to_string()),
            ..Config::default()
        };
        assert_eq!(analyzer_from_config(&config).backend(), "llm");
    }
}
