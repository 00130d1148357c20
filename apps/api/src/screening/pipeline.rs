//! Scoring pipeline: turns each uploaded resume into exactly one `ScoreRecord`.
//!
//! Per resume: decode → size guard → text extraction → candidate info →
//! hard score → semantic score → suggestions → total + verdict.
//! The first disqualifying condition short-circuits into a zero-score record;
//! nothing that goes wrong with one resume affects the rest of the batch.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::documents::{self, DataUri, DocumentFormat};
use crate::screening::analyzer::{AnalyzerError, ResumeAnalyzer};
use crate::screening::candidate::extract_candidate_info;
use crate::screening::hard_score::{format_skills_list, get_hard_match_score, NO_SKILLS};

/// Stands in for a candidate name or email that could not be found.
pub const NOT_FOUND: &str = "N/A";

pub const DECODE_FAILED_MESSAGE: &str = "Could not decode resume file content.";
pub const UNREADABLE_MESSAGE: &str = "Resume file could not be read or unsupported format.";
pub const LLM_UNAVAILABLE_MESSAGE: &str = "LLM not available. Please set the GOOGLE_API_KEY.";
pub const SUGGESTIONS_FAILED_MESSAGE: &str = "Could not generate suggestions due to an error.";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// One resume as uploaded: file name plus a `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeUpload {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl Verdict {
    /// ≥ 80 → High, ≥ 50 → Medium, otherwise Low.
    pub fn from_total(total: u32) -> Self {
        if total >= 80 {
            Verdict::High
        } else if total >= 50 {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }
}

/// Per-resume result, serialized as one element of the response array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub resume_name: String,
    pub candidate_name: String,
    pub candidate_email: String,
    /// 0 – 100
    pub score: u32,
    pub verdict: Verdict,
    pub matched_skills: Vec<String>,
    pub matched_skills_formatted: String,
    pub missing_skills: Vec<String>,
    pub missing_skills_formatted: String,
    pub suggestions: String,
}

impl ScoreRecord {
    /// Zero-score record for a resume that could not be analyzed.
    fn rejected(resume_name: &str, message: impl Into<String>) -> Self {
        ScoreRecord {
            resume_name: resume_name.to_string(),
            candidate_name: NOT_FOUND.to_string(),
            candidate_email: NOT_FOUND.to_string(),
            score: 0,
            verdict: Verdict::Low,
            matched_skills: vec![],
            matched_skills_formatted: NO_SKILLS.to_string(),
            missing_skills: vec![],
            missing_skills_formatted: NO_SKILLS.to_string(),
            suggestions: message.into(),
        }
    }
}

/// `round(hard + semantic)` with ties to even, bounded to 0–100.
pub fn combine_scores(hard_score: f64, semantic_score: f64) -> u32 {
    (hard_score + semantic_score)
        .round_ties_even()
        .clamp(0.0, 100.0) as u32
}

pub fn size_limit_message(max_resume_size_mb: u64) -> String {
    format!("Resume file too large (>{max_resume_size_mb} MB).")
}

/// Analyzes every upload in order. Entries without a file name or content are skipped.
pub async fn analyze_batch(
    uploads: &[ResumeUpload],
    jd_text: &str,
    analyzer: &dyn ResumeAnalyzer,
    max_resume_size_mb: u64,
) -> Vec<ScoreRecord> {
    let mut records = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let (Some(file_name), Some(content)) = (
            upload.file_name.as_deref().filter(|s| !s.is_empty()),
            upload.content.as_deref().filter(|s| !s.is_empty()),
        ) else {
            debug!("Skipping resume entry without fileName or content");
            continue;
        };

        let record =
            analyze_resume(file_name, content, jd_text, analyzer, max_resume_size_mb).await;
        info!(
            resume = %record.resume_name,
            score = record.score,
            verdict = ?record.verdict,
            "Resume analyzed"
        );
        records.push(record);
    }

    records
}

/// Runs the full pipeline for one resume. Always returns a record.
pub async fn analyze_resume(
    file_name: &str,
    content: &str,
    jd_text: &str,
    analyzer: &dyn ResumeAnalyzer,
    max_resume_size_mb: u64,
) -> ScoreRecord {
    let uri = match DataUri::parse(content) {
        Ok(uri) => uri,
        Err(e) => {
            warn!("Could not decode {file_name}: {e}");
            return ScoreRecord::rejected(file_name, DECODE_FAILED_MESSAGE);
        }
    };

    if uri.bytes.len() as u64 > max_resume_size_mb.saturating_mul(BYTES_PER_MB) {
        warn!(
            "{file_name} is {} bytes, over the {max_resume_size_mb} MB limit",
            uri.bytes.len()
        );
        return ScoreRecord::rejected(file_name, size_limit_message(max_resume_size_mb));
    }

    let format = DocumentFormat::from_file_name(file_name);
    let resume_text = documents::extract_text_blocking(uri.bytes, format).await;
    if resume_text.trim().is_empty() {
        warn!("No text extracted from {file_name} ({})", format.as_str());
        return ScoreRecord::rejected(file_name, UNREADABLE_MESSAGE);
    }

    let candidate = extract_candidate_info(&resume_text);
    let hard = get_hard_match_score(&resume_text, jd_text);

    let semantic_score = match analyzer.score_semantic_match(&resume_text, jd_text).await {
        Ok(score) => score,
        Err(AnalyzerError::Unavailable) => 0.0,
        Err(e) => {
            warn!("Semantic scoring failed for {file_name}: {e}");
            0.0
        }
    };

    let suggestions = match analyzer.generate_suggestions(&resume_text, jd_text).await {
        Ok(text) => text,
        Err(AnalyzerError::Unavailable) => LLM_UNAVAILABLE_MESSAGE.to_string(),
        Err(e) => {
            warn!("Suggestion generation failed for {file_name}: {e}");
            SUGGESTIONS_FAILED_MESSAGE.to_string()
        }
    };

    let total = combine_scores(hard.score, semantic_score);
    debug!(
        "{file_name}: hard={:.1} semantic={:.1} total={total}",
        hard.score, semantic_score
    );

    ScoreRecord {
        resume_name: file_name.to_string(),
        candidate_name: candidate.name.unwrap_or_else(|| NOT_FOUND.to_string()),
        candidate_email: candidate.email.unwrap_or_else(|| NOT_FOUND.to_string()),
        score: total,
        verdict: Verdict::from_total(total),
        matched_skills_formatted: format_skills_list(&hard.matched),
        missing_skills_formatted: format_skills_list(&hard.missing),
        matched_skills: hard.matched,
        missing_skills: hard.missing,
        suggestions,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use base64::Engine;

    use super::*;
    use crate::documents::{docx, pdf};
    use crate::llm_client::LlmError;
    use crate::screening::analyzer::DisabledAnalyzer;

    pub(crate) const JD: &str =
        "Looking for a Python developer skilled in Docker, AWS, and communication.";

    /// Analyzer with canned answers.
    pub(crate) struct FixedAnalyzer {
        pub semantic: f64,
        pub suggestions: &'static str,
    }

    #[async_trait]
    impl ResumeAnalyzer for FixedAnalyzer {
        async fn score_semantic_match(
            &self,
            _resume_text: &str,
            _jd_text: &str,
        ) -> Result<f64, AnalyzerError> {
            Ok(self.semantic)
        }

        async fn generate_suggestions(
            &self,
            _resume_text: &str,
            _jd_text: &str,
        ) -> Result<String, AnalyzerError> {
            Ok(self.suggestions.to_string())
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    /// Analyzer whose every call fails the way a broken upstream would.
    struct FailingAnalyzer;

    #[async_trait]
    impl ResumeAnalyzer for FailingAnalyzer {
        async fn score_semantic_match(
            &self,
            _resume_text: &str,
            _jd_text: &str,
        ) -> Result<f64, AnalyzerError> {
            Err(LlmError::Api {
                status: 500,
                message: "boom".to_string(),
            }
            .into())
        }

        async fn generate_suggestions(
            &self,
            _resume_text: &str,
            _jd_text: &str,
        ) -> Result<String, AnalyzerError> {
            Err(LlmError::Timeout(std::time::Duration::from_secs(1)).into())
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    pub(crate) fn docx_data_uri(paragraphs: &[&str]) -> String {
        let bytes = docx::fixture(paragraphs);
        format!(
            "data:application/vnd.openxmlformats-officedocument.wordprocessingml.document;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    fn pdf_data_uri(pages: &[&[&str]]) -> String {
        format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(pdf::fixture(pages))
        )
    }

    fn sample_resume() -> String {
        docx_data_uri(&[
            "Jane Doe",
            "jane.doe@example.com",
            "Experienced Python developer with knowledge of AWS, Docker, and Machine Learning.",
        ])
    }

    #[test]
    fn test_verdict_boundaries_are_inclusive() {
        assert_eq!(Verdict::from_total(100), Verdict::High);
        assert_eq!(Verdict::from_total(80), Verdict::High);
        assert_eq!(Verdict::from_total(79), Verdict::Medium);
        assert_eq!(Verdict::from_total(50), Verdict::Medium);
        assert_eq!(Verdict::from_total(49), Verdict::Low);
        assert_eq!(Verdict::from_total(0), Verdict::Low);
    }

    #[test]
    fn test_combine_scores_rounds_half_to_even() {
        assert_eq!(combine_scores(37.5, 25.0), 62);
        assert_eq!(combine_scores(37.5, 26.0), 64);
        assert_eq!(combine_scores(12.5, 0.0), 12);
        assert_eq!(combine_scores(50.0, 50.0), 100);
        assert_eq!(combine_scores(0.0, 0.0), 0);
    }

    #[test]
    fn test_combine_scores_stays_in_range() {
        for hard in [0.0, 12.5, 25.0, 37.5, 50.0] {
            for semantic in (0..=100).map(|v| v as f64 * 0.5) {
                assert!(combine_scores(hard, semantic) <= 100);
            }
        }
    }

    #[test]
    fn test_record_serializes_with_camel_case_keys() {
        let record = ScoreRecord::rejected("cv.pdf", "msg");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["resumeName"], "cv.pdf");
        assert_eq!(json["candidateName"], "N/A");
        assert_eq!(json["verdict"], "Low");
        assert_eq!(json["matchedSkillsFormatted"], "None");
        assert_eq!(json["missingSkills"], serde_json::json!([]));
        assert_eq!(json["suggestions"], "msg");
    }

    #[tokio::test]
    async fn test_full_record_for_readable_resume() {
        let analyzer = FixedAnalyzer {
            semantic: 45.0,
            suggestions: "- add communication examples",
        };
        let record = analyze_resume("jane.docx", &sample_resume(), JD, &analyzer, 200).await;

        assert_eq!(record.resume_name, "jane.docx");
        assert_eq!(record.candidate_name, "Jane Doe");
        assert_eq!(record.candidate_email, "jane.doe@example.com");
        // 37.5 + 45.0 = 82.5 → 82 (ties to even)
        assert_eq!(record.score, 82);
        assert_eq!(record.verdict, Verdict::High);
        assert_eq!(record.matched_skills, vec!["aws", "docker", "python"]);
        assert_eq!(record.matched_skills_formatted, "aws, docker, python");
        assert_eq!(record.missing_skills, vec!["communication"]);
        assert_eq!(record.missing_skills_formatted, "communication");
        assert_eq!(record.suggestions, "- add communication examples");
    }

    #[tokio::test]
    async fn test_full_record_for_two_page_pdf_resume() {
        let content = pdf_data_uri(&[
            &["Jane Doe", "jane.doe@example.com", "Python developer"],
            &["Cloud work with AWS and Docker"],
        ]);
        let analyzer = FixedAnalyzer {
            semantic: 45.0,
            suggestions: "- add communication examples",
        };
        let record = analyze_resume("Jane.PDF", &content, JD, &analyzer, 200).await;

        assert_eq!(record.resume_name, "Jane.PDF");
        assert_eq!(record.candidate_name, "Jane Doe");
        assert_eq!(record.candidate_email, "jane.doe@example.com");
        assert_eq!(record.score, 82);
        assert_eq!(record.verdict, Verdict::High);
        assert_eq!(record.matched_skills, vec!["aws", "docker", "python"]);
        assert_eq!(record.missing_skills, vec!["communication"]);
        assert_eq!(record.suggestions, "- add communication examples");
    }

    #[tokio::test]
    async fn test_disabled_analyzer_gives_hard_only_score() {
        let record =
            analyze_resume("jane.docx", &sample_resume(), JD, &DisabledAnalyzer, 200).await;
        assert_eq!(record.score, 38);
        assert_eq!(record.verdict, Verdict::Low);
        assert_eq!(record.suggestions, LLM_UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_failing_analyzer_degrades_to_fallbacks() {
        let record = analyze_resume("jane.docx", &sample_resume(), JD, &FailingAnalyzer, 200).await;
        assert_eq!(record.score, 38);
        assert_eq!(record.suggestions, SUGGESTIONS_FAILED_MESSAGE);
        assert_eq!(record.matched_skills, vec!["aws", "docker", "python"]);
    }

    #[tokio::test]
    async fn test_content_without_separator_is_undecodable() {
        let record =
            analyze_resume("jane.pdf", "no-comma-here", JD, &DisabledAnalyzer, 200).await;
        assert_eq!(record, ScoreRecord::rejected("jane.pdf", DECODE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_base64_is_undecodable() {
        let record = analyze_resume(
            "jane.pdf",
            "data:application/pdf;base64,abc",
            JD,
            &DisabledAnalyzer,
            200,
        )
        .await;
        assert_eq!(record.suggestions, DECODE_FAILED_MESSAGE);
        assert_eq!(record.verdict, Verdict::Low);
    }

    #[tokio::test]
    async fn test_oversized_payload_hits_size_limit_before_decoding() {
        // Not a readable document either; the size guard runs first.
        let record = analyze_resume(
            "jane.txt",
            "data:text/plain;base64,aGVsbG8=",
            JD,
            &DisabledAnalyzer,
            0,
        )
        .await;
        assert_eq!(record.score, 0);
        assert_eq!(record.verdict, Verdict::Low);
        assert_eq!(record.suggestions, "Resume file too large (>0 MB).");
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_unreadable() {
        let content = format!(
            "data:text/plain;base64,{}",
            base64::engine::general_purpose::STANDARD.encode("Python AWS Docker")
        );
        let record = analyze_resume("jane.txt", &content, JD, &DisabledAnalyzer, 200).await;
        assert_eq!(record, ScoreRecord::rejected("jane.txt", UNREADABLE_MESSAGE));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unreadable() {
        let content = format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode("%PDF-1.7 truncated")
        );
        let record = analyze_resume("jane.pdf", &content, JD, &DisabledAnalyzer, 200).await;
        assert_eq!(record.suggestions, UNREADABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_skips_incomplete_entries() {
        let uploads = vec![
            ResumeUpload {
                file_name: Some("first.docx".to_string()),
                content: Some(sample_resume()),
            },
            ResumeUpload {
                file_name: None,
                content: Some(sample_resume()),
            },
            ResumeUpload {
                file_name: Some("broken.pdf".to_string()),
                content: Some("garbage".to_string()),
            },
            ResumeUpload {
                file_name: Some("empty.docx".to_string()),
                content: Some(String::new()),
            },
            ResumeUpload {
                file_name: Some("last.docx".to_string()),
                content: Some(sample_resume()),
            },
        ];

        let records = analyze_batch(&uploads, JD, &DisabledAnalyzer, 200).await;
        let names: Vec<&str> = records.iter().map(|r| r.resume_name.as_str()).collect();
        assert_eq!(names, vec!["first.docx", "broken.pdf", "last.docx"]);
        assert_eq!(records[1].suggestions, DECODE_FAILED_MESSAGE);
        assert_eq!(records[2].score, 38);
    }
}
