use std::sync::LazyLock;

use regex::Regex;

use crate::screening::text::split_lines;

/// How many leading lines are searched for a name.
const NAME_SCAN_LINES: usize = 5;

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$").unwrap());

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Heuristic name/email extraction.
///
/// Name: first of the leading five lines that is two or more capitalized words.
/// Email: first address anywhere in the text.
pub fn extract_candidate_info(resume_text: &str) -> CandidateInfo {
    let name = split_lines(resume_text.trim())
        .into_iter()
        .take(NAME_SCAN_LINES)
        .map(str::trim)
        .find(|line| NAME.is_match(line))
        .map(String::from);

    let email = EMAIL.find(resume_text).map(|m| m.as_str().to_string());

    CandidateInfo { name, email }
}
