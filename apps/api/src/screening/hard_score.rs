//! Hard (keyword) scoring: deterministic skill overlap between a resume and a JD.

use crate::screening::skills::extract_skills;

/// Maximum hard score; the semantic score fills the other half of 100.
pub const HARD_SCORE_MAX: f64 = 50.0;

/// Rendered in place of an empty skill list.
pub const NO_SKILLS: &str = "None";

#[derive(Debug, Clone, PartialEq)]
pub struct HardMatch {
    /// 0.0 – 50.0
    pub score: f64,
    /// JD skills present in the resume, sorted.
    pub matched: Vec<String>,
    /// JD skills absent from the resume, sorted.
    pub missing: Vec<String>,
}

/// Scores `resume_text` against `jd_text`:
/// `score = |resume ∩ jd| / |jd| × 50`.
///
/// A JD without any known skill scores 0.0 with empty lists.
pub fn get_hard_match_score(resume_text: &str, jd_text: &str) -> HardMatch {
    let jd_skills = extract_skills(jd_text);
    if jd_skills.is_empty() {
        return HardMatch {
            score: 0.0,
            matched: vec![],
            missing: vec![],
        };
    }

    let resume_skills = extract_skills(resume_text);

    // BTreeSet iteration is already sorted.
    let matched: Vec<String> = jd_skills.intersection(&resume_skills).cloned().collect();
    let missing: Vec<String> = jd_skills.difference(&resume_skills).cloned().collect();

    let score = matched.len() as f64 / jd_skills.len() as f64 * HARD_SCORE_MAX;

    HardMatch {
        score,
        matched,
        missing,
    }
}

/// `"None"` for an empty list, otherwise the skills joined by `", "`.
pub fn format_skills_list(skills: &[String]) -> String {
    if skills.is_empty() {
        NO_SKILLS.to_string()
    } else {
        skills.join(", ")
    }
}
