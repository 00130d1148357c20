//! Skill extraction against a fixed, closed vocabulary.

use std::collections::{BTreeSet, HashSet};

use crate::screening::text::tokenize;

/// Words never counted as skills.
pub const STOP_WORDS: &[&str] = &[
    "and", "the", "of", "in", "to", "a", "with", "for", "on", "is", "are", "that", "by", "as",
    "this", "an", "or", "at", "from", "it", "be", "which", "you", "we",
];

/// Canonical lowercase skill names. Multi-word entries are matched as phrases.
pub const KNOWN_SKILLS: &[&str] = &[
    "python",
    "java",
    "sql",
    "excel",
    "machine learning",
    "deep learning",
    "communication",
    "teamwork",
    "project management",
    "docker",
    "aws",
    "javascript",
    "react",
    "nodejs",
    "git",
    "linux",
];

/// Returns the known skills mentioned in `text`.
///
/// Single-word skills must appear as a whole word token. A multi-word skill
/// must appear as consecutive tokens, so "Machine\nLearning" counts but
/// "machinelearning" does not.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = tokenize(&lowered).collect();
    let words: HashSet<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !STOP_WORDS.contains(t))
        .collect();

    KNOWN_SKILLS
        .iter()
        .filter(|skill| {
            let parts: Vec<&str> = skill.split_whitespace().collect();
            match parts.as_slice() {
                [single] => words.contains(single),
                phrase => tokens.windows(phrase.len()).any(|w| w == phrase),
            }
        })
        .map(|skill| skill.to_string())
        .collect()
}
