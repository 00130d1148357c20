// Resume screening: skill extraction, hard/semantic scoring, candidate info,
// and the per-resume pipeline behind POST /analyze_resumes.
// All LLM calls go through llm_client via the ResumeAnalyzer trait.

pub mod analyzer;
pub mod candidate;
pub mod handlers;
pub mod hard_score;
pub mod pipeline;
pub mod prompts;
pub mod skills;
pub mod text;
