// LLM prompt templates for the screening analyzers.
// Placeholders are `{resume}` and `{jd}`; fill them with `fill_template`.

/// Semantic relevance prompt. The model must answer with a single integer.
pub const SEMANTIC_SCORE_PROMPT: &str = "\
You are an assistant to evaluate how well a candidate's resume matches a job description.
Provide a relevance score (integer) from 0 to 100, where 100 means perfect match.
**Respond ONLY with one integer.**

Resume:
{resume}

Job Description:
{jd}
";

/// Improvement suggestions prompt. The model must answer with bullet points.
pub const SUGGESTIONS_PROMPT: &str = "\
You are a resume improvement advisor. Compare the candidate's resume to the job description.
Provide **bullet point suggestions** to help the candidate improve the resume, focusing on:
- missing technical AND soft skills
- relevant project or experience highlighting
- using terminology from the JD
- formatting and clarity if needed

Respond with bullet points only.
Job Description:
{jd}

Resume:
{resume}

Suggestions:
";

/// Substitutes `{resume}` and `{jd}` in a single pass, so placeholder-looking
/// text inside the substituted documents is left alone.
pub fn fill_template(template: &str, resume: &str, jd: &str) -> String {
    let mut output = String::with_capacity(template.len() + resume.len() + jd.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix("{resume}") {
            output.push_str(resume);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{jd}") {
            output.push_str(jd);
            rest = after;
        } else {
            output.push('{');
            rest = &tail[1..];
        }
    }
    output.push_str(rest);
    output
}
