// Prompt template for the compliance assessment.
// The JSON-only system prompt is shared from llm_client::prompts.

/// Compliance assessment prompt. Placeholders: {resume}, {job_description}.
pub const COMPLIANCE_PROMPT_TEMPLATE: &str = r#"You are an experienced recruiter and applicant tracking system (ATS) reviewer.
Assess how well the resume below complies with the job description that follows it.

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

Assessment rules:
- score: an integer from 0 to 100. 100 means every requirement, skill and keyword in the job
  description is clearly evidenced in the resume; 0 means none are.
- missingKeywords: skills, tools, certifications and keywords the job description asks for that
  the resume does not mention, most important first.
- suggestions: concrete, actionable edits that would raise the score, most impactful first.
  Never suggest inventing experience the resume does not support.

Respond with a JSON object containing exactly the fields "score", "missingKeywords" and
"suggestions" and nothing else, in this shape:
{"score": 0, "missingKeywords": ["keyword"], "suggestions": ["suggestion"]}"#;

/// Renders the compliance prompt for a resume and job description.
///
/// Both inputs are embedded verbatim. Substitution is single-pass, so placeholder-looking text
/// inside either input is never expanded.
pub fn build_compliance_prompt(resume: &str, job_description: &str) -> String {
    fill_template(
        COMPLIANCE_PROMPT_TEMPLATE,
        &[("{resume}", resume), ("{job_description}", job_description)],
    )
}

fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match values.iter().find(|(placeholder, _)| candidate.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &candidate[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
