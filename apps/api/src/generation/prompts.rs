// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for interview question generation: a bare JSON array.
pub const QUESTIONS_SYSTEM: &str = "You are an expert placement trainer. \
    Return ONLY a valid JSON array of exactly 10 question objects without any markdown formatting: \
    [{\"question\": \"\", \"question_type\": \"behavioral|technical|coding|design|aptitude\", \
    \"difficulty\": \"easy|medium|hard\", \
    \"rationale\": \"one-line explanation why this question suits the candidate\", \
    \"related_skills\": [\"\"]}]";

/// Question prompt. Replace `{resume_json}` and `{jd_text}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Candidate profile (JSON):
{resume_json}

Job description:
{jd_text}

Generate exactly 10 unique interview questions targeted to the job description and the
candidate's skill set. Prioritize gaps between the candidate's skills and the job
description and include at least 2 behavioral questions.
Return ONLY the JSON array, no other text."#;

/// System prompt for company interview research. Replace `{company}` before sending.
pub const COMPANY_ARCHIVE_SYSTEM_TEMPLATE: &str = "You are an interviewer-research agent. \
    For the company {company}, return a JSON object \
    { \"company\": \"\", \"rounds\": [ { \"round_name\": \"\", \
    \"questions\": [{ \"question\": \"\", \"source\": \"\", \"confidence\": 0.0 }] } ], \
    \"note\": \"\" }.";

/// Company research prompt. Replace `{company}` before sending.
pub const COMPANY_ARCHIVE_PROMPT_TEMPLATE: &str = r#"Use public knowledge available up to the present and produce round-wise previous-year
interview questions for {company}.

For each question include a "source" (if available) and a confidence between 0.0 and 1.0.
If you cannot confidently claim a historical source, mark the source as "inferred" and
lower the confidence. If no information is available, return "rounds": [] and
"note": "no prior questions found"."#;

/// System prompt for learning-resource curation: a bare JSON array.
pub const RESOURCES_SYSTEM: &str = "You are a learning-content curator. \
    Output ONLY valid JSON (no markdown, comments, or extra text). \
    The JSON must be an array of up to 6 skills, each with: \
    { \"skill\": string, \"resources\": [ { \"title\": string, \"url\": string, \
    \"resource_type\": \"video|article|doc|course|repo\", \"summary\": string, \
    \"estimated_time\": \"30m|2h|10h\" } ] }. \
    For each skill provide 2-3 high-quality resources with concise 1-sentence summaries. \
    If a skill has no resources, include the skill with an empty resources array.";

/// Resources prompt. Replace `{jd_text}` before sending.
pub const RESOURCES_PROMPT_TEMPLATE: &str = r#"Extract the key technical skills from this job description and provide curated resources:

{jd_text}

Limit to the most impactful skills (max 6). Prefer official docs, high-quality tutorials,
or canonical sources. Return ONLY the JSON array, no other text."#;

/// System prompt for grouped resume suggestions.
pub const SUGGESTIONS_SYSTEM: &str = "You are a professional resume analyst. \
    Output ONLY valid JSON (no markdown, comments, or extra text). Use this exact schema: \
    { \"missing_skills\": [\"\"], \"content_improvements\": [\"\"], \
    \"keyword_optimization\": [\"\"], \"formatting_tone\": [\"\"] }";

/// Suggestions prompt. Replace `{resume_text}` and `{jd_text}` before sending.
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"Compare the following resume and job description. Highlight missing skills, experience,
or keywords that should be added to make the resume a stronger match. Suggest
improvements in tone, structure, and content, grouped under: Missing Skills,
Content Improvements, Keyword Optimization, Formatting / Tone.

Resume:
{resume_text}

Job description:
{jd_text}"#;
