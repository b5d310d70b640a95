// All LLM prompt constants for the Resume Improver.

/// System prompt for the improvement analysis.
pub const IMPROVER_SYSTEM: &str = "You are an AI resume evaluator trained in ATS optimization \
    and technical hiring. Return ONLY valid JSON using exactly the keys shown. \
    No markdown fences, no commentary.";

/// Improvement analysis prompt. Replace `{resume_text}` and `{jd_text}` before sending.
pub const IMPROVER_PROMPT_TEMPLATE: &str = r#"Given a resume and a job description, analyze alignment, missing elements, phrasing,
grammar and formatting, and return the following JSON:
{
  "JD_Match_Score": <0-100>,
  "ATS_Score": <0-100>,
  "Grammar_Score": <0-100>,
  "Clarity_Score": <0-100>,
  "Keyword_Match_Percentage": <0-100>,
  "JD_Fit_Summary": "<short paragraph>",
  "Missing_Keywords": ["keyword1", "keyword2"],
  "Improvement_Recommendations": [
    {
      "Section": "<section name>",
      "Issue": "<short issue>",
      "AI_Suggestion": "<rewrite or fix>",
      "Confidence": "<low/medium/high>"
    }
  ],
  "Improved_Resume": "<rewritten resume text>"
}

Resume:
{resume_text}

Job description:
{jd_text}"#;

/// System prompt for the strict retry: a smaller schema that is easier to emit cleanly.
pub const IMPROVER_STRICT_SYSTEM: &str = "You are a professional resume improvement assistant. \
    Return ONLY valid JSON with this exact schema and no markdown: \
    { \"summary\": \"\", \"overallScore\": 0, \
    \"recommendations\": [ { \"section\": \"\", \"current\": \"\", \"improved\": \"\", \
    \"confidence\": 0.0, \"reason\": \"\" } ], \
    \"improvedResume\": \"\" }";

/// Strict retry prompt. Replace `{resume_text}` and `{jd_text}` before sending.
pub const IMPROVER_STRICT_PROMPT_TEMPLATE: &str = r#"Compare RESUME vs JD. Identify weak phrasing and misalignment and rewrite professionally.
Maintain formatting and only output JSON as specified.

RESUME:
{resume_text}

JD:
{jd_text}"#;
