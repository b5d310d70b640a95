// All LLM prompt constants for daily challenges.

pub const CHALLENGE_SYSTEM: &str = "You are an AI placement coach generating a daily \
    personalized interview challenge. Return ONLY valid JSON with keys: \
    {\"challenge_type\": \"coding|aptitude|sql|behavioral|conceptual\", \
    \"difficulty\": \"Easy|Medium|Hard\", \"question\": \"\", \"answer\": \"\"}";

/// Challenge prompt. Replace `{skills}`, `{resume_text}` and `{jd_text}` before sending.
pub const CHALLENGE_PROMPT_TEMPLATE: &str = r#"Generate ONE placement preparation challenge that best suits this user's profile.
The challenge can be coding, aptitude, SQL, behavioral, or conceptual; choose based on
the resume and the target job. Include a clear question and a concise solution.

Skills: {skills}
Resume: {resume_text}
Target job description: {jd_text}"#;
