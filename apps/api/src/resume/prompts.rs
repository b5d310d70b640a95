// All LLM prompt constants for resume parsing.

/// System prompt for resume extraction: enforces JSON-only output.
pub const RESUME_PARSE_SYSTEM: &str = "You are an extraction agent. \
    Output ONLY valid JSON without any markdown formatting, comments, or extra text. \
    The JSON must match this exact schema: \
    { \"name\": \"\", \"email\": \"\", \"skills\": [\"\"], \
    \"experience\": [{\"company\": \"\", \"title\": \"\", \"start\": \"\", \"end\": \"\", \"bullets\": [\"\"]}], \
    \"education\": [{\"institution\": \"\", \"degree\": \"\", \"year\": \"\"}], \
    \"projects\": [{\"name\": \"\", \"summary\": \"\"}] }";

/// Resume extraction prompt. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Here is the resume text:

{resume_text}

If a field is missing, return an empty string or an empty list for that key.
Return ONLY the JSON object, no other text."#;
