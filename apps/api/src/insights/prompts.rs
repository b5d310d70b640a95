// All LLM prompt constants for insights.

pub const PROGRESS_SYSTEM: &str =
    "Return ONLY valid JSON with this exact schema: { \"insights\": [\"\", \"\", \"\"] }";

/// Replace `{metrics}` with the JSON-encoded performance metrics.
pub const PROGRESS_PROMPT_TEMPLATE: &str = "Analyze this student's performance metrics and \
    generate 3 short, actionable bullet insights:\n{metrics}";

pub const PROFILE_SYSTEM: &str =
    "Return ONLY valid JSON with this exact schema: { \"suggestions\": [\"\", \"\", \"\"] }";

/// Replace `{profile}` with the JSON-encoded profile.
pub const PROFILE_PROMPT_TEMPLATE: &str = "Analyze this student profile and recommend 3 career \
    improvements (skills or actions) as short bullet points. Keep each under 16 words.\n{profile}";
