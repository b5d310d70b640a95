// Resume intake: stores resume + JD text and the LLM-extracted profile.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod store;
