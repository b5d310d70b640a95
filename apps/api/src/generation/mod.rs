// Resume-driven generation: interview questions, company archives, learning resources,
// and grouped resume suggestions.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod company;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod resources;
pub mod suggestions;
