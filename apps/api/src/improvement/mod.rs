// Resume Improver: scored analysis of a resume against a JD, with rewrites.
// Uses the retry policy with a dedicated strict prompt; results are persisted.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod report;
pub mod schema;
pub mod store;
