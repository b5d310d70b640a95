// Short AI insight lists for the dashboard and profile pages.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
