// Daily challenges: one generated practice question per user per UTC day.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod store;
