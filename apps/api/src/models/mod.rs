pub mod challenge;
pub mod improvement;
pub mod progress;
pub mod resume;
