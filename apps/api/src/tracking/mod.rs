// Learning-progress marks and saved resources. Plain CRUD, no model calls.

pub mod handlers;
pub mod progress;
pub mod saved;
