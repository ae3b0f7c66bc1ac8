// Module declarations
mod pull;
mod push;

// Re-export public types and functions
pub use pull::{extract_template, pull_template, ExtractedTemplate};
pub use push::push_templates;
