//! Terminal interface for TQA

mod render;
mod ui;

pub use render::{format_digest, print_answer, print_failure, print_prompt};
pub use ui::{display_banner, handle_input_with_history, print_help};

// Re-export core types
pub use tqa_core::{Error, Result};
