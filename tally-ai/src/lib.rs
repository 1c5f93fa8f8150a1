//! tally-ai: the AI gateway for natural-language entry and spending analysis,
//! plus the safe renderer for whatever the model sends back.

pub mod entry;
pub mod llm;
pub mod markdown;

pub use entry::{ParsedEntry, analyze, parse_entry, strip_code_fences};
pub use llm::{DEFAULT_TIMEOUT_SECS, LlmConfig, Provider, chat_complete, config_from_env};
pub use markdown::{Inline, Node, parse as parse_markdown};
