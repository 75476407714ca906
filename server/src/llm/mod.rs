//! LLM: OpenAI-compatible adapter for the AI search endpoints.
//!
//! DESIGN
//! ======
//! Configured from environment variables. Handlers only see the
//! [`LlmChat`] trait object held in `AppState`, so tests substitute a mock
//! and a missing API key simply leaves the slot empty.

pub mod config;
pub mod openai;
pub mod types;

pub use config::{LlmConfig, LlmModels};
pub use types::{ChatRequest, ChatResponse, LlmChat, LlmError, ReasoningEffort, ResponseSchema};
