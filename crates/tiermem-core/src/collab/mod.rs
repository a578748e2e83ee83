//! Collaborators of the tiered memory core.
//!
//! - **template** - Versioned prompt templates behind a render capability
//! - **assistant** - Remote assistant sessions with run polling
//! - **cache** - Unbounded cache for assistant objects

pub mod assistant;
pub mod cache;
pub mod template;

pub use assistant::{
    AssistantError, AssistantResult, AssistantService, MessageId, PollConfig, RunId, RunPoller,
    RunState, RunStatus, SessionId, ask,
};
pub use cache::AssistantCache;
pub use template::{
    PromptRenderer, PromptTemplate, PromptVariable, TemplateBindings, TemplateError,
    TemplateRegistry, TemplateResult,
};
