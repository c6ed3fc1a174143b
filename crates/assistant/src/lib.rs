pub mod knowledge;
pub mod responder;

/// Presentation pacing only: the HTTP layer sleeps this long before sending a
/// reply so the widget appears to "think". Correctness never depends on it.
pub const THINKING_DELAY_MS: u64 = 600;

pub use knowledge::KnowledgeBase;
pub use responder::{AssistantReply, ChatMessage, ChatRole, Intent, Responder};
