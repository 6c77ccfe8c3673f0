//! FAQ Relay - chat relay grounding an LLM in a FAQ corpus
//!
//! The relay accepts chat messages over HTTP, keeps a short per-session
//! transcript in memory, asks a completion API for a reply using a fixed
//! domain prompt plus the FAQ corpus, and renders markdown links in the
//! reply as HTML.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   HTTP API                   │
//! │     /api/chat  /api/end-session  /health     │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                 Chat Service                 │
//! │    Sessions  │  Prompt  │  Links  │  FAQ     │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │           Completion API (OpenAI)            │
//! └──────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod chat;
pub mod config;
pub mod daemon;
pub mod error;
pub mod faq;
pub mod links;
pub mod llm;
pub mod prompt;
pub mod session;

pub use chat::{ChatReply, ChatService, ChatSettings};
pub use config::Config;
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use faq::Faq;
pub use links::{LinkConfig, LinkFormatter};
pub use llm::{ChatMessage, CompletionClient, CompletionRequest, OpenAiClient};
pub use session::{Role, Session, SessionHandle, SessionStore, Turn};
