//! askbox - chat-driven voice Q&A gateway for live streams
//!
//! This library provides the core pipeline:
//! - Chat intake (IRC-style connection, command parsing)
//! - Moderation (banned-word, length, and cooldown gates)
//! - A shared question queue between listener and answer loop
//! - Answer generation (LLM) and speech synthesis (TTS)
//! - Sequenced audio playback with idle filler content
//!
//! # Architecture
//!
//! ```text
//! chat line ─▶ listener ─▶ moderation ─▶ queue ─▶ answer loop ─▶ playback
//!                                                    ▲
//!                                    idle fallback ──┘ (queue empty)
//! ```

pub mod chat;
pub mod config;
pub mod daemon;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod moderation;
pub mod overlay;
pub mod pipeline;
pub mod queue;
pub mod voice;

pub use config::Config;
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use queue::{QueuedQuestion, QuestionQueue};
