//! Chat intake: command parsing and the outbound sender seam
//!
//! The listener owns the socket; everything that needs to talk back to the
//! channel (moderation actions, the repo-link reply) goes through the
//! `ChatSender` trait so tests can substitute a recorder.

mod irc;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

pub use irc::{IrcClient, IrcSender};

use crate::Result;

static ASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:(\w+)!\S* PRIVMSG #\S+ :!q (.+)").expect("valid regex")
});

static REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:(\w+)!\S* PRIVMSG #\S+ :!git\s*$").expect("valid regex")
});

/// A recognized chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!q <text>` — a question for the answer pipeline
    Ask {
        /// Asking user
        user: String,
        /// Question text
        text: String,
    },

    /// `!git` — request for the repository link
    RepoLink {
        /// Requesting user
        user: String,
    },
}

/// Parse one raw chat line into a command
///
/// Anything that is not one of the two recognized shapes yields `None`;
/// unrecognized traffic is not an error.
#[must_use]
pub fn parse_line(line: &str) -> Option<Command> {
    if let Some(caps) = ASK_RE.captures(line) {
        return Some(Command::Ask {
            user: caps[1].to_string(),
            text: caps[2].trim().to_string(),
        });
    }

    if let Some(caps) = REPO_RE.captures(line) {
        return Some(Command::RepoLink {
            user: caps[1].to_string(),
        });
    }

    None
}

/// Outbound side of the chat connection
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Send a message to the joined channel
    async fn send_message(&self, text: &str) -> Result<()>;
}
