//! Question moderation: three ordered gates before a question may queue
//!
//! Gate order is fixed — banned word, then length, then per-user cooldown —
//! and the first failing gate short-circuits the rest. The first two gates
//! reply in chat; the cooldown gate rejects silently.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use regex::Regex;

use crate::chat::ChatSender;
use crate::{Error, Result};

/// Bound on the number of users tracked for cooldown purposes
const RATE_LIMIT_CAPACITY: usize = 1024;

/// Delay between the timeout action and the explanatory notice, so the
/// timeout has registered with the server before the notice is seen
const TIMEOUT_NOTICE_DELAY: Duration = Duration::from_millis(500);

/// Enforces the banned-word, length, and cooldown gates
pub struct ModerationFilter {
    banned: Option<Regex>,
    char_limit: usize,
    cooldown: Duration,
    timeout_secs: u32,
    recent: Mutex<LruCache<String, Instant>>,
}

impl ModerationFilter {
    /// Build a filter from the loaded banned-word list and limits
    ///
    /// When `filter_enabled` is false, or the word list is empty, the
    /// banned-word gate is skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns error if the banned-word pattern cannot be compiled
    pub fn new(
        banned_words: &[String],
        filter_enabled: bool,
        char_limit: usize,
        cooldown: Duration,
        timeout_secs: u32,
    ) -> Result<Self> {
        let banned = if filter_enabled {
            build_word_pattern(banned_words)?
        } else {
            None
        };

        let capacity = NonZeroUsize::new(RATE_LIMIT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            banned,
            char_limit,
            cooldown,
            timeout_secs,
            recent: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Run a question through the gates
    ///
    /// Returns `Ok(true)` when the question passed all three gates; the
    /// caller is expected to enqueue it immediately. A passing question
    /// stamps the user's cooldown clock.
    ///
    /// # Errors
    ///
    /// Returns error if an outbound moderation reply fails to send
    pub async fn screen<S: ChatSender + ?Sized>(
        &self,
        sender: &S,
        user: &str,
        text: &str,
    ) -> Result<bool> {
        if let Some(pattern) = &self.banned {
            if pattern.is_match(text) {
                sender
                    .send_message(&format!("/timeout {user} {}", self.timeout_secs))
                    .await?;
                tokio::time::sleep(TIMEOUT_NOTICE_DELAY).await;
                sender
                    .send_message(&format!("@{user} that language is not allowed."))
                    .await?;
                tracing::info!(user, "question rejected and user timed out");
                return Ok(false);
            }
        }

        if text.chars().count() > self.char_limit {
            sender
                .send_message(&format!(
                    "@{user} your message exceeded the {} character limit!",
                    self.char_limit
                ))
                .await?;
            tracing::info!(user, "question rejected over length limit");
            return Ok(false);
        }

        let mut recent = self.recent.lock().unwrap();
        if let Some(last) = recent.peek(user) {
            if last.elapsed() < self.cooldown {
                tracing::debug!(user, "question rejected within cooldown window");
                return Ok(false);
            }
        }
        recent.put(user.to_string(), Instant::now());

        Ok(true)
    }
}

/// Compile the word list into a single whole-word, case-insensitive pattern
fn build_word_pattern(words: &[String]) -> Result<Option<Regex>> {
    let escaped: Vec<String> = words
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(w))
        .collect();

    if escaped.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"(?i)\b(?:{})\b", escaped.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| Error::Config(format!("invalid banned-word pattern: {e}")))
}
