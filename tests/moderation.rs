//! Moderation gate integration tests
//!
//! Exercises the three gates in order through a recording chat sender.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use askbox::chat::ChatSender;
use askbox::moderation::ModerationFilter;

/// Chat sender that records outbound messages
#[derive(Clone, Default)]
struct RecordingSender {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingSender {
    async fn messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_message(&self, text: &str) -> askbox::Result<()> {
        self.sent.lock().await.push(text.to_string());
        Ok(())
    }
}

fn filter(words: &[&str], char_limit: usize, cooldown: Duration) -> ModerationFilter {
    let words: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
    ModerationFilter::new(&words, true, char_limit, cooldown, 600).unwrap()
}

#[tokio::test]
async fn clean_question_passes_all_gates() {
    let sender = RecordingSender::default();
    let filter = filter(&["banned"], 200, Duration::from_secs(60));

    let passed = filter.screen(&sender, "alice", "what is 2+2").await.unwrap();
    assert!(passed);
    assert!(sender.messages().await.is_empty());
}

#[tokio::test]
async fn banned_word_times_out_and_notifies() {
    let sender = RecordingSender::default();
    let filter = filter(&["banned"], 200, Duration::from_secs(60));

    let passed = filter
        .screen(&sender, "mallory", "this is Banned content")
        .await
        .unwrap();
    assert!(!passed);

    let sent = sender.messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], "/timeout mallory 600");
    assert_eq!(sent[1], "@mallory that language is not allowed.");
}

#[tokio::test]
async fn banned_word_matches_whole_words_not_substrings() {
    let sender = RecordingSender::default();
    let filter = filter(&["grass"], 200, Duration::from_secs(60));

    // "grasshopper" contains "grass" but is a different word
    let passed = filter
        .screen(&sender, "alice", "I saw a grasshopper today")
        .await
        .unwrap();
    assert!(passed);
    assert!(sender.messages().await.is_empty());

    let sender = RecordingSender::default();
    let passed = filter
        .screen(&sender, "bob", "go touch GRASS")
        .await
        .unwrap();
    assert!(!passed);
    assert_eq!(sender.messages().await.len(), 2);
}

#[tokio::test]
async fn disabled_filter_skips_bad_word_gate() {
    let sender = RecordingSender::default();
    let words = vec!["banned".to_string()];
    let filter =
        ModerationFilter::new(&words, false, 200, Duration::from_secs(60), 600).unwrap();

    let passed = filter
        .screen(&sender, "alice", "banned but allowed")
        .await
        .unwrap();
    assert!(passed);
    assert!(sender.messages().await.is_empty());
}

#[tokio::test]
async fn length_limit_boundary() {
    let sender = RecordingSender::default();
    let filter = filter(&[], 10, Duration::from_secs(60));

    // Exactly at the limit: accepted
    let passed = filter.screen(&sender, "alice", "aaaaaaaaaa").await.unwrap();
    assert!(passed);
    assert!(sender.messages().await.is_empty());

    // One over: rejected with the warning naming the limit
    let passed = filter.screen(&sender, "bob", "aaaaaaaaaaa").await.unwrap();
    assert!(!passed);
    let sent = sender.messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], "@bob your message exceeded the 10 character limit!");
}

#[tokio::test]
async fn bad_word_gate_runs_before_length_gate() {
    let sender = RecordingSender::default();
    let filter = filter(&["banned"], 5, Duration::from_secs(60));

    // Both over-length and containing a banned word: only the word gate acts
    let passed = filter
        .screen(&sender, "mallory", "banned and far too long")
        .await
        .unwrap();
    assert!(!passed);

    let sent = sender.messages().await;
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("/timeout"));
}

#[tokio::test]
async fn cooldown_rejects_silently() {
    let sender = RecordingSender::default();
    let filter = filter(&[], 200, Duration::from_secs(60));

    let first = filter.screen(&sender, "alice", "first question").await.unwrap();
    assert!(first);

    // Second question inside the window: no queue pass, no outbound message
    let second = filter
        .screen(&sender, "alice", "second question")
        .await
        .unwrap();
    assert!(!second);
    assert!(sender.messages().await.is_empty());
}

#[tokio::test]
async fn cooldown_is_per_user() {
    let sender = RecordingSender::default();
    let filter = filter(&[], 200, Duration::from_secs(60));

    assert!(filter.screen(&sender, "alice", "one").await.unwrap());
    assert!(filter.screen(&sender, "bob", "two").await.unwrap());
}

#[tokio::test]
async fn cooldown_expires() {
    let sender = RecordingSender::default();
    let filter = filter(&[], 200, Duration::from_millis(20));

    assert!(filter.screen(&sender, "alice", "one").await.unwrap());
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(filter.screen(&sender, "alice", "two").await.unwrap());
}

#[tokio::test]
async fn rejected_question_does_not_stamp_cooldown() {
    let sender = RecordingSender::default();
    let filter = filter(&["banned"], 200, Duration::from_secs(60));

    // Rejected by the word gate: must not start alice's cooldown clock
    assert!(!filter.screen(&sender, "alice", "banned").await.unwrap());
    assert!(filter.screen(&sender, "alice", "clean question").await.unwrap());
}
