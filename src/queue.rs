//! Shared question queue between the chat listener and the answer loop

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A moderated question waiting to be answered
#[derive(Debug, Clone)]
pub struct QueuedQuestion {
    /// Asking user, if the question came from chat (filler questions have none)
    pub user: Option<String>,

    /// Question text
    pub text: String,

    /// When the question entered the queue
    pub enqueued_at: Instant,
}

struct QueueInner {
    items: VecDeque<QueuedQuestion>,
    last_enqueue: Instant,
}

/// FIFO shared between the chat listener (producer) and the answer loop
/// (consumer), sampled concurrently by the status publisher.
pub struct QuestionQueue {
    inner: Mutex<QueueInner>,
}

impl QuestionQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                items: VecDeque::new(),
                last_enqueue: Instant::now(),
            }),
        }
    }

    /// Append a question and stamp the queue's last-activity marker
    pub fn enqueue(&self, user: Option<String>, text: String) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.push_back(QueuedQuestion {
            user,
            text,
            enqueued_at: Instant::now(),
        });
        inner.last_enqueue = Instant::now();
    }

    /// Remove and return the oldest question, if any
    pub fn dequeue(&self) -> Option<QueuedQuestion> {
        self.inner.lock().unwrap().items.pop_front()
    }

    /// Whether the queue holds no questions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().items.is_empty()
    }

    /// Number of queued questions
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// Whether no enqueue has happened within `threshold`
    #[must_use]
    pub fn is_stale(&self, threshold: Duration) -> bool {
        self.inner.lock().unwrap().last_enqueue.elapsed() > threshold
    }
}

impl Default for QuestionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let queue = QuestionQueue::new();
        queue.enqueue(Some("alice".into()), "first".into());
        queue.enqueue(Some("bob".into()), "second".into());

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue().unwrap().text, "first");
        assert_eq!(queue.dequeue().unwrap().text, "second");
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn empty_queue_reports_empty() {
        let queue = QuestionQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.enqueue(None, "filler-ish".into());
        assert!(!queue.is_empty());
    }

    #[test]
    fn enqueue_refreshes_staleness() {
        let queue = QuestionQueue::new();
        assert!(!queue.is_stale(Duration::from_secs(5)));

        queue.enqueue(Some("carol".into()), "hello".into());
        assert!(!queue.is_stale(Duration::from_secs(5)));
        // A zero threshold is immediately stale after any delay at all
        std::thread::sleep(Duration::from_millis(5));
        assert!(queue.is_stale(Duration::ZERO));
    }
}
