//! Daemon - the main gateway service
//!
//! Wires the chat listener, the queue status publisher, and the answer loop
//! together, and runs until interrupted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::chat::IrcClient;
use crate::fallback::IdleFallback;
use crate::llm::LlmClient;
use crate::moderation::ModerationFilter;
use crate::overlay::{OverlayWriter, QueueStatusWriter};
use crate::pipeline::{AnswerPipeline, AudioRouting};
use crate::queue::QuestionQueue;
use crate::voice::{AudioPlayback, TextToSpeech};
use crate::{Config, Result};

/// Intake silence after which a non-empty queue is reported as stalled
const QUEUE_STALE_AFTER: Duration = Duration::from_secs(5);

/// The askbox daemon - one chat listener, one answer loop
pub struct Daemon {
    config: Config,
}

impl Daemon {
    /// Create a new daemon instance
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the daemon until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if a component fails to initialize; runtime failures
    /// inside a cycle are logged and the loop continues
    pub async fn run(self) -> Result<()> {
        let config = self.config;

        let overlay = OverlayWriter::new(config.overlay_dir.clone());
        overlay.clear()?;
        let status = QueueStatusWriter::new(&config.overlay_dir);
        status.write(0)?;

        let queue = Arc::new(QuestionQueue::new());
        let moderation = Arc::new(ModerationFilter::new(
            &config.bad_words,
            config.chat.bad_word_filter_enabled,
            config.limits.char_limit,
            config.limits.user_question_interval,
            config.chat.timeout_seconds,
        )?);

        let llm = LlmClient::new(
            config.openai.api_key.clone(),
            config.openai.model.clone(),
            config.openai.system_prompt.clone(),
            config.openai.max_tokens,
            config.limits.request_timeout,
        )?;
        let tts = TextToSpeech::new(
            config.openai.api_key.clone(),
            config.openai.tts_model.clone(),
            config.limits.request_timeout,
        )?;
        let routing = AudioRouting {
            answer_voice: config.openai.tts_voice.clone(),
            announcer_voice: config.openai.announcer_voice.clone(),
            question_device: config.audio.question_device.clone(),
            answer_device: config.audio.answer_device.clone(),
        };
        let pipeline = AnswerPipeline::new(llm, tts, AudioPlayback::new(), overlay, routing);

        let fallback = IdleFallback::new(
            config.filler_questions.clone(),
            config.limits.idle_interval,
            config.limits.idle_fallback_enabled,
        );

        // Chat intake; a failed connect leaves the daemon running without it
        match IrcClient::connect(&config.chat).await {
            Ok(client) => {
                client.spawn_listener(Arc::clone(&moderation), Arc::clone(&queue));
            }
            Err(e) => {
                tracing::error!(error = %e, "chat connect failed, running without chat intake");
            }
        }

        // Queue status publisher
        let status_queue = Arc::clone(&queue);
        let status_interval = config.limits.status_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(status_interval);
            loop {
                interval.tick().await;
                if let Err(e) = status.write(status_queue.len()) {
                    tracing::warn!(error = %e, "queue status write failed");
                }
                if !status_queue.is_empty() && status_queue.is_stale(QUEUE_STALE_AFTER) {
                    tracing::debug!(
                        pending = status_queue.len(),
                        "questions pending with no recent intake"
                    );
                }
            }
        });

        // Set up shutdown signal
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        tracing::info!(
            channel = %config.chat.channel,
            fillers = config.filler_questions.len(),
            "daemon running"
        );

        let mut last_activity = Instant::now();
        let mut ticker = tokio::time::interval(config.limits.tick_interval);
        // Playback holds the loop for whole audio clips; don't burst-fire
        // the ticks that piled up behind it
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if let Some(question) = queue.dequeue() {
                        tracing::info!(
                            user = question.user.as_deref().unwrap_or("-"),
                            text = %question.text,
                            waited_ms = question.enqueued_at.elapsed().as_millis() as u64,
                            "processing question"
                        );
                        match pipeline.answer_question(&question).await {
                            Ok(()) => last_activity = Instant::now(),
                            Err(e) => {
                                tracing::error!(error = %e, "answer cycle failed, question dropped");
                            }
                        }
                    } else if fallback.should_fire(queue.is_empty(), last_activity.elapsed()) {
                        if let Some(filler) = fallback.pick() {
                            tracing::info!(question = filler, "playing filler question");
                            match pipeline.play_filler(filler).await {
                                Ok(()) => last_activity = Instant::now(),
                                Err(e) => {
                                    tracing::error!(error = %e, "filler playback failed");
                                }
                            }
                        }
                    }
                }
            }
        }

        tracing::info!("daemon stopped");
        Ok(())
    }
}
