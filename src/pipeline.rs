//! The answer pipeline: one question in, announcement + answer audio out
//!
//! A cycle is strictly sequenced: overlay the question, generate the answer,
//! overlay it, synthesize the answer audio, speak the question announcement
//! on the question device, then the answer on the answer device. Any failure
//! aborts the cycle; the question is dropped, never retried or requeued.

use crate::llm::AnswerService;
use crate::overlay::OverlayWriter;
use crate::queue::QueuedQuestion;
use crate::voice::{AudioSink, SpeechService};
use crate::Result;

/// Voice and device routing for the two playback stages
#[derive(Debug, Clone)]
pub struct AudioRouting {
    /// Voice used for the synthesized answer
    pub answer_voice: String,

    /// Voice used for question announcements and filler content
    pub announcer_voice: String,

    /// Output device for announcement audio (index or name fragment)
    pub question_device: Option<String>,

    /// Output device for answer audio
    pub answer_device: Option<String>,
}

/// Converts one queued or filler question into completed audio playback
pub struct AnswerPipeline<L, S, A> {
    llm: L,
    tts: S,
    audio: A,
    overlay: OverlayWriter,
    routing: AudioRouting,
}

impl<L, S, A> AnswerPipeline<L, S, A>
where
    L: AnswerService,
    S: SpeechService,
    A: AudioSink,
{
    /// Assemble a pipeline from its collaborators
    pub fn new(llm: L, tts: S, audio: A, overlay: OverlayWriter, routing: AudioRouting) -> Self {
        Self {
            llm,
            tts,
            audio,
            overlay,
            routing,
        }
    }

    /// Run one full answer cycle for a dequeued question
    ///
    /// # Errors
    ///
    /// Returns error on any stage failure; the caller logs and drops the
    /// question.
    pub async fn answer_question(&self, question: &QueuedQuestion) -> Result<()> {
        self.overlay.clear()?;
        self.overlay.write_question(&question.text)?;

        let answer = self.llm.answer(&question.text).await?;
        tracing::info!(answer = %answer, "generated answer");
        self.overlay.write_answer(&answer)?;

        let answer_audio = self
            .tts
            .synthesize(&answer, &self.routing.answer_voice)
            .await?;

        self.announce(question.user.as_deref(), &question.text)
            .await?;

        self.audio
            .play(&answer_audio, self.routing.answer_device.as_deref())
            .await?;

        self.overlay.clear()?;
        Ok(())
    }

    /// Speak a filler question through the announcement path only
    ///
    /// No answer is generated and no answer audio plays.
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    pub async fn play_filler(&self, text: &str) -> Result<()> {
        self.announce(None, text).await?;
        self.overlay.clear()?;
        Ok(())
    }

    /// Synthesize and play the spoken announcement on the question device
    async fn announce(&self, user: Option<&str>, text: &str) -> Result<()> {
        let line = match user {
            Some(user) => format!("{user} asks, {text}"),
            None => text.to_string(),
        };

        let audio = self
            .tts
            .synthesize(&line, &self.routing.announcer_voice)
            .await?;

        self.audio
            .play(&audio, self.routing.question_device.as_deref())
            .await
    }
}
