//! TOML configuration file loading
//!
//! All fields are optional — the file is a partial overlay on top of
//! defaults, with required connection fields validated at load time.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct AskboxConfigFile {
    /// Chat connection and channel behavior
    #[serde(default)]
    pub chat: ChatFileConfig,

    /// OpenAI model and voice settings
    #[serde(default)]
    pub openai: OpenAiFileConfig,

    /// Moderation and timing limits
    #[serde(default)]
    pub limits: LimitsFileConfig,

    /// Audio output routing
    #[serde(default)]
    pub audio: AudioFileConfig,

    /// Overlay file output
    #[serde(default)]
    pub overlay: OverlayFileConfig,

    /// Word/question list files
    #[serde(default)]
    pub lists: ListsFileConfig,
}

/// Chat connection configuration
#[derive(Debug, Default, Deserialize)]
pub struct ChatFileConfig {
    /// Chat server hostname
    pub server: Option<String>,

    /// Chat server port
    pub port: Option<u16>,

    /// Bot nickname
    pub nickname: Option<String>,

    /// OAuth token (credential line of the handshake)
    pub token: Option<String>,

    /// Channel to join (leading `#` optional)
    pub channel: Option<String>,

    /// Repository URL for the `!git` reply
    pub repo_url: Option<String>,

    /// Enable the banned-word gate
    pub bad_word_filter_enabled: Option<bool>,

    /// Timeout length issued on a banned-word hit, in seconds
    pub timeout_seconds: Option<u32>,
}

/// OpenAI-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiFileConfig {
    /// API key (`ASKBOX_OPENAI_API_KEY` env var wins)
    pub api_key: Option<String>,

    /// Chat-completions model (e.g. "gpt-4o-mini")
    pub model: Option<String>,

    /// System prompt for answer generation
    pub system_prompt: Option<String>,

    /// Completion token cap
    pub max_tokens: Option<u32>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// Voice for answer audio
    pub tts_voice: Option<String>,

    /// Voice for question announcements and filler
    pub announcer_voice: Option<String>,
}

/// Moderation and timing limits
#[derive(Debug, Default, Deserialize)]
pub struct LimitsFileConfig {
    /// Per-user cooldown between questions, in seconds
    pub user_question_interval_secs: Option<u64>,

    /// Question character limit
    pub char_limit: Option<usize>,

    /// Enable idle filler questions
    pub idle_fallback_enabled: Option<bool>,

    /// Idle time before filler fires, in seconds
    pub idle_interval_secs: Option<u64>,

    /// Main loop tick cadence, in seconds
    pub tick_interval_secs: Option<u64>,

    /// Queue status publish cadence, in seconds
    pub status_interval_secs: Option<u64>,

    /// HTTP timeout for LLM/TTS calls, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Audio output routing
#[derive(Debug, Default, Deserialize)]
pub struct AudioFileConfig {
    /// Device for announcement audio (index or name fragment)
    pub question_device: Option<String>,

    /// Device for answer audio
    pub answer_device: Option<String>,
}

/// Overlay output configuration
#[derive(Debug, Default, Deserialize)]
pub struct OverlayFileConfig {
    /// Directory for question/response/queue files
    pub dir: Option<PathBuf>,
}

/// Word/question list files
#[derive(Debug, Default, Deserialize)]
pub struct ListsFileConfig {
    /// Banned-word list, one word per line
    pub bad_words_file: Option<PathBuf>,

    /// Filler question pool, one question per line
    pub filler_questions_file: Option<PathBuf>,
}
