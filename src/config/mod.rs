//! Configuration for the askbox gateway
//!
//! A TOML file (partial overlay over defaults) plus environment variables,
//! resolved once at startup into an explicit `Config` passed into every
//! component — word lists and the filler pool included.

pub mod file;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;

use crate::{Error, Result};
use file::AskboxConfigFile;

/// Environment variable overriding the OpenAI API key
pub const API_KEY_ENV: &str = "ASKBOX_OPENAI_API_KEY";

const DEFAULT_SERVER: &str = "irc.chat.twitch.tv";
const DEFAULT_PORT: u16 = 6667;
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You answer questions from a live stream chat. Keep answers brief and conversational.";
const DEFAULT_MAX_TOKENS: u32 = 120;
const DEFAULT_TTS_MODEL: &str = "tts-1";
const DEFAULT_TTS_VOICE: &str = "alloy";
const DEFAULT_ANNOUNCER_VOICE: &str = "onyx";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat connection and channel behavior
    pub chat: ChatConfig,

    /// OpenAI model and voice settings
    pub openai: OpenAiConfig,

    /// Moderation and timing limits
    pub limits: Limits,

    /// Audio output routing
    pub audio: AudioConfig,

    /// Directory for overlay text files
    pub overlay_dir: PathBuf,

    /// Banned-word list, lowercased
    pub bad_words: Vec<String>,

    /// Filler question pool
    pub filler_questions: Vec<String>,
}

/// Chat connection configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Chat server hostname
    pub server: String,

    /// Chat server port
    pub port: u16,

    /// Bot nickname
    pub nickname: String,

    /// OAuth token
    pub token: String,

    /// Channel to join, with leading `#`
    pub channel: String,

    /// Repository URL for the `!git` reply
    pub repo_url: Option<String>,

    /// Enable the banned-word gate
    pub bad_word_filter_enabled: bool,

    /// Timeout length issued on a banned-word hit, in seconds
    pub timeout_seconds: u32,
}

/// OpenAI model and voice settings
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: String,

    /// Chat-completions model
    pub model: String,

    /// System prompt for answer generation
    pub system_prompt: String,

    /// Completion token cap
    pub max_tokens: u32,

    /// TTS model
    pub tts_model: String,

    /// Voice for answer audio
    pub tts_voice: String,

    /// Voice for question announcements and filler
    pub announcer_voice: String,
}

/// Moderation and timing limits
#[derive(Debug, Clone)]
pub struct Limits {
    /// Per-user cooldown between questions
    pub user_question_interval: Duration,

    /// Question character limit
    pub char_limit: usize,

    /// Enable idle filler questions
    pub idle_fallback_enabled: bool,

    /// Idle time before filler fires
    pub idle_interval: Duration,

    /// Main loop tick cadence
    pub tick_interval: Duration,

    /// Queue status publish cadence
    pub status_interval: Duration,

    /// HTTP timeout for LLM/TTS calls
    pub request_timeout: Duration,
}

/// Audio output routing
#[derive(Debug, Clone, Default)]
pub struct AudioConfig {
    /// Device for announcement audio (index or name fragment)
    pub question_device: Option<String>,

    /// Device for answer audio
    pub answer_device: Option<String>,
}

impl Config {
    /// Load configuration from `path`, or the default location when `None`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, a required field
    /// is missing, or a configured word list cannot be read
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => AskboxConfigFile::default(),
            },
        };

        Self::from_file(file)
    }

    fn from_file(file: AskboxConfigFile) -> Result<Self> {
        let chat = ChatConfig {
            server: file.chat.server.unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            port: file.chat.port.unwrap_or(DEFAULT_PORT),
            nickname: file
                .chat
                .nickname
                .ok_or_else(|| Error::Config("chat.nickname is required".to_string()))?,
            token: file
                .chat
                .token
                .ok_or_else(|| Error::Config("chat.token is required".to_string()))?,
            channel: normalize_channel(
                &file
                    .chat
                    .channel
                    .ok_or_else(|| Error::Config("chat.channel is required".to_string()))?,
            ),
            repo_url: file.chat.repo_url,
            bad_word_filter_enabled: file.chat.bad_word_filter_enabled.unwrap_or(true),
            timeout_seconds: file.chat.timeout_seconds.unwrap_or(600),
        };

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or(file.openai.api_key)
            .ok_or_else(|| {
                Error::Config(format!("openai.api_key or {API_KEY_ENV} is required"))
            })?;

        let openai = OpenAiConfig {
            api_key,
            model: file.openai.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: file
                .openai
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: file.openai.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            tts_model: file
                .openai
                .tts_model
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            tts_voice: file
                .openai
                .tts_voice
                .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
            announcer_voice: file
                .openai
                .announcer_voice
                .unwrap_or_else(|| DEFAULT_ANNOUNCER_VOICE.to_string()),
        };

        let limits = Limits {
            user_question_interval: Duration::from_secs(
                file.limits.user_question_interval_secs.unwrap_or(60),
            ),
            char_limit: file.limits.char_limit.unwrap_or(200),
            idle_fallback_enabled: file.limits.idle_fallback_enabled.unwrap_or(true),
            idle_interval: Duration::from_secs(file.limits.idle_interval_secs.unwrap_or(60)),
            tick_interval: Duration::from_secs(file.limits.tick_interval_secs.unwrap_or(1).max(1)),
            status_interval: Duration::from_secs(
                file.limits.status_interval_secs.unwrap_or(1).max(1),
            ),
            request_timeout: Duration::from_secs(file.limits.request_timeout_secs.unwrap_or(30)),
        };

        let audio = AudioConfig {
            question_device: file.audio.question_device,
            answer_device: file.audio.answer_device,
        };

        let overlay_dir = file.overlay.dir.unwrap_or_else(|| PathBuf::from("."));

        let bad_words = match file.lists.bad_words_file {
            Some(path) => read_word_list(&path, true)?,
            None => Vec::new(),
        };
        let filler_questions = match file.lists.filler_questions_file {
            Some(path) => read_word_list(&path, false)?,
            None => Vec::new(),
        };

        Ok(Self {
            chat,
            openai,
            limits,
            audio,
            overlay_dir,
            bad_words,
            filler_questions,
        })
    }
}

/// Default config file location (`~/.config/askbox/config.toml` on Linux)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "askbox").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<AskboxConfigFile> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    Ok(toml::from_str(&contents)?)
}

/// Read a list file: one entry per line, trimmed, blanks skipped
fn read_word_list(path: &Path, lowercase: bool) -> Result<Vec<String>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "list file not found, using empty list");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            if lowercase {
                l.to_lowercase()
            } else {
                l.to_string()
            }
        })
        .collect())
}

/// Ensure the channel name carries its leading `#`
fn normalize_channel(channel: &str) -> String {
    if channel.starts_with('#') {
        channel.to_string()
    } else {
        format!("#{channel}")
    }
}
