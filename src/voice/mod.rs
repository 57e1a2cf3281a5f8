//! Voice output: speech synthesis and audio playback

mod playback;
mod tts;

pub use playback::{AudioPlayback, AudioSink, list_output_devices};
pub use tts::{SpeechService, TextToSpeech};
