//! Audio playback to configurable output devices

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Fallback sample rate when a stream carries no rate of its own
const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Plays audio artifacts, blocking until playback completes
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Decode and play MP3 bytes on the selected output device
    ///
    /// `device` is an output device index or name fragment; `None` plays on
    /// the default device. The call returns once playback has finished.
    async fn play(&self, audio: &[u8], device: Option<&str>) -> Result<()>;
}

/// cpal-backed playback
pub struct AudioPlayback;

impl AudioPlayback {
    /// Create a playback handle
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Play raw f32 samples on the selected device, blocking until done
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened or playback fails
    pub async fn play_samples(
        &self,
        samples: Vec<f32>,
        sample_rate: u32,
        device: Option<&str>,
    ) -> Result<()> {
        let device = device.map(String::from);
        tokio::task::spawn_blocking(move || {
            play_samples_blocking(samples, sample_rate, device.as_deref())
        })
        .await
        .map_err(|e| Error::Audio(format!("playback task failed: {e}")))?
    }
}

impl Default for AudioPlayback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for AudioPlayback {
    async fn play(&self, audio: &[u8], device: Option<&str>) -> Result<()> {
        let (samples, sample_rate) = decode_mp3(audio)?;
        self.play_samples(samples, sample_rate, device).await
    }
}

/// List output device names, in enumeration order
///
/// The position in this list is the index accepted by device selectors.
///
/// # Errors
///
/// Returns error if devices cannot be enumerated
pub fn list_output_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .output_devices()
        .map_err(|e| Error::Audio(e.to_string()))?;

    Ok(devices
        .map(|d| d.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}

/// Resolve a device selector (index or name fragment) to an output device
fn resolve_output_device(selector: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();

    let Some(selector) = selector else {
        return host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()));
    };

    let devices: Vec<Device> = host
        .output_devices()
        .map_err(|e| Error::Audio(e.to_string()))?
        .collect();

    if let Ok(index) = selector.parse::<usize>() {
        return devices
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::Audio(format!("no output device at index {index}")));
    }

    let wanted = selector.to_lowercase();
    devices
        .into_iter()
        .find(|d| {
            d.name()
                .map(|n| n.to_lowercase().contains(&wanted))
                .unwrap_or(false)
        })
        .ok_or_else(|| Error::Audio(format!("no output device matching {selector:?}")))
}

/// Play samples to completion on the resolved device
fn play_samples_blocking(samples: Vec<f32>, sample_rate: u32, selector: Option<&str>) -> Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let device = resolve_output_device(selector)?;

    let supported_config = device
        .supported_output_configs()
        .map_err(|e| Error::Audio(e.to_string()))?
        .find(|c| {
            c.channels() == 1
                && c.min_sample_rate() <= SampleRate(sample_rate)
                && c.max_sample_rate() >= SampleRate(sample_rate)
        })
        .or_else(|| {
            // Fallback: try stereo
            device.supported_output_configs().ok()?.find(|c| {
                c.channels() == 2
                    && c.min_sample_rate() <= SampleRate(sample_rate)
                    && c.max_sample_rate() >= SampleRate(sample_rate)
            })
        })
        .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

    let config: StreamConfig = supported_config
        .with_sample_rate(SampleRate(sample_rate))
        .config();
    let channels = config.channels as usize;

    tracing::debug!(
        device = device.name().unwrap_or_default(),
        sample_rate,
        channels = config.channels,
        "starting playback"
    );

    let sample_count = samples.len();
    let samples = Arc::new(Mutex::new(samples));
    let position = Arc::new(Mutex::new(0usize));
    let finished = Arc::new(Mutex::new(false));
    let finished_clone = Arc::clone(&finished);

    let samples_clone = Arc::clone(&samples);
    let position_clone = Arc::clone(&position);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let samples = samples_clone.lock().unwrap();
                let mut pos = position_clone.lock().unwrap();

                for frame in data.chunks_mut(channels) {
                    let sample = if *pos < samples.len() {
                        samples[*pos]
                    } else {
                        *finished_clone.lock().unwrap() = true;
                        0.0
                    };

                    for out in frame.iter_mut() {
                        *out = sample;
                    }

                    if *pos < samples.len() {
                        *pos += 1;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    // Poll for completion with a headroom timeout
    let duration_ms = (sample_count as u64 * 1000) / u64::from(sample_rate);
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(duration_ms + 500);

    while !*finished.lock().unwrap() {
        if start.elapsed() > timeout {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    // Let the device drain the tail of the buffer
    std::thread::sleep(std::time::Duration::from_millis(100));

    drop(stream);
    tracing::debug!(samples = sample_count, "playback complete");

    Ok(())
}

/// Decode MP3 bytes to mono f32 samples and the stream's sample rate
fn decode_mp3(mp3_data: &[u8]) -> Result<(Vec<f32>, u32)> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate = DEFAULT_SAMPLE_RATE;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if frame.sample_rate > 0 {
                    sample_rate = frame.sample_rate as u32;
                }

                // Convert i16 samples to f32 and fold stereo down to mono
                let frame_samples: Vec<f32> = if frame.channels == 2 {
                    frame
                        .data
                        .chunks(2)
                        .map(|chunk| {
                            let left = f32::from(chunk[0]) / 32768.0;
                            let right =
                                f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                            f32::midpoint(left, right)
                        })
                        .collect()
                } else {
                    frame.data.iter().map(|&s| f32::from(s) / 32768.0).collect()
                };

                samples.extend(frame_samples);
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok((samples, sample_rate))
}
