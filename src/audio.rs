use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to open audio sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("sample decode failed: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("sample is empty after decode")]
    EmptySample,
}

/// Decoded PCM plus its stream parameters, shared with the audio thread.
pub struct PcmBuffer {
    pub data: Arc<Vec<i16>>,
    pub channels: u16,
    pub sample_rate: u32,
}

/// Decode an embedded WAV into an owned PCM buffer. Done once at startup;
/// the audio thread only ever reads the result.
pub fn decode_sample(wav: &'static [u8]) -> Result<PcmBuffer, AudioError> {
    let decoder = Decoder::new(Cursor::new(wav))?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let data: Vec<i16> = decoder.collect();
    if data.is_empty() {
        return Err(AudioError::EmptySample);
    }
    Ok(PcmBuffer {
        data: Arc::new(data),
        channels,
        sample_rate,
    })
}

/// Endless source over a preloaded PCM buffer.
///
/// The audio host pulls one sample per `next` call off the main thread; each
/// call must run in bounded time and performs no blocking I/O. The cursor is
/// a shared atomic so the main thread can rewind the loop while the audio
/// thread keeps pulling, without racing on a bare position/length pair.
pub struct LoopSource {
    data: Arc<Vec<i16>>,
    cursor: Arc<AtomicUsize>,
    channels: u16,
    sample_rate: u32,
}

impl LoopSource {
    /// `data` must be non-empty (guaranteed by `decode_sample`).
    pub fn new(pcm: &PcmBuffer, cursor: Arc<AtomicUsize>) -> Self {
        Self {
            data: pcm.data.clone(),
            cursor,
            channels: pcm.channels,
            sample_rate: pcm.sample_rate,
        }
    }
}

impl Iterator for LoopSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        // Single RMW: a main-thread rewind lands either before or after the
        // increment, never inside it, so it can't be overwritten.
        let pos = self.cursor.fetch_add(1, Ordering::Relaxed) % self.data.len();
        Some(self.data[pos])
    }
}

impl Source for LoopSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Owns the output stream and the loop cursor. Dropping it stops playback.
pub struct SamplePlayer {
    // The stream must outlive the sink or the device closes.
    _stream: OutputStream,
    sink: Sink,
    cursor: Arc<AtomicUsize>,
    len: usize,
}

impl SamplePlayer {
    /// Decode `wav`, open the default output device and start looping.
    pub fn new(wav: &'static [u8]) -> Result<Self, AudioError> {
        let pcm = decode_sample(wav)?;
        let cursor = Arc::new(AtomicUsize::new(0));
        let len = pcm.data.len();

        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        sink.append(LoopSource::new(&pcm, cursor.clone()));
        sink.play();

        log::info!(
            "Audio loop started: {} samples, {} Hz, {} ch",
            len,
            pcm.sample_rate,
            pcm.channels
        );

        Ok(Self {
            _stream: stream,
            sink,
            cursor,
            len,
        })
    }

    /// Rewind the loop to sample 0. The cursor only ever changes through
    /// single atomic operations, so the rewind cannot be lost to an
    /// in-flight sample fetch.
    pub fn restart(&self) {
        self.cursor.store(0, Ordering::Relaxed);
    }

    pub fn toggle_pause(&self) {
        if self.sink.is_paused() {
            self.sink.play();
        } else {
            self.sink.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    /// Loop progress in 0..1, for the audio demo's level bar. The raw
    /// cursor counts samples ever pulled; position within the loop is its
    /// remainder.
    pub fn progress(&self) -> f32 {
        (self.cursor.load(Ordering::Relaxed) % self.len) as f32 / self.len as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LOOP_WAV;

    #[test]
    fn embedded_sample_decodes() {
        let pcm = decode_sample(LOOP_WAV).unwrap();
        assert_eq!(pcm.channels, 1);
        assert_eq!(pcm.sample_rate, 22050);
        assert!(!pcm.data.is_empty());
    }

    #[test]
    fn source_wraps_at_buffer_end() {
        let pcm = PcmBuffer {
            data: Arc::new(vec![1, 2, 3, 4]),
            channels: 1,
            sample_rate: 22050,
        };
        let cursor = Arc::new(AtomicUsize::new(0));
        let mut src = LoopSource::new(&pcm, cursor);

        let pulled: Vec<i16> = (0..6).map(|_| src.next().unwrap()).collect();
        assert_eq!(pulled, vec![1, 2, 3, 4, 1, 2]);
    }

    #[test]
    fn rewinding_cursor_restarts_the_loop() {
        let pcm = PcmBuffer {
            data: Arc::new(vec![10, 20, 30]),
            channels: 1,
            sample_rate: 22050,
        };
        let cursor = Arc::new(AtomicUsize::new(0));
        let mut src = LoopSource::new(&pcm, cursor.clone());

        src.next();
        src.next();
        cursor.store(0, Ordering::Relaxed);
        assert_eq!(src.next(), Some(10));
    }

    #[test]
    fn rewind_is_honored_after_the_cursor_wraps() {
        let pcm = PcmBuffer {
            data: Arc::new(vec![10, 20, 30]),
            channels: 1,
            sample_rate: 22050,
        };
        let cursor = Arc::new(AtomicUsize::new(0));
        let mut src = LoopSource::new(&pcm, cursor.clone());

        // The raw cursor counts past the buffer length; a rewind must still
        // land at sample 0, not at some stale increment.
        for _ in 0..7 {
            src.next();
        }
        cursor.store(0, Ordering::Relaxed);
        assert_eq!(src.next(), Some(10));
        assert_eq!(src.next(), Some(20));
    }

    #[test]
    fn rewind_survives_a_concurrent_audio_pull() {
        let pcm = PcmBuffer {
            data: Arc::new((0i16..64).collect()),
            channels: 1,
            sample_rate: 22050,
        };
        let cursor = Arc::new(AtomicUsize::new(0));
        let mut src = LoopSource::new(&pcm, cursor.clone());

        let rewinder = cursor.clone();
        let handle = std::thread::spawn(move || {
            for _ in 0..1000 {
                rewinder.store(0, Ordering::Relaxed);
            }
        });
        for _ in 0..1000 {
            src.next();
        }
        handle.join().unwrap();

        // Each pull is one atomic increment, so the final store(0) can at
        // most be followed by pulls that happened after it — the cursor can
        // never jump back past the buffer into a pre-rewind count.
        cursor.store(0, Ordering::Relaxed);
        assert_eq!(src.next(), Some(0));
    }

    #[test]
    fn empty_sample_is_rejected() {
        // A WAV header with no data frames decodes to zero samples.
        let header: &'static [u8] = &[
            0x52, 0x49, 0x46, 0x46, 0x24, 0x00, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45, 0x66, 0x6d,
            0x74, 0x20, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x22, 0x56, 0x00, 0x00,
            0x44, 0xac, 0x00, 0x00, 0x02, 0x00, 0x10, 0x00, 0x64, 0x61, 0x74, 0x61, 0x00, 0x00,
            0x00, 0x00,
        ];
        assert!(matches!(
            decode_sample(header),
            Err(AudioError::EmptySample) | Err(AudioError::Decode(_))
        ));
    }
}
