//! Server-sent event decoding and connection retry policy.

use std::time::Duration;

/// Default maximum number of retries for transient errors
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for exponential backoff (in milliseconds)
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Maximum delay cap (in milliseconds)
pub const MAX_DELAY_MS: u64 = 30000;

/// Retry policy applied while establishing a stream.
///
/// Once the first byte has arrived nothing is retried: a half-streamed
/// answer cannot be replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts for failed requests
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Creates a new retry config with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }

    /// Sets the maximum number of retries
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay for exponential backoff
    #[must_use]
    pub const fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    /// Calculates the delay for a given retry attempt with up to 25% jitter
    #[must_use]
    pub fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX));
        let capped_delay = delay_ms.min(MAX_DELAY_MS);

        let jitter = capped_delay
            .saturating_mul(rand_jitter_factor())
            .saturating_div(4000);
        Duration::from_millis(capped_delay.saturating_add(jitter))
    }
}

/// Pseudo-random jitter factor in `0..1000`.
#[must_use]
pub fn rand_jitter_factor() -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos % 1000)
}

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// The payload of a `data:` line.
    Data(String),
    /// The `[DONE]` terminator.
    Done,
}

/// Splits a byte stream into SSE `data:` frames.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network chunk and returns every frame it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(frame) = Self::decode_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decodes whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let rest = std::mem::take(&mut self.buffer);
        Self::decode_line(&rest)
    }

    fn decode_line(line: &[u8]) -> Option<SseFrame> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);
        // Comments (":") and other fields (event:, id:) carry nothing we use.
        let data = line.strip_prefix("data:")?.trim_start();
        if data.is_empty() {
            return None;
        }
        if data == "[DONE]" {
            return Some(SseFrame::Done);
        }
        Some(SseFrame::Data(data.to_string()))
    }
}
