//! Server-sent-event framing.
//!
//! The upstream sends `data:` lines separated by blank lines. Bytes arrive in
//! arbitrary chunks, so lines (and UTF-8 sequences) may be split across
//! reads; the framer buffers raw bytes until a full line is available.

/// Incremental SSE parser that yields the `data` payload of each event.
///
/// Only the `data` field is used; `event`, `id`, `retry` and comment lines
/// are ignored. Multiple `data` lines in one event are joined with `\n`.
#[derive(Debug, Default)]
pub struct SseFramer {
    pending: Vec<u8>,
    /// Prefix of `pending` already known to hold no newline.
    scanned: usize,
    data: Vec<String>,
}

impl SseFramer {
    /// Create an empty framer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes; returns the payloads of every event completed
    /// by this chunk, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[self.scanned..]
            .iter()
            .position(|b| *b == b'\n')
        {
            let end = self.scanned + offset;
            let line = String::from_utf8_lossy(&self.pending[start..end])
                .trim_end_matches('\r')
                .to_string();
            start = end + 1;
            self.scanned = start;
            if let Some(payload) = self.feed_line(&line) {
                payloads.push(payload);
            }
        }

        self.pending.drain(..start);
        self.scanned = self.pending.len();
        payloads
    }

    /// Flush at end of stream: an unterminated trailing event is still
    /// dispatched.
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            self.scanned = 0;
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches('\r').to_string();
            if let Some(payload) = self.feed_line(&line) {
                return Some(payload);
            }
        }
        self.dispatch()
    }

    fn feed_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let payload = self.data.join("\n");
        self.data.clear();
        Some(payload)
    }
}
