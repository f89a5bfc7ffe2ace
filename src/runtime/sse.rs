/// Incremental reader for the `data:` lines of a `text/event-stream` body.
///
/// Bytes may arrive split anywhere, including inside a UTF-8 sequence, so
/// lines are cut on raw `\n` before decoding.
#[derive(Debug, Default)]
pub struct DataLines {
    pending: Vec<u8>,
    chunks: Vec<String>,
}

const DATA_PREFIX: &str = "data: ";

impl DataLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next piece of the body.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.take_line(&line[..line.len() - 1]);
        }
    }

    /// Flush a trailing line without newline and return every data payload.
    pub fn finish(mut self) -> Vec<String> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.take_line(&rest);
        }
        self.chunks
    }

    fn take_line(&mut self, raw: &[u8]) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            return;
        }

        let line = String::from_utf8_lossy(raw);
        if let Some(data) = line.strip_prefix(DATA_PREFIX) {
            self.chunks.push(data.to_string());
        }
    }
}
