/// Append-only message log shown beside the map.

use chrono::{DateTime, Local};

#[derive(Clone, Debug)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub text: String,
}

impl LogLine {
    /// Short wall-clock time, e.g. `3:07 PM`.
    pub fn timestamp(&self) -> String {
        self.at.format("%-I:%M %p").to_string()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    lines: Vec<LogLine>,
}

impl MessageLog {
    pub fn new() -> Self {
        MessageLog { lines: Vec::new() }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.push_at(Local::now(), text);
    }

    pub fn push_at(&mut self, at: DateTime<Local>, text: impl Into<String>) {
        self.lines.push(LogLine { at, text: text.into() });
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Up to `n` most recent lines, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().rev().take(n)
    }
}
