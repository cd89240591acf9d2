/*
[INPUT]:  Console config, session store, client, tracing output
[OUTPUT]: Ratatui-based TUI for login, task boards, and the execution view
[POS]:    TUI module for the soliforge binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

pub use runtime::run_tui_with_log;

pub(crate) const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

pub fn new_log_buffer() -> LogBufferHandle {
    Arc::new(StdMutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)))
}

/// Ring buffer of formatted tracing lines shown in the Diagnostics tab
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

fn push_to(buffer: &LogBufferHandle, line: String) {
    buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_line(line);
}

#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            push_to(&self.buffer, line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            push_to(&self.buffer, std::mem::take(&mut self.partial));
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_buffer_drops_oldest_lines() {
        let mut buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push_line(format!("line {i}"));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.tail(2), vec!["line 3", "line 4"]);
        assert_eq!(buffer.tail(10), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_log_writer_splits_lines_and_flushes_partial() {
        let handle = new_log_buffer();
        let factory = LogWriterFactory::new(handle.clone());
        {
            let mut writer = factory.make_writer();
            writer.write_all(b"first\r\nsecond\nthi").unwrap();
            writer.write_all(b"rd").unwrap();
        }
        let lines = handle.lock().unwrap().tail(10);
        assert_eq!(lines, vec!["first", "second", "third"]);
    }
}
