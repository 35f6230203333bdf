//! Line-oriented diagnostic log file.
//!
//! Independent of the access cache; code around the cache uses it to record
//! what it resolved. Lines are prefixed with the current indentation.
//!
//! ## Environment Variables
//!
//! - `DOTNET_ACCESS_LOG`: path of the log file used by [`FileLog::from_env`]
//!   (default: `dotnet-access.log.txt` in the system temp directory)
use crate::utils::sync::Mutex;
use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

pub const LOG_PATH_VAR: &str = "DOTNET_ACCESS_LOG";
const DEFAULT_FILE_NAME: &str = "dotnet-access.log.txt";
const BYTES_PER_LINE: usize = 8;
const BYTES_PER_GROUP: usize = 4;

#[derive(Debug, Default)]
struct LogState {
    indent_level: usize,
    buffer: Vec<String>,
}

#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    indent_char: char,
    state: Mutex<LogState>,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            indent_char: '\t',
            state: Mutex::new(LogState::default()),
        }
    }

    pub fn from_env() -> Self {
        let path = env::var_os(LOG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_FILE_NAME));
        Self::new(path)
    }

    pub fn with_indent_char(mut self, indent_char: char) -> Self {
        self.indent_char = indent_char;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn indent_level(&self) -> usize {
        self.state.lock().indent_level
    }

    /// Adds `delta` to the indent level, never going below zero.
    pub fn change_indent(&self, delta: isize) {
        let mut state = self.state.lock();
        state.indent_level = state.indent_level.saturating_add_signed(delta);
    }

    fn indented(&self, indent_level: usize, line: &str) -> String {
        let mut out = String::with_capacity(indent_level + line.len());
        out.extend(std::iter::repeat(self.indent_char).take(indent_level));
        out.push_str(line);
        out
    }

    fn append(&self, lines: &[String]) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }

    /// Queues a line in memory. Nothing reaches the file until
    /// [`flush_buffer`](Self::flush_buffer), so a crash loses queued lines.
    pub fn log_buffered(&self, line: &str) {
        let mut state = self.state.lock();
        let line = self.indented(state.indent_level, line);
        state.buffer.push(line);
    }

    pub fn buffered_lines(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Appends all queued lines to the file. The buffer is kept if writing fails.
    pub fn flush_buffer(&self) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.buffer.is_empty() {
            return Ok(());
        }
        self.append(&state.buffer)?;
        state.buffer.clear();
        Ok(())
    }

    /// Appends one line to the file immediately.
    pub fn log(&self, line: &str) -> io::Result<()> {
        let state = self.state.lock();
        self.append(&[self.indented(state.indent_level, line)])
    }

    /// Deletes the log file.
    pub fn reset(&self) -> io::Result<()> {
        let _state = self.state.lock();
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Logs `bytes` as hex, eight per line in groups of four, followed by a
    /// `HASH:` line with the BLAKE3 digest of the whole slice.
    pub fn log_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let state = self.state.lock();
        let mut lines: Vec<_> = hex_dump_lines(bytes)
            .into_iter()
            .map(|l| self.indented(state.indent_level, &l))
            .collect();
        let digest = blake3::hash(bytes).to_hex().to_ascii_uppercase();
        lines.push(self.indented(state.indent_level, &format!("HASH: {digest}")));
        self.append(&lines)
    }
}

fn hex_dump_lines(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(BYTES_PER_LINE)
        .map(|chunk| {
            let mut line = String::from("#  ");
            for (i, b) in chunk.iter().enumerate() {
                line.push_str(&format!("{b:02X} "));
                if i + 1 == BYTES_PER_GROUP && chunk.len() > BYTES_PER_GROUP {
                    line.push(' ');
                }
            }
            line
        })
        .collect()
}
