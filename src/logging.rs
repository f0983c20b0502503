//! Process-wide, file-backed log sink.
//!
//! One append-only file of timestamped, leveled text lines
//! (`ts | LEVEL | component | message`). Initialized once per process via
//! `init`; every `log` call before that is a silent no-op. No rotation.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use anyhow::Result;
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("debug") => Level::Debug,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

struct Sink {
    file: Mutex<File>,
    min_level: Level,
}

static SINK: OnceLock<Sink> = OnceLock::new();

/// Open (or create) the log file and install it as the process-wide sink.
/// A second call is ignored; the first sink wins.
pub fn init(path: &Path, min_level: Level) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            create_dir_all(dir)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = SINK.set(Sink { file: Mutex::new(file), min_level });
    Ok(())
}

/// RFC3339 timestamp with milliseconds.
fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn log(level: Level, component: &str, message: &str) {
    let Some(sink) = SINK.get() else { return };
    if level < sink.min_level {
        return;
    }
    if let Ok(mut file) = sink.file.lock() {
        let _ = writeln!(file, "{} | {} | {} | {}", ts_now(), level.as_str(), component, message);
    }
}

pub fn info(component: &str, message: &str) {
    log(Level::Info, component, message);
}

pub fn warn(component: &str, message: &str) {
    log(Level::Warn, component, message);
}

pub fn error(component: &str, message: &str) {
    log(Level::Error, component, message);
}
