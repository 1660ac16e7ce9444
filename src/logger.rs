use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    prefix: Option<String>,
    file: Mutex<File>,
}

impl Logger {
    fn new(prefix: Option<String>, file: File) -> Self {
        Self { prefix, file: Mutex::new(file) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        let entry = match self.prefix {
            Some(ref prefix) => {
                format!("[{}][{}][{}:{}] {}", timestamp, prefix, file_name, line, message)
            }
            None => format!("[{}][{}:{}] {}", timestamp, file_name, line, message),
        };

        // The terminal is in raw mode, so there is nowhere to report a failed write.
        if let Ok(mut out) = self.file.lock() {
            let _ = writeln!(out, "{}", entry);
        }
    }
}

/// Opens `path` for appending. Later calls keep the first logger.
pub fn init_logger(prefix: Option<String>, path: &Path) -> io::Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    LOGGER.get_or_init(|| Logger::new(prefix, file));
    Ok(())
}

/// No-op until `init_logger` has run.
pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
