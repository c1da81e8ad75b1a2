//! `log` backends: a stdout logger and a day-rolling file logger.
//!
//! Both print `timestamp [LEVEL] [thread] file:line - message`. The maximum
//! level comes from `LIVE_LOG` (`error`, `warn`, `info`, `debug`, `trace`),
//! defaulting to `info`.

use {
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        fs::{self, File, OpenOptions},
        io::{self, Write},
        path::{Path, PathBuf},
        sync::Mutex,
        time::{SystemTime, UNIX_EPOCH},
    },
};

pub const LOG_LEVEL_ENV: &str = "LIVE_LOG";

/// Parse a level name as accepted in `LIVE_LOG`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn level_from_env() -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Info)
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// days since 1970-01-01 to (year, month, day), proleptic Gregorian
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}

pub fn format_date(secs: u64) -> String {
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    format!("{year:04}-{month:02}-{day:02}")
}

pub fn format_timestamp(secs: u64) -> String {
    let time_of_day = secs % 86400;
    format!(
        "{}T{:02}:{:02}:{:02}",
        format_date(secs),
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {}:{} - {}",
        format_timestamp(unix_secs()),
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

pub struct StdoutLogger {
    level: LevelFilter,
}

impl StdoutLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_record(record));
        }
    }

    fn flush(&self) {
        io::stdout().flush().ok();
    }
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

/// Appends to `<dir>/<yyyy-mm-dd>.log`, switching files when the day changes.
pub struct FileLogger {
    level: LevelFilter,
    state: Mutex<FileLoggerState>,
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>, level: LevelFilter) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let current_date = format_date(unix_secs());
        let file = Self::open_day(&dir, &current_date)?;
        Ok(Self {
            level,
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }

    fn open_day(dir: &Path, date: &str) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{date}.log")))
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let today = format_date(unix_secs());
        if today != state.current_date {
            match Self::open_day(&state.dir, &today) {
                Ok(file) => {
                    state.file = file;
                    state.current_date = today;
                }
                // keep writing to yesterday's file
                Err(error) => eprintln!("failed to roll log file: {error}"),
            }
        }
        let line = format_record(record);
        if let Err(error) = writeln!(state.file, "{line}") {
            eprintln!("failed to write log file: {error}");
            eprintln!("{line}");
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

fn install(logger: Box<dyn Log>, level: LevelFilter) -> bool {
    match log::set_boxed_logger(logger) {
        Ok(()) => {
            log::set_max_level(level);
            true
        }
        // a logger is already installed (tests, embedding applications)
        Err(_) => false,
    }
}

/// Install the stdout logger. Returns `false` if a logger was already set.
pub fn init_stdout_logger() -> bool {
    let level = level_from_env();
    install(Box::new(StdoutLogger::new(level)), level)
}

/// Install the file logger writing into `dir`.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> io::Result<bool> {
    let level = level_from_env();
    let logger = FileLogger::new(dir, level)?;
    Ok(install(Box::new(logger), level))
}
