use base::{FileLogger, format_date, format_timestamp, parse_level};
use log::{Level, LevelFilter, Log, Record};

#[test]
fn test_parse_level() {
    assert_eq!(parse_level("warn"), Some(LevelFilter::Warn));
    assert_eq!(parse_level(" DEBUG "), Some(LevelFilter::Debug));
    assert_eq!(parse_level("loud"), None);
}

#[test]
fn test_format_epoch() {
    assert_eq!(format_date(0), "1970-01-01");
    assert_eq!(format_timestamp(0), "1970-01-01T00:00:00");
}

#[test]
fn test_format_known_date() {
    // 2024-02-29T12:34:56Z
    assert_eq!(format_timestamp(1_709_210_096), "2024-02-29T12:34:56");
}

#[test]
fn test_file_logger_writes_enabled_records() {
    let dir = tempfile::tempdir().unwrap();
    let logger = FileLogger::new(dir.path(), LevelFilter::Info).unwrap();

    logger.log(
        &Record::builder()
            .args(format_args!("frame 3 rendered"))
            .level(Level::Info)
            .file(Some("scheduler.rs"))
            .line(Some(42))
            .build(),
    );
    logger.log(
        &Record::builder()
            .args(format_args!("too chatty"))
            .level(Level::Debug)
            .build(),
    );
    logger.flush();

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let contents = std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    assert!(contents.contains("[INFO]"));
    assert!(contents.contains("scheduler.rs:42 - frame 3 rendered"));
    assert!(!contents.contains("too chatty"));
}
