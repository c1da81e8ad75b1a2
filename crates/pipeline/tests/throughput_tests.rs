use {
    pipeline::{ThroughputMeter, ThroughputReport},
    std::time::Duration,
};

#[test]
fn test_fps() {
    let report = ThroughputReport {
        frames: 50,
        elapsed: Duration::from_secs(2),
    };
    assert_eq!(report.fps(), Some(25.0));
    assert_eq!(report.to_string(), "50 frames in 2.00s (25.00 fps)");
}

#[test]
fn test_zero_frames_is_undefined() {
    let report = ThroughputReport {
        frames: 0,
        elapsed: Duration::ZERO,
    };
    assert_eq!(report.fps(), None);
    assert_eq!(report.to_string(), "0 frames in 0.00s (fps undefined)");
}

#[test]
fn test_zero_elapsed_is_undefined() {
    let report = ThroughputReport {
        frames: 3,
        elapsed: Duration::ZERO,
    };
    assert_eq!(report.fps(), None);
}

#[test]
fn test_meter_counts_frames() {
    let mut meter = ThroughputMeter::start();
    for _ in 0..4 {
        meter.record_frame();
    }
    assert_eq!(meter.frames(), 4);
    std::thread::sleep(Duration::from_millis(5));
    let report = meter.finish();
    assert_eq!(report.frames, 4);
    assert!(report.elapsed >= Duration::from_millis(5));
    assert!(report.fps().unwrap() > 0.0);
}
