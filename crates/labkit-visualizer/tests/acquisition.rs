// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use labkit_field::FieldFrame;
use labkit_hal::{ReplaySerial, SerialError, SerialIO};
use labkit_render::{FieldRenderer, RenderOptions};
use labkit_visualizer::{
    run_acquisition, AcquisitionOptions, AcquisitionSession, FrameSink, StopReason,
    VisualizerError,
};

type EventLog = Arc<Mutex<Vec<String>>>;

/// Replay link that records when it is closed
struct LoggedLink {
    inner: ReplaySerial,
    events: EventLog,
}

impl SerialIO for LoggedLink {
    type Error = SerialError;

    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        self.inner.write(data)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, SerialError> {
        self.inner.read(buffer)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<(), SerialError> {
        self.events.lock().unwrap().push("serial closed".into());
        self.inner.close()
    }

    fn at_end_of_stream(&self) -> bool {
        self.inner.at_end_of_stream()
    }
}

/// Sink that keeps frames and can refuse after N of them
struct RecordingSink {
    frames: Arc<Mutex<Vec<FieldFrame>>>,
    accept: usize,
    events: EventLog,
}

impl FrameSink for RecordingSink {
    fn show(&mut self, frame: &FieldFrame) -> Result<bool, VisualizerError> {
        let mut frames = self.frames.lock().unwrap();
        if frames.len() >= self.accept {
            return Ok(false);
        }
        frames.push(frame.clone());
        Ok(true)
    }

    fn close(&mut self) {
        self.events.lock().unwrap().push("sink closed".into());
    }
}

fn board_capture(cycles: usize) -> Vec<String> {
    let mut lines = vec!["Booting".to_string(), "Start".to_string()];
    for cycle in 0..cycles {
        for index in 0..36 {
            lines.push(format!("Mux: {} Channel: {}", index / 12, index % 12));
            lines.push(format!("Current Voltage: {:.2}", (cycle * 36 + index) as f64 * 0.01));
        }
    }
    lines
}

fn no_hold() -> AcquisitionOptions {
    AcquisitionOptions {
        hold: Duration::ZERO,
        ..AcquisitionOptions::default()
    }
}

fn harness(cycles: usize, accept: usize) -> (LoggedLink, RecordingSink, EventLog, Arc<Mutex<Vec<FieldFrame>>>) {
    let events: EventLog = Arc::default();
    let frames = Arc::default();
    let link = LoggedLink {
        inner: ReplaySerial::from_lines(board_capture(cycles)).with_chunk_size(7),
        events: events.clone(),
    };
    let sink = RecordingSink {
        frames: Arc::clone(&frames),
        accept,
        events: events.clone(),
    };
    (link, sink, events, frames)
}

#[test]
fn test_replay_renders_one_frame_per_cycle() {
    let (link, sink, events, frames) = harness(3, usize::MAX);
    let running = AtomicBool::new(true);

    let summary = run_acquisition(link, sink, no_hold(), &running).unwrap();

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames_shown, 3);
    assert_eq!(summary.readings_recorded, 108);
    assert_eq!(summary.lines_ignored, 1);
    assert_eq!(summary.lines_read, 2 + 3 * 72);
    assert_eq!(frames.lock().unwrap().len(), 3);
    assert_eq!(*events.lock().unwrap(), vec!["serial closed", "sink closed"]);
}

#[test]
fn test_closed_surface_stops_loop() {
    let (link, sink, events, frames) = harness(3, 1);
    let running = AtomicBool::new(true);

    let summary = run_acquisition(link, sink, no_hold(), &running).unwrap();

    assert_eq!(summary.stop_reason, StopReason::SurfaceClosed);
    assert_eq!(summary.frames_shown, 1);
    assert_eq!(frames.lock().unwrap().len(), 1);
    assert_eq!(*events.lock().unwrap(), vec!["serial closed", "sink closed"]);
}

#[test]
fn test_cleared_flag_interrupts_before_reading() {
    let (link, sink, events, frames) = harness(1, usize::MAX);
    let running = AtomicBool::new(false);

    let summary = run_acquisition(link, sink, no_hold(), &running).unwrap();

    assert_eq!(summary.stop_reason, StopReason::Interrupted);
    assert_eq!(summary.lines_read, 0);
    assert!(frames.lock().unwrap().is_empty());
    assert_eq!(*events.lock().unwrap(), vec!["serial closed", "sink closed"]);
}

#[test]
fn test_frame_limit() {
    let (link, sink, _events, _frames) = harness(4, usize::MAX);
    let running = AtomicBool::new(true);
    let options = AcquisitionOptions {
        max_frames: Some(2),
        ..no_hold()
    };

    let summary = run_acquisition(link, sink, options, &running).unwrap();
    assert_eq!(summary.stop_reason, StopReason::FrameLimit);
    assert_eq!(summary.frames_shown, 2);
}

#[test]
fn test_release_runs_once_on_drop() {
    let (link, sink, events, _frames) = harness(1, usize::MAX);
    {
        let mut session = AcquisitionSession::new(link, sink, no_hold());
        session.release();
    }
    assert_eq!(*events.lock().unwrap(), vec!["serial closed", "sink closed"]);
}

#[test]
fn test_serial_failure_still_releases() {
    struct FailingLink(EventLog);

    impl SerialIO for FailingLink {
        type Error = SerialError;
        fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
            Ok(data.len())
        }
        fn read(&mut self, _buffer: &mut [u8]) -> Result<usize, SerialError> {
            Err(SerialError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "device unplugged",
            )))
        }
        fn flush(&mut self) -> Result<(), SerialError> {
            Ok(())
        }
        fn close(&mut self) -> Result<(), SerialError> {
            self.0.lock().unwrap().push("serial closed".into());
            Ok(())
        }
    }

    let (_, sink, events, _) = harness(0, usize::MAX);
    let running = AtomicBool::new(true);

    let err = run_acquisition(FailingLink(events.clone()), sink, no_hold(), &running).unwrap_err();
    assert!(matches!(err, VisualizerError::Serial(SerialError::Io(_))));
    assert_eq!(*events.lock().unwrap(), vec!["serial closed", "sink closed"]);
}

#[test]
fn test_replay_through_field_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let options = RenderOptions {
        output_path: dir.path().join("field.svg"),
        ..RenderOptions::default()
    };
    let renderer = FieldRenderer::new(&options).unwrap();
    let link = ReplaySerial::from_lines(board_capture(2));
    let running = AtomicBool::new(true);

    let summary = run_acquisition(link, renderer, no_hold(), &running).unwrap();

    assert_eq!(summary.frames_shown, 2);
    assert!(options.output_path.exists());
}
