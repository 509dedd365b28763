// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Acquisition loop
//!
//! Reads board lines one at a time, feeds them to the [`GridAssembler`] and
//! shows a field frame for every completed grid. The session owns both the
//! serial link and the frame sink and releases them in that order on every
//! exit path, including early returns and panics.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use labkit_config::LabkitConfig;
use labkit_field::{field_transform, GridAssembler, LineOutcome};
use labkit_hal::{LineReader, SerialError, SerialIO};

use crate::error::VisualizerError;
use crate::sink::FrameSink;

const HOLD_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionOptions {
    /// Pause after each shown frame
    pub hold: Duration,
    pub reset_grid_each_cycle: bool,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(2000),
            reset_grid_each_cycle: false,
            max_frames: None,
        }
    }
}

impl AcquisitionOptions {
    pub fn from_config(config: &LabkitConfig) -> Self {
        Self {
            hold: config.acquisition.hold(),
            reset_grid_each_cycle: config.acquisition.reset_grid_each_cycle,
            max_frames: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The render surface was closed
    SurfaceClosed,
    /// The shutdown flag was cleared (Ctrl-C)
    Interrupted,
    /// A finite source (replay) ran out of data
    EndOfStream,
    /// `max_frames` frames were shown
    FrameLimit,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl StopReason {
    pub fn name(&self) -> &'static str {
        match self {
            StopReason::SurfaceClosed => "surface closed",
            StopReason::Interrupted => "interrupted",
            StopReason::EndOfStream => "end of stream",
            StopReason::FrameLimit => "frame limit reached",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionSummary {
    pub lines_read: u64,
    pub readings_recorded: u64,
    pub lines_ignored: u64,
    pub frames_shown: u64,
    pub stop_reason: StopReason,
}

impl Display for AcquisitionSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines, {} readings, {} ignored, {} frames ({})",
            self.lines_read, self.readings_recorded, self.lines_ignored, self.frames_shown, self.stop_reason
        )
    }
}

pub struct AcquisitionSession<S, K>
where
    S: SerialIO<Error = SerialError>,
    K: FrameSink,
{
    reader: LineReader<S>,
    sink: K,
    assembler: GridAssembler,
    options: AcquisitionOptions,
    frames_shown: u64,
    released: bool,
}

impl<S, K> AcquisitionSession<S, K>
where
    S: SerialIO<Error = SerialError>,
    K: FrameSink,
{
    pub fn new(link: S, sink: K, options: AcquisitionOptions) -> Self {
        let assembler = GridAssembler::new().with_reset_each_cycle(options.reset_grid_each_cycle);
        Self {
            reader: LineReader::new(link),
            sink,
            assembler,
            options,
            frames_shown: 0,
            released: false,
        }
    }

    /// Process lines until a stop condition. Serial errors other than read
    /// timeouts are returned as-is; the session still releases on drop.
    pub fn run(&mut self, running: &AtomicBool) -> Result<AcquisitionSummary, VisualizerError> {
        let stop_reason = self.process(running)?;
        let summary = self.summary(stop_reason);
        tracing::info!(target: "labkit_visualizer", "Acquisition stopped: {}", summary);
        Ok(summary)
    }

    fn process(&mut self, running: &AtomicBool) -> Result<StopReason, VisualizerError> {
        while running.load(Ordering::SeqCst) {
            let Some(line) = self.reader.read_line()? else {
                if self.reader.is_finished() {
                    return Ok(StopReason::EndOfStream);
                }
                continue;
            };

            let LineOutcome::GridComplete(grid) = self.assembler.feed(&line) else {
                continue;
            };

            let frame = field_transform(&grid);
            if !self.sink.show(&frame)? {
                return Ok(StopReason::SurfaceClosed);
            }
            self.frames_shown += 1;

            if self
                .options
                .max_frames
                .is_some_and(|limit| self.frames_shown >= limit)
            {
                return Ok(StopReason::FrameLimit);
            }
            hold(self.options.hold, running);
        }
        Ok(StopReason::Interrupted)
    }

    fn summary(&self, stop_reason: StopReason) -> AcquisitionSummary {
        let stats = self.assembler.stats();
        AcquisitionSummary {
            lines_read: self.reader.lines_read(),
            readings_recorded: stats.readings_recorded,
            lines_ignored: stats.lines_ignored,
            frames_shown: self.frames_shown,
            stop_reason,
        }
    }

    /// Close the serial link, then the render surface. Runs once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.reader.get_mut().close() {
            tracing::warn!(target: "labkit_visualizer", "Failed to close serial link: {}", e);
        }
        self.sink.close();
        tracing::info!(target: "labkit_visualizer", "Plot window closed.");
    }

    pub fn assembler(&self) -> &GridAssembler {
        &self.assembler
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

impl<S, K> Drop for AcquisitionSession<S, K>
where
    S: SerialIO<Error = SerialError>,
    K: FrameSink,
{
    fn drop(&mut self) {
        self.release();
    }
}

/// Run one session to completion and release its resources.
pub fn run_acquisition<S, K>(
    link: S,
    sink: K,
    options: AcquisitionOptions,
    running: &AtomicBool,
) -> Result<AcquisitionSummary, VisualizerError>
where
    S: SerialIO<Error = SerialError>,
    K: FrameSink,
{
    let mut session = AcquisitionSession::new(link, sink, options);
    session.run(running)
}

/// Sleep for `duration`, waking early if the shutdown flag clears.
fn hold(duration: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + duration;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(HOLD_POLL.min(deadline - now));
    }
}
