//! Offline replay of recorded landmark streams.
//!
//! Input is JSON lines, one record per processed frame:
//!
//! ```json
//! {"frame": 12, "landmarks": {"right_wrist": [640.0, 410.0]}, "control": "calibrate"}
//! ```
//!
//! `landmarks` omitted or `null` means the pose estimator found nobody on
//! that frame. `control` is applied after the frame has been processed, and a
//! `calibrate` uses the landmarks of that same frame.

use std::collections::BTreeMap;
use std::io::BufRead;

use log::{debug, info};
use rep_counter_core::{Exercise, Landmark, LandmarkSample, Point, RepetitionEvent};
use rep_counter_detect::Phase;
use rep_counter_sink::CounterStatus;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::pipeline::{Pipeline, PipelineError};

/// Out-of-band action attached to a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Calibrate,
    Reset,
}

/// One line of replay input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    #[serde(default)]
    pub landmarks: Option<BTreeMap<Landmark, Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Control>,
}

impl FrameRecord {
    /// Landmark sample for this frame. `scale` is `(width, height)` when the
    /// recorded coordinates are normalized.
    pub fn sample(&self, scale: Option<(f64, f64)>) -> Option<LandmarkSample> {
        let landmarks = self.landmarks.as_ref()?;
        Some(match scale {
            Some((width, height)) => LandmarkSample::from_normalized(
                self.frame,
                width,
                height,
                landmarks.iter().map(|(lm, p)| (*lm, [p.x, p.y])),
            ),
            None => LandmarkSample {
                frame: self.frame,
                landmarks: landmarks.clone(),
            },
        })
    }
}

/// Parse JSON-lines input. Blank lines are skipped; line numbers in errors
/// are 1-based.
pub fn read_records<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<FrameRecord, PipelineError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Err(e) => Some(Err(PipelineError::Io(e))),
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str(&line).map_err(|source| PipelineError::Record {
                    line: idx + 1,
                    source,
                }),
            ),
        })
}

/// Summary written at the end of a replay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayReport {
    pub exercise: Exercise,
    pub frames: u64,
    /// Frames without landmarks.
    pub missing_frames: u64,
    pub status: CounterStatus,
    pub phase: Phase,
    pub reference: Option<Point>,
    pub events: Vec<RepetitionEvent>,
    /// Calibrate actions ignored because the landmarks were not visible.
    pub failed_calibrations: u64,
    pub sink_failures: u64,
}

/// Feed every record to `pipeline`. `on_event` sees each repetition together
/// with the board status right after it was recorded.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn replay<R, F>(
    pipeline: &mut Pipeline,
    reader: R,
    scale: Option<(f64, f64)>,
    mut on_event: F,
) -> Result<ReplayReport, PipelineError>
where
    R: BufRead,
    F: FnMut(&RepetitionEvent, &CounterStatus),
{
    let mut frames = 0;
    let mut missing_frames = 0;
    let mut failed_calibrations = 0;
    let mut sink_failures = 0;
    let mut events = Vec::new();

    for record in read_records(reader) {
        let record = record?;
        let sample = record.sample(scale);
        frames += 1;
        if sample.is_none() {
            missing_frames += 1;
        }

        let outcome = pipeline.step(sample.as_ref());
        sink_failures += outcome.failures.len() as u64;
        if let Some(event) = outcome.event {
            on_event(&event, &pipeline.status());
            events.push(event);
        }

        match record.control {
            Some(Control::Calibrate) => {
                if pipeline.calibrate(sample.as_ref()).is_err() {
                    failed_calibrations += 1;
                }
            }
            Some(Control::Reset) => pipeline.reset(),
            None => {}
        }
    }
    debug!("replay: {frames} frames, {missing_frames} without landmarks");

    let status = pipeline.status();
    info!(
        "{}: {} repetitions over {} frames",
        status.exercise, status.count, frames
    );
    Ok(ReplayReport {
        exercise: status.exercise,
        frames,
        missing_frames,
        status,
        phase: pipeline.session().phase(),
        reference: pipeline.session().calibration().reference(),
        events,
        failed_calibrations,
        sink_failures,
    })
}
