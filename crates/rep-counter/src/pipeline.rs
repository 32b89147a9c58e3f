//! Frame-by-frame driver: session in, sinks out.

use log::warn;
use rep_counter_core::{LandmarkSample, Point, RepetitionEvent};
use rep_counter_detect::{DetectError, Session};
use rep_counter_sink::{CounterBoard, CounterStatus, ResultSink, SinkError};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::{ConfigError, SessionConfig};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("input line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A sink that rejected an event.
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: String,
    pub error: SinkError,
}

/// Result of feeding one frame.
#[derive(Debug, Default)]
pub struct StepOutcome {
    pub event: Option<RepetitionEvent>,
    pub failures: Vec<SinkFailure>,
}

/// Owns a [`Session`], the [`CounterBoard`] for its exercise and any number
/// of extra sinks.
pub struct Pipeline {
    session: Session,
    board: CounterBoard,
    sinks: Vec<Box<dyn ResultSink>>,
}

impl Pipeline {
    pub fn new(session: Session) -> Self {
        let board = CounterBoard::new(session.exercise());
        Self {
            session,
            board,
            sinks: Vec::new(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, PipelineError> {
        Ok(Self::new(config.build_session()?))
    }

    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.add_sink(Box::new(sink));
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn ResultSink>) {
        self.sinks.push(sink);
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn board(&self) -> &CounterBoard {
        &self.board
    }

    pub fn status(&self) -> CounterStatus {
        self.board.status()
    }

    /// Run one frame through the detector and fan a completed repetition out
    /// to the board and every sink.
    ///
    /// A sink failure is logged and returned in the outcome; the remaining
    /// sinks still receive the event.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    pub fn step(&mut self, sample: Option<&LandmarkSample>) -> StepOutcome {
        let Some(event) = self.session.process(sample) else {
            return StepOutcome::default();
        };

        let mut failures = Vec::new();
        deliver(&mut self.board, &event, &mut failures);
        for sink in &mut self.sinks {
            deliver(sink.as_mut(), &event, &mut failures);
        }
        StepOutcome {
            event: Some(event),
            failures,
        }
    }

    /// Set the reference point from `sample`. See [`Session::calibrate`].
    pub fn calibrate(
        &mut self,
        sample: Option<&LandmarkSample>,
    ) -> Result<Option<Point>, PipelineError> {
        Ok(self.session.calibrate(sample)?)
    }

    /// Drop the open cycle and zero the board. Calibration is kept.
    pub fn reset(&mut self) {
        self.session.reset();
        self.board.reset();
    }
}

fn deliver(sink: &mut dyn ResultSink, event: &RepetitionEvent, failures: &mut Vec<SinkFailure>) {
    if let Err(error) = sink.deliver(event) {
        warn!("{} sink failed for frame {}: {}", sink.name(), event.frame, error);
        failures.push(SinkFailure {
            sink: sink.name().to_string(),
            error,
        });
    }
}
