use log::debug;
use rep_counter_core::{Exercise, Metrics, RepetitionEvent};
use serde::{Deserialize, Serialize};

use crate::{ResultSink, SinkError};

/// Snapshot of a [`CounterBoard`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterStatus {
    pub exercise: Exercise,
    pub count: u64,
    /// Payload of the most recent repetition.
    pub last: Option<Metrics>,
    /// Running maximum of the exercise's primary value (height, distance,
    /// reach or throw range). `None` for count-only exercises.
    pub best: Option<f64>,
}

/// Running tally for one exercise.
#[derive(Clone, Debug)]
pub struct CounterBoard {
    status: CounterStatus,
}

impl CounterBoard {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            status: CounterStatus {
                exercise,
                count: 0,
                last: None,
                best: None,
            },
        }
    }

    #[inline]
    pub fn exercise(&self) -> Exercise {
        self.status.exercise
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.status.count
    }

    pub fn status(&self) -> CounterStatus {
        self.status
    }

    /// Add one event to the tally.
    pub fn record(&mut self, event: &RepetitionEvent) -> Result<(), SinkError> {
        let status = &mut self.status;
        if event.exercise != status.exercise {
            return Err(SinkError::ExerciseMismatch {
                expected: status.exercise,
                got: event.exercise,
            });
        }
        status.count += u64::from(event.increment);
        status.last = Some(event.metrics);
        if let Some(value) = event.metrics.primary_value() {
            status.best = Some(status.best.map_or(value, |best| best.max(value)));
        }
        debug!(
            "{} board: count={} best={:?}",
            status.exercise, status.count, status.best
        );
        Ok(())
    }

    /// Back to zero. Does not touch any detector.
    pub fn reset(&mut self) {
        *self = Self::new(self.status.exercise);
    }
}

impl ResultSink for CounterBoard {
    fn name(&self) -> &str {
        "counter_board"
    }

    fn deliver(&mut self, event: &RepetitionEvent) -> Result<(), SinkError> {
        self.record(event)
    }
}
