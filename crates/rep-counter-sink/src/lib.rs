//! Destinations for completed repetitions.
//!
//! A [`ResultSink`] receives every [`RepetitionEvent`](rep_counter_core::RepetitionEvent)
//! a detector emits. Delivery failures are returned to the caller; they never
//! feed back into detection and are not retried here.
//!
//! - [`CounterBoard`] keeps the running count, last payload and best value
//!   that the live counters display.
//! - [`JsonLinesSink`] appends one JSON object per event to any writer.

mod board;
mod error;
mod jsonl;

pub use board::{CounterBoard, CounterStatus};
pub use error::SinkError;
pub use jsonl::JsonLinesSink;

use rep_counter_core::RepetitionEvent;

/// Anything that accepts repetition events.
pub trait ResultSink {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn deliver(&mut self, event: &RepetitionEvent) -> Result<(), SinkError>;
}

/// Collects events in memory.
impl ResultSink for Vec<RepetitionEvent> {
    fn name(&self) -> &str {
        "memory"
    }

    fn deliver(&mut self, event: &RepetitionEvent) -> Result<(), SinkError> {
        self.push(*event);
        Ok(())
    }
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn deliver(&mut self, event: &RepetitionEvent) -> Result<(), SinkError> {
        (**self).deliver(event)
    }
}
