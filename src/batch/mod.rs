pub mod coordinator;
pub mod events;

pub use coordinator::{BatchCoordinator, BatchOutcome, BatchRequest, BatchState, PlannedReport};
pub use events::{BatchEvent, EventSink, FnSink, NeverStop, NullSink, ProgressSample, StopSignal};
