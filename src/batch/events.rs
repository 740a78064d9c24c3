//! Messages flowing from the batch worker to whoever is watching it.
//!
//! The coordinator may run on a different thread than its observer, so it
//! never calls into observer state directly. It pushes [`BatchEvent`]s into
//! an [`EventSink`] and polls a [`StopSignal`] between files.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Timing snapshot taken after each completed file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSample {
    /// 1-based position of the file just finished.
    pub index: usize,
    pub total: usize,
    pub file_name: String,
    pub file_elapsed: Duration,
    pub total_elapsed: Duration,
    pub avg_per_file: Duration,
    pub eta: Duration,
}

impl ProgressSample {
    pub fn new(
        index: usize,
        total: usize,
        file_name: String,
        file_elapsed: Duration,
        total_elapsed: Duration,
    ) -> Self {
        let avg_per_file = if index == 0 {
            Duration::ZERO
        } else {
            total_elapsed.div_f64(index as f64)
        };
        let remaining = total.saturating_sub(index);
        let eta = Duration::from_secs_f64(avg_per_file.as_secs_f64() * remaining as f64);

        Self {
            index,
            total,
            file_name,
            file_elapsed,
            total_elapsed,
            avg_per_file,
            eta,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.index as f64 / self.total as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Log(String),
    Progress(ProgressSample),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: BatchEvent);
}

impl EventSink for UnboundedSender<BatchEvent> {
    fn emit(&self, event: BatchEvent) {
        // A closed receiver means nobody is watching; the batch carries on.
        let _ = self.send(event);
    }
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: BatchEvent) {}
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: Fn(BatchEvent) + Send + Sync,
{
    fn emit(&self, event: BatchEvent) {
        (self.0)(event)
    }
}

/// Polled once at each file boundary. Never interrupts a file in progress.
pub trait StopSignal: Send + Sync {
    fn should_stop(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<T: StopSignal + ?Sized> StopSignal for std::sync::Arc<T> {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

pub struct NeverStop;

impl StopSignal for NeverStop {
    fn should_stop(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_progress_sample_timing() {
        let sample = ProgressSample::new(
            2,
            5,
            "000002.xls".to_string(),
            Duration::from_secs(3),
            Duration::from_secs(10),
        );

        assert_eq!(sample.avg_per_file, Duration::from_secs(5));
        assert_eq!(sample.eta, Duration::from_secs(15));
        assert!((sample.percentage() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_for_large_batches() {
        let index = u32::MAX as usize + 2;
        let sample = ProgressSample::new(
            index,
            index,
            "999999.xls".to_string(),
            Duration::from_millis(1),
            Duration::from_secs(index as u64),
        );

        assert_eq!(sample.avg_per_file, Duration::from_secs(1));
    }

    #[test]
    fn test_last_file_has_no_eta() {
        let sample = ProgressSample::new(
            4,
            4,
            "000004.xls".to_string(),
            Duration::from_secs(1),
            Duration::from_secs(8),
        );

        assert_eq!(sample.eta, Duration::ZERO);
        assert!((sample.percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (tx, mut rx) = unbounded_channel();
        tx.emit(BatchEvent::Log("Reading: 1.xls".to_string()));
        tx.emit(BatchEvent::Log("Exporting: 1.xlsx".to_string()));

        assert_eq!(
            rx.try_recv().unwrap(),
            BatchEvent::Log("Reading: 1.xls".to_string())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            BatchEvent::Log("Exporting: 1.xlsx".to_string())
        );
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = unbounded_channel::<BatchEvent>();
        drop(rx);
        tx.emit(BatchEvent::Log("nobody listening".to_string()));
    }

    #[test]
    fn test_fn_sink_forwards_events() {
        let seen = std::sync::Mutex::new(Vec::new());
        let sink = FnSink(|event: BatchEvent| seen.lock().unwrap().push(event));
        sink.emit(BatchEvent::Log("Finished".to_string()));
        drop(sink);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec![BatchEvent::Log("Finished".to_string())]
        );
    }

    #[test]
    fn test_stop_signals() {
        let flag = Arc::new(AtomicBool::new(false));
        assert!(!flag.should_stop());
        flag.store(true, Ordering::SeqCst);
        assert!(flag.should_stop());
        assert!(!NeverStop.should_stop());
    }
}
