//! Progress-callback trait for the phases of one analysis call.
//!
//! Inject an [`Arc<dyn AnalysisProgress>`] via
//! [`crate::config::AnalysisConfigBuilder::progress`] to observe the
//! pipeline while it runs. An analysis spends most of its wall-clock time
//! waiting — on the upload, on server-side file processing (up to a
//! minute of polling), and on the inference call — so hosts usually want
//! something on screen during those stretches.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a WebSocket, or a terminal spinner
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` so one hook can serve concurrent analyses.
//!
//! # Example
//!
//! ```rust
//! use paper2script::{AnalysisConfig, AnalysisProgress};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PollCounter {
//!     polls: Arc<AtomicUsize>,
//! }
//!
//! impl AnalysisProgress for PollCounter {
//!     fn on_poll(&self, attempt: u32, max_attempts: u32) {
//!         self.polls.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("waiting for file processing ({attempt}/{max_attempts})");
//!     }
//! }
//!
//! let counter = Arc::new(PollCounter {
//!     polls: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = AnalysisConfig::builder()
//!     .progress(counter as Arc<dyn AnalysisProgress>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as an analysis moves through its phases.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. A single analysis calls the hooks in order:
/// `on_upload_start`, zero or more `on_poll`, `on_file_ready`,
/// `on_inference_start`, `on_script_ready`. A failing analysis stops
/// partway through the sequence.
pub trait AnalysisProgress: Send + Sync {
    /// Called just before the multipart upload is sent.
    ///
    /// # Arguments
    /// * `bytes` — size of the PDF being uploaded
    fn on_upload_start(&self, bytes: u64) {
        let _ = bytes;
    }

    /// Called once per status poll while the server processes the file.
    ///
    /// # Arguments
    /// * `attempt`      — 1-indexed poll attempt
    /// * `max_attempts` — the configured attempt ceiling
    fn on_poll(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called when the uploaded file is ready for inference.
    ///
    /// Fires immediately after the upload when the server skips the
    /// processing stage, otherwise after the successful poll.
    fn on_file_ready(&self) {}

    /// Called just before the inference request is sent.
    fn on_inference_start(&self) {}

    /// Called when a script has been decoded successfully.
    ///
    /// # Arguments
    /// * `line_count` — dialogue lines in the decoded script
    fn on_script_ready(&self, line_count: usize) {
        let _ = line_count;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no hook is configured.
pub struct NoopProgress;

impl AnalysisProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressHook = Arc<dyn AnalysisProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingHook {
        uploads: Arc<AtomicUsize>,
        polls: Arc<AtomicUsize>,
        ready: Arc<AtomicUsize>,
        inferences: Arc<AtomicUsize>,
        line_count: Arc<AtomicUsize>,
    }

    impl AnalysisProgress for TrackingHook {
        fn on_upload_start(&self, _bytes: u64) {
            self.uploads.fetch_add(1, Ordering::SeqCst);
        }

        fn on_poll(&self, _attempt: u32, _max_attempts: u32) {
            self.polls.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_ready(&self) {
            self.ready.fetch_add(1, Ordering::SeqCst);
        }

        fn on_inference_start(&self) {
            self.inferences.fetch_add(1, Ordering::SeqCst);
        }

        fn on_script_ready(&self, line_count: usize) {
            self.line_count.store(line_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_hook_does_not_panic() {
        let hook = NoopProgress;
        hook.on_upload_start(1024);
        hook.on_poll(1, 30);
        hook.on_file_ready();
        hook.on_inference_start();
        hook.on_script_ready(18);
    }

    #[test]
    fn tracking_hook_receives_the_phase_sequence() {
        let tracker = TrackingHook {
            uploads: Arc::new(AtomicUsize::new(0)),
            polls: Arc::new(AtomicUsize::new(0)),
            ready: Arc::new(AtomicUsize::new(0)),
            inferences: Arc::new(AtomicUsize::new(0)),
            line_count: Arc::new(AtomicUsize::new(0)),
        };

        tracker.on_upload_start(2048);
        tracker.on_poll(1, 30);
        tracker.on_poll(2, 30);
        tracker.on_file_ready();
        tracker.on_inference_start();
        tracker.on_script_ready(21);

        assert_eq!(tracker.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.polls.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.ready.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.inferences.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.line_count.load(Ordering::SeqCst), 21);
    }

    #[test]
    fn arc_dyn_hook_works() {
        let hook: Arc<dyn AnalysisProgress> = Arc::new(NoopProgress);
        hook.on_upload_start(10);
        hook.on_poll(1, 30);
        hook.on_script_ready(3);
    }
}
