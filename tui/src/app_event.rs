use crossterm::event::KeyEvent;
use tracker_core::{ReadEndpoint, ReadOutcome};

/// Events processed by the app loop. Input arrives from the terminal thread;
/// everything else is posted by background transport tasks.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,

    /// A refetch group was started by a background task (after a successful
    /// mutation); the named groups move to loading.
    RefreshStarted(&'static [ReadEndpoint]),

    /// A refetch group completed; outcomes are applied all at once.
    RefreshApplied(Vec<ReadOutcome>),

    /// A refetch group failed as a whole; prior state is retained.
    RefreshFailed {
        endpoints: &'static [ReadEndpoint],
        message: String,
    },

    /// A mutation failed before any refetch was issued.
    MutationFailed { message: String },

    /// Result of the startup connectivity probe.
    HealthChecked(bool),

    ExitRequest,
}
