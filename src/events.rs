//! Completion events posted back onto the GUI event loop
//!
//! Worker threads never touch window state. They send a [`LauncherEvent`]
//! through an [`EventSink`] and wake the loop; the main window drains the
//! channel at the start of every frame.

use crate::utils::command::LaunchRequest;
use crate::utils::error::LauncherError;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::debug;

/// Something finished in the background
#[derive(Debug)]
pub enum LauncherEvent {
    /// A launched program exited. `code` is `None` when it was killed by a
    /// signal or could not be waited on.
    Exited {
        request: LaunchRequest,
        code: Option<i32>,
    },
    /// Changelog body fully received
    Downloaded(Vec<u8>),
    /// Changelog request failed at the transport or HTTP level
    DownloadFailed(LauncherError),
}

/// Cloneable sending half handed to worker threads
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<LauncherEvent>,
    repaint: Option<egui::Context>,
}

impl EventSink {
    /// Post an event and wake the event loop if one is attached.
    pub fn post(&self, event: LauncherEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event dropped, main window already gone");
            return;
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

/// Create a connected sink/receiver pair. `repaint` is the context of the
/// window that owns the receiver; tests pass `None`.
pub fn event_channel(repaint: Option<egui::Context>) -> (EventSink, Receiver<LauncherEvent>) {
    let (tx, rx) = channel();
    (EventSink { tx, repaint }, rx)
}
