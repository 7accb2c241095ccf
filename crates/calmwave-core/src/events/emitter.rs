//! Ordered progress channel with terminal-event guarantees.
//!
//! [`ProgressEmitter`] is the producing half. It can be cloned into
//! concurrent synthesis tasks; all clones share one ordering state:
//!
//! - progress percentages never decrease
//! - at most one `Script` event is sent
//! - nothing is sent after `Complete` or `Error`
//! - if the last clone is dropped before a terminal event, an `Error` is sent
//!
//! Sends never block. A disconnected consumer is not an error for the producer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{INTERRUPTED_MESSAGE, ProgressEvent, ProgressStep};
use crate::domain::{Meditation, Script, ScriptReady};

/// Create a connected emitter/receiver pair.
pub fn progress_channel() -> (ProgressEmitter, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let emitter = ProgressEmitter {
        shared: Arc::new(Shared {
            tx,
            state: Mutex::new(EmitterState::default()),
        }),
    };
    (emitter, ProgressReceiver { rx })
}

#[derive(Debug, Default)]
struct EmitterState {
    last_progress: u8,
    script_sent: bool,
    closed: bool,
}

#[derive(Debug)]
struct Shared {
    tx: mpsc::UnboundedSender<ProgressEvent>,
    state: Mutex<EmitterState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EmitterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            debug!("Progress consumer disconnected; dropping event");
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !state.closed {
            state.closed = true;
            warn!("Progress stream dropped without a terminal event");
            let _ = self.tx.send(ProgressEvent::Error {
                message: INTERRUPTED_MESSAGE.to_string(),
            });
        }
    }
}

/// Producing half of the progress channel.
#[derive(Debug, Clone)]
pub struct ProgressEmitter {
    shared: Arc<Shared>,
}

impl ProgressEmitter {
    /// Report a stage checkpoint. Lower percentages are raised to the last sent value.
    pub fn progress(&self, step: ProgressStep, percent: u8) {
        let mut state = self.shared.lock();
        if state.closed {
            return;
        }
        let progress = percent.min(100).max(state.last_progress);
        state.last_progress = progress;
        self.shared.send(ProgressEvent::Progress { step, progress });
    }

    /// Report that `step` has started, at its fixed checkpoint.
    pub fn step(&self, step: ProgressStep) {
        self.progress(step, step.checkpoint());
    }

    /// Send the validated script. Returns false if one was already sent.
    pub fn script_ready(&self, script: &Script) -> bool {
        let mut state = self.shared.lock();
        if state.closed || state.script_sent {
            return false;
        }
        state.script_sent = true;
        self.shared.send(ProgressEvent::Script {
            meditation: ScriptReady::new(script.clone()),
        });
        true
    }

    /// Close the stream with the stored record.
    pub fn complete(&self, meditation: Meditation) -> bool {
        self.finish(ProgressEvent::Complete {
            meditation: Box::new(meditation),
        })
    }

    /// Close the stream with a user-facing failure message.
    pub fn fail(&self, message: impl Into<String>) -> bool {
        self.finish(ProgressEvent::Error {
            message: message.into(),
        })
    }

    /// Whether a terminal event has been sent.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    fn finish(&self, event: ProgressEvent) -> bool {
        let mut state = self.shared.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        self.shared.send(event);
        true
    }
}

/// Consuming half of the progress channel.
///
/// The stream ends after every emitter clone has been dropped.
#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl ProgressReceiver {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }

    /// Drain every event until the stream ends.
    pub async fn collect(mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }

    /// Hand out the underlying channel, e.g. to wrap it in a stream.
    pub fn into_inner(self) -> mpsc::UnboundedReceiver<ProgressEvent> {
        self.rx
    }
}
