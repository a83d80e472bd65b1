//! Hand-off from OS-owned callback contexts to the UI-owned thread
//!
//! Hardware and hotkey callbacks run on threads the application does not
//! own. They may only call [`UiSender::post`]; everything that touches
//! switch history or device listings happens on the receiving side.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::device::{DeviceId, Direction};
use crate::hotkey::HotKeyAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Device list or a default device changed; consumers re-query
    DevicesChanged,
    HotKey(HotKeyAction),
    Switch { direction: Direction, id: DeviceId },
    Shutdown,
}

/// Cloneable, non-blocking producer side of the UI queue
#[derive(Debug, Clone)]
pub struct UiSender {
    tx: UnboundedSender<UiEvent>,
}

impl UiSender {
    /// Post an event to the UI thread. Never blocks; events posted after the
    /// UI side has gone away are dropped.
    pub fn post(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(?event, "UI queue closed, event dropped");
        }
    }
}

/// Consumer side of the UI queue, owned by the UI thread
#[derive(Debug)]
pub struct UiReceiver {
    rx: UnboundedReceiver<UiEvent>,
}

impl UiReceiver {
    pub async fn recv(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }

    /// Non-blocking poll, `None` when the queue is currently empty or closed
    pub fn try_recv(&mut self) -> Option<UiEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

pub fn ui_channel() -> (UiSender, UiReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiSender { tx }, UiReceiver { rx })
}
