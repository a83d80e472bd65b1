use std::ops::ControlFlow;

use crate::coordinator::{SwitchConfirmation, SwitchCoordinator};
use crate::event::{UiEvent, UiReceiver};

/// Called on every refresh; re-query through the coordinator
pub type RefreshSubscriber = Box<dyn FnMut(&SwitchCoordinator) + Send>;

pub type ConfirmationSubscriber = Box<dyn FnMut(&SwitchConfirmation) + Send>;

/// Serial consumer of the UI queue. Owns the coordinator, so every history
/// mutation happens here.
pub struct UiDispatcher {
    coordinator: SwitchCoordinator,
    refresh_subscribers: Vec<RefreshSubscriber>,
    confirmation_subscribers: Vec<ConfirmationSubscriber>,
    show_confirmations: bool,
}

impl UiDispatcher {
    pub fn new(coordinator: SwitchCoordinator) -> Self {
        Self {
            coordinator,
            refresh_subscribers: Vec::new(),
            confirmation_subscribers: Vec::new(),
            show_confirmations: true,
        }
    }

    pub fn with_confirmations(mut self, enabled: bool) -> Self {
        self.show_confirmations = enabled;
        self
    }

    pub fn coordinator(&self) -> &SwitchCoordinator {
        &self.coordinator
    }

    /// Register for the payload-free "devices changed" refresh
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&SwitchCoordinator) + Send + 'static,
    {
        self.refresh_subscribers.push(Box::new(subscriber));
    }

    pub fn on_switch<F>(&mut self, subscriber: F)
    where
        F: FnMut(&SwitchConfirmation) + Send + 'static,
    {
        self.confirmation_subscribers.push(Box::new(subscriber));
    }

    pub fn handle(&mut self, event: UiEvent) -> ControlFlow<()> {
        match event {
            UiEvent::DevicesChanged => {
                self.coordinator.sync_with_system();
                self.refresh();
            }
            UiEvent::HotKey(action) => {
                let confirmation = self.coordinator.handle_action(action);
                self.after_switch(confirmation);
            }
            UiEvent::Switch { direction, id } => {
                let confirmation = self.coordinator.switch(direction, id);
                self.after_switch(confirmation);
            }
            UiEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    pub fn refresh(&mut self) {
        for subscriber in self.refresh_subscribers.iter_mut() {
            subscriber(&self.coordinator);
        }
    }

    /// Drain the queue until `Shutdown` or every sender is gone
    pub async fn run(mut self, mut receiver: UiReceiver) {
        tracing::debug!("UI dispatcher started");
        while let Some(event) = receiver.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }
        tracing::debug!("UI dispatcher stopped");
    }

    fn after_switch(&mut self, confirmation: Option<SwitchConfirmation>) {
        let Some(confirmation) = confirmation else {
            return;
        };

        if self.show_confirmations {
            for subscriber in self.confirmation_subscribers.iter_mut() {
                subscriber(&confirmation);
            }
        }
        self.refresh();
    }
}
