use super::types::{BuilderEvent, EventType, Severity};
use anyhow::Result;
use tokio::sync::broadcast;
use tracing::trace;

use crate::constants::EVENT_BUS_CAPACITY;

/// Subscriber handle with an optional filter.
pub struct EventSubscriber {
    receiver: broadcast::Receiver<BuilderEvent>,
    filter: Option<EventFilter>,
}

impl EventSubscriber {
    pub fn new(receiver: broadcast::Receiver<BuilderEvent>, filter: Option<EventFilter>) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event matching the filter.
    pub async fn recv(&mut self) -> Result<BuilderEvent> {
        loop {
            let event = self.receiver.recv().await?;
            match &self.filter {
                Some(filter) if !filter.matches(&event) => continue,
                _ => return Ok(event),
            }
        }
    }

    /// Try to receive without blocking.
    pub fn try_recv(&mut self) -> Result<Option<BuilderEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => match &self.filter {
                    Some(filter) if !filter.matches(&event) => continue,
                    _ => return Ok(Some(event)),
                },
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Event filter for selective subscription.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    event_types: Option<Vec<EventType>>,
    min_severity: Option<Severity>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    pub fn matches(&self, event: &BuilderEvent) -> bool {
        if let Some(ref types) = self.event_types
            && !types.contains(&event.event_type)
        {
            return false;
        }

        if let Some(min_severity) = self.min_severity
            && event.severity() < min_severity
        {
            return false;
        }

        true
    }
}

/// Broadcast bus for builder mutation outcomes. The view layer subscribes to
/// surface toasts; nothing in the core waits on delivery.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<BuilderEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    pub fn subscribe_filtered(&self, filter: EventFilter) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(filter))
    }

    /// Publish an event. Send errors mean no subscriber is listening, which
    /// is not a fault: the core runs the same with or without an observer.
    pub fn publish(&self, event: BuilderEvent) {
        trace!(
            "Publishing {} ({:?})",
            event.event_type.as_str(),
            event.severity()
        );
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_BUS_CAPACITY)
    }
}
