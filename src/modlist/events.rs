use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Change notifications published by [`ModList`](super::ModList)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModListEvent {
    Added { name: String },
    Removed { name: String },
    /// Orders changed: a move, a renumber after delete, or a refresh
    Reordered,
    Relocked { locked: bool },
    /// Hidden or installed state of one mod changed
    Updated { name: String },
}

/// Fan-out channel for [`ModListEvent`]s
pub struct EventBus {
    sender: broadcast::Sender<ModListEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModListEvent> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers. Having none is fine.
    pub fn publish(&self, event: ModListEvent) {
        tracing::trace!(?event, "Publishing mod list event");
        let _ = self.sender.send(event);
    }
}
