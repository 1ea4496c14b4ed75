use std::fmt;
use std::sync::Arc;

use super::types::DataItem;

/// Kind of mutation reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Items appended at the end
    Append,
    /// Items inserted before an existing index
    Insert,
    /// Items overwritten in place
    Set,
    /// Items removed
    Remove,
    /// Extra info of an item replaced
    ExtraInfo,
    /// Items reordered
    Sort,
    /// All items removed
    Clear,
    /// Mode, continuous range, default value, peak root or unit changed
    Settings,
}

/// Notification describing one section mutation
#[derive(Debug, Clone, PartialEq)]
pub struct DataChangeEvent {
    /// Name of the mutated section
    pub section: String,
    /// What happened
    pub kind: ChangeKind,
    /// Affected item indices (empty for whole-section changes)
    pub indices: Vec<usize>,
    /// Affected items as stored (removed items for `Remove`)
    pub items: Vec<DataItem>,
}

/// Receives data change notifications from a section.
///
/// Any `Fn(&DataChangeEvent) + Send + Sync` closure is an observer.
pub trait DataObserver: Send + Sync {
    /// Called after every successful mutation
    fn data_changed(&self, event: &DataChangeEvent);
}

impl<F> DataObserver for F
where
    F: Fn(&DataChangeEvent) + Send + Sync,
{
    fn data_changed(&self, event: &DataChangeEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Subscribed observers of one section. Clones start without subscribers.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Arc<dyn DataObserver>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Arc<dyn DataObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        before != self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Build the event only when someone listens
    pub(crate) fn notify_with<F>(&self, build: F)
    where
        F: FnOnce() -> DataChangeEvent,
    {
        if self.entries.is_empty() {
            return;
        }
        let event = build();
        for (_, observer) in &self.entries {
            observer.data_changed(&event);
        }
    }
}

impl Clone for Observers {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
