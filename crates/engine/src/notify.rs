use snapgrid_core::TableId;

use crate::focus::FocusSet;

/// What changed. Listeners receive events synchronously, in subscription
/// order, on the same thread that performed the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A table's record collection was replaced (optimistic apply or an
    /// authoritative set from persistence).
    RecordsReplaced { table: TableId },
    /// The active view's config changed or a different view became active.
    ViewChanged,
    /// One of the focus sets changed.
    FocusChanged { set: FocusSet },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Explicit change notification for the rendering layer: subscribers are
/// registered and removed by id instead of relying on implicit re-render
/// triggers.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unknown ids are ignored; double-unsubscribe is harmless.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }

    pub fn emit(&mut self, event: &ChangeEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}
