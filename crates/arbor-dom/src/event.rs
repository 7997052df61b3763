//! Change notification protocol.
//!
//! Every real structural mutation fires a pre event before the write and a
//! post event after it, with exact before/after payloads. Events are only
//! suppressed inside [`crate::Ast::with_events_disabled`] scopes (lazy
//! materialization uses one internally).

use crate::node::NodeId;
use crate::props::{SimpleProperty, SimpleValue, StructuralProperty};

/// One notification from an owning tree.
#[derive(Clone, Debug)]
pub enum AstEvent {
    PreAddChild {
        parent: NodeId,
        child: NodeId,
        property: StructuralProperty,
    },
    PostAddChild {
        parent: NodeId,
        child: NodeId,
        property: StructuralProperty,
    },
    PreRemoveChild {
        parent: NodeId,
        child: NodeId,
        property: StructuralProperty,
    },
    PostRemoveChild {
        parent: NodeId,
        child: NodeId,
        property: StructuralProperty,
    },
    PreReplaceChild {
        parent: NodeId,
        old_child: NodeId,
        new_child: NodeId,
        property: StructuralProperty,
    },
    PostReplaceChild {
        parent: NodeId,
        old_child: NodeId,
        new_child: NodeId,
        property: StructuralProperty,
    },
    PreValueChange {
        node: NodeId,
        property: SimpleProperty,
    },
    PostValueChange {
        node: NodeId,
        property: SimpleProperty,
        old: SimpleValue,
        new: SimpleValue,
    },
    PreClone {
        source: NodeId,
    },
    PostClone {
        source: NodeId,
        clone: NodeId,
    },
}

/// Observer of one owning tree, e.g. an edit recorder reconstructing a
/// minimal diff.
///
/// Callbacks run while the tree's lock and reentrancy guard are held: a sink
/// must not call back into any mutating or lazily-materializing operation of
/// the same tree, or it will deadlock.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &AstEvent);
}

/// Sink that records every event; handy for tests and diff baselines.
///
/// Clones share the same backing log, so a caller can keep one handle after
/// handing the other to the tree.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: std::sync::Arc<std::sync::Mutex<Vec<AstEvent>>>,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink::default()
    }

    pub fn events(&self) -> Vec<AstEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: &AstEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
