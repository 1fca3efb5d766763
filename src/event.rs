use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use derive_more::Display;

/// Reason a change notification was fired.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Event {
    /// A record was put into an empty slot. `old` is `None`.
    Insert,
    /// A record replaced an equal-ordered one. `old` is the replaced record.
    Update,
    /// A record was deleted. `new` is `None`.
    Remove,
    /// A record was dropped by an expiry sweep. `new` is `None`.
    Expiry,
}

/// Callback receiving `(event, old, new)`.
pub type Handler<R> = Box<dyn Fn(Event, Option<&Arc<R>>, Option<&Arc<R>>) + Send + Sync>;

/// Subscribers per [`Event`], kept in registration order.
pub struct EventRegistry<R> {
    handlers: HashMap<Event, Vec<Handler<R>>>,
}

impl<R> Default for EventRegistry<R> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<R> fmt::Debug for EventRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self
            .handlers
            .iter()
            .map(|(event, handlers)| (*event, handlers.len()))
            .collect::<HashMap<_, _>>();
        f.debug_struct("EventRegistry")
            .field("handlers", &counts)
            .finish()
    }
}

impl<R> EventRegistry<R> {
    pub fn on<F>(&mut self, event: Event, handler: F)
    where
        F: Fn(Event, Option<&Arc<R>>, Option<&Arc<R>>) + Send + Sync + 'static,
    {
        self.handlers
            .entry(event)
            .or_default()
            .push(Box::new(handler));
    }

    /// Invokes every handler of `event` on the calling thread.
    pub fn dispatch(&self, event: Event, old: Option<&Arc<R>>, new: Option<&Arc<R>>) {
        if let Some(handlers) = self.handlers.get(&event) {
            for handler in handlers {
                handler(event, old, new);
            }
        }
    }

    pub fn handler_count(&self, event: Event) -> usize {
        self.handlers.get(&event).map_or(0, Vec::len)
    }
}
