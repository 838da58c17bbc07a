//! Change notification: explicit subscriber lists per channel.
//!
//! A [`Channel`] holds listeners behind shared interior state so that a
//! [`Subscription`] handle can remove its listener at any time, including
//! from inside that listener's own callback. Dispatch snapshots the list
//! first: listeners added or removed while an event is being delivered do
//! not change who receives that event.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use ransomrock_logic::notify::Channel;
//!
//! let channel: Channel<u32> = Channel::new();
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! let sub = channel.subscribe(move |v: &u32| sink.set(sink.get() + *v));
//! channel.emit(&5);
//! sub.unsubscribe();
//! channel.emit(&5);
//! assert_eq!(seen.get(), 5);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::resources::ResourceKind;

/// Identifier for a registered listener, unique within its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListenerId(u64);

type Listener<E> = Rc<dyn Fn(&E)>;

struct ChannelState<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener<E>)>>,
}

impl<E> ChannelState<E> {
    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }
}

/// A publish point for one kind of event.
pub struct Channel<E> {
    state: Rc<ChannelState<E>>,
}

impl<E: 'static> Channel<E> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(ChannelState {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a listener. It stays registered until the returned handle
    /// (or a clone of it) is unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = ListenerId(self.state.next_id.get());
        self.state.next_id.set(id.0 + 1);
        self.state
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener) as Listener<E>));

        let weak: Weak<ChannelState<E>> = Rc::downgrade(&self.state);
        Subscription {
            id,
            remove: Rc::new(move |id| weak.upgrade().map_or(false, |state| state.remove(id))),
        }
    }

    /// Deliver `event` to every listener registered when the call began.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .state
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl<E: 'static> Default for Channel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("listeners", &self.state.listeners.borrow().len())
            .finish()
    }
}

/// Handle to a registered listener.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`]
/// at teardown. The handle outlives its channel safely.
#[derive(Clone)]
#[must_use = "keep the subscription to unsubscribe at teardown"]
pub struct Subscription {
    id: ListenerId,
    remove: Rc<dyn Fn(ListenerId) -> bool>,
}

impl Subscription {
    /// Remove the listener. Returns `false` if it was already removed or the
    /// channel is gone.
    pub fn unsubscribe(&self) -> bool {
        (self.remove)(self.id)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// A resource quantity changed. Carries the post-mutation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChanged {
    pub kind: ResourceKind,
    pub count: u64,
}

/// Ransom affordability flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RansomAvailabilityChanged {
    pub available: bool,
}
