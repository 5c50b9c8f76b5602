// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed publish/subscribe channel used for all change notification.

use std::fmt;

/// Handle returned by [`Emitter::listen`], used to unregister the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A boxed listener callback
pub type Listener<T> = Box<dyn FnMut(&T) + Send + 'static>;

/// Registry of callbacks notified with a payload of type `T`.
///
/// Every call to [`listen`](Self::listen) registers exactly one callback under
/// a fresh [`ListenerId`]; the callback stays registered until that id is
/// passed to [`remove`](Self::remove).
pub struct Emitter<T> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T> Emitter<T> {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback
    pub fn listen(&mut self, callback: impl FnMut(&T) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Unregister a callback. Returns `false` if the id is not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Call every listener, in registration order
    pub fn emit(&mut self, payload: &T) {
        tracing::trace!(listeners = self.listeners.len(), "emit");
        for (_, listener) in &mut self.listeners {
            listener(payload);
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
