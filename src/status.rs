//! Single-subscriber status-change channel.
//!
//! Each controller owns one [`StatusChannel`].  Exactly one listener is
//! active at a time, defaulting to a no-op.  Registering a new listener
//! replaces the previous one; nothing is queued, replayed, or fanned out.
//! Notifications run synchronously on the caller's thread, after the
//! controller has applied its state change and issued the hardware write.

use log::error;

/// Boxed status listener.  Receives a reference to the new state.
pub type Listener<S> = Box<dyn FnMut(&S)>;

pub struct StatusChannel<S> {
    listener: Listener<S>,
    /// Owner name used in log lines.
    owner: &'static str,
}

impl<S> StatusChannel<S> {
    pub fn new(owner: &'static str) -> Self {
        Self {
            listener: Box::new(|_| {}),
            owner,
        }
    }

    /// Replace the active listener.
    ///
    /// `None` models a caller handing over something that is not a
    /// listener: it is logged and the current listener stays in place.
    pub fn set(&mut self, listener: Option<Listener<S>>) {
        match listener {
            Some(l) => self.listener = l,
            None => error!("[{}] on-status-change listener is not callable, keeping previous", self.owner),
        }
    }

    /// Invoke the active listener with the new state.
    pub fn notify(&mut self, state: &S) {
        (self.listener)(state);
    }

    /// Back to the no-op listener.
    pub fn reset(&mut self) {
        self.listener = Box::new(|_| {});
    }
}
