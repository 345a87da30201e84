//! Observer registry for model-to-view notification.
//!
//! Listeners run synchronously in registration order. Models queue events
//! while they mutate and call [`Notifier::flush`] as the last step of the
//! public method, so a listener never observes a half-applied change.

use std::collections::VecDeque;

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

pub struct Notifier<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    pending: VecDeque<E>,
    next_id: u64,
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            pending: VecDeque::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Queue an event for the next flush.
    pub fn push(&mut self, event: E) {
        self.pending.push_back(event);
    }

    /// Deliver queued events, oldest first, to every listener.
    pub fn flush(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&event);
            }
        }
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n: Notifier<u32> = Notifier::new();
        let a = Rc::clone(&log);
        n.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&log);
        n.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        n.push(1);
        n.push(2);
        assert!(log.borrow().is_empty(), "nothing fires before flush");
        n.flush();
        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(RefCell::new(0));
        let mut n: Notifier<()> = Notifier::new();
        let h = Rc::clone(&hits);
        let id = n.subscribe(move |_| *h.borrow_mut() += 1);
        n.push(());
        n.flush();
        assert!(n.unsubscribe(id));
        assert!(!n.unsubscribe(id));
        n.push(());
        n.flush();
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(n.listener_count(), 0);
    }
}
