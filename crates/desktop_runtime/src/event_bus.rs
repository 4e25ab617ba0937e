//! Synchronous publish/subscribe hub used by every shell component.
//!
//! Handlers run on the publisher's stack, in subscription order. `publish` snapshots the
//! subscriber list first, so a handler may subscribe, unsubscribe, or publish again while it runs.
//! Handlers that trigger further transitions must leave shared state consistent before they
//! publish. The bus never catches or contains handler failures.

use std::{
    cell::RefCell,
    collections::HashMap,
    hash::Hash,
    rc::{Rc, Weak},
};

/// An event that can travel over an [`EventBus`].
pub trait BusEvent {
    /// Routing key for the event.
    type Topic: Copy + Eq + Hash + std::fmt::Debug;

    /// Returns the routing key of this event.
    fn topic(&self) -> Self::Topic;
}

/// Identifies one subscription on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Rc<dyn Fn(&E)>;

struct Subscriber<E> {
    id: SubscriptionId,
    once: bool,
    handler: Handler<E>,
}

struct BusInner<E: BusEvent> {
    next_id: u64,
    topics: HashMap<E::Topic, Vec<Subscriber<E>>>,
}

impl<E: BusEvent> BusInner<E> {
    fn remove(&mut self, topic: E::Topic, id: SubscriptionId) -> bool {
        let Some(subscribers) = self.topics.get_mut(&topic) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            self.topics.remove(&topic);
        }
        removed
    }
}

/// Cheaply cloneable handle to a shared publish/subscribe hub.
pub struct EventBus<E: BusEvent> {
    inner: Rc<RefCell<BusInner<E>>>,
}

impl<E: BusEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 0,
                topics: HashMap::new(),
            })),
        }
    }
}

impl<E: BusEvent + 'static> EventBus<E> {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, topic: E::Topic, once: bool, handler: Handler<E>) -> Subscription<E> {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.topics.entry(topic).or_default().push(Subscriber {
            id,
            once,
            handler,
        });
        Subscription {
            bus: Rc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    /// Registers `handler` for every event on `topic`.
    pub fn subscribe(&self, topic: E::Topic, handler: impl Fn(&E) + 'static) -> Subscription<E> {
        self.register(topic, false, Rc::new(handler))
    }

    /// Registers `handler` for the next event on `topic` only.
    pub fn once(&self, topic: E::Topic, handler: impl Fn(&E) + 'static) -> Subscription<E> {
        self.register(topic, true, Rc::new(handler))
    }

    /// Removes a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, topic: E::Topic, id: SubscriptionId) {
        self.inner.borrow_mut().remove(topic, id);
    }

    /// Delivers `event` to every current subscriber of its topic.
    pub fn publish(&self, event: E) {
        let topic = event.topic();
        let snapshot: Vec<(SubscriptionId, bool, Handler<E>)> = {
            let inner = self.inner.borrow();
            match inner.topics.get(&topic) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|s| (s.id, s.once, Rc::clone(&s.handler)))
                    .collect(),
                None => return,
            }
        };

        for (id, once, handler) in snapshot {
            if once && !self.inner.borrow_mut().remove(topic, id) {
                continue;
            }
            handler(&event);
        }
    }

    /// Returns how many handlers listen on `topic`.
    pub fn subscriber_count(&self, topic: E::Topic) -> usize {
        self.inner
            .borrow()
            .topics
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Handle returned by [`EventBus::subscribe`] and [`EventBus::once`].
///
/// Dropping the handle keeps the subscription alive; call [`Subscription::unsubscribe`] to
/// remove it.
pub struct Subscription<E: BusEvent> {
    bus: Weak<RefCell<BusInner<E>>>,
    topic: E::Topic,
    id: SubscriptionId,
}

impl<E: BusEvent> Subscription<E> {
    /// Returns the subscription id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the handler from the bus. No-op when the bus or the handler is already gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.borrow_mut().remove(self.topic, self.id);
        }
    }
}
