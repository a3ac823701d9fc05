//! Observable value store for the Scribe documentation engine.
//!
//! Provides [`Store`], a container for a single shared state value with
//! synchronous change notification. The UI layer binds to the store and
//! re-derives navigation and document views whenever the state changes.
//!
//! # Semantics
//!
//! - Writes replace the whole value or apply an updater to the current one.
//! - A write whose result is structurally equal (`PartialEq`) to the current
//!   value is discarded without notifying anyone. This is what keeps a
//!   redundant upstream push from cascading into downstream recomputation.
//! - Subscribers are notified synchronously, in attachment order, exactly
//!   once per committed value.
//! - Writes issued from inside a notification callback are queued and applied
//!   after the in-flight notification completes, so every subscriber observes
//!   the same total order of committed values.
//!
//! # Thread Safety
//!
//! `Store` is a cheaply cloneable handle (`Arc` inner) and is `Send + Sync`
//! when the state type allows it. The intended model is still single-threaded
//! event-driven use: notification fan-out happens on the writing thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A queued write operation.
enum WriteOp<T> {
    Replace(T),
    Update(Box<dyn FnOnce(&T) -> T + Send>),
}

struct SubscriberEntry<T> {
    id: u64,
    callback: Callback<T>,
}

struct StoreInner<T> {
    value: Mutex<T>,
    /// Active subscribers in attachment order.
    subscribers: Mutex<Vec<SubscriberEntry<T>>>,
    /// Writes waiting to be applied.
    pending: Mutex<VecDeque<WriteOp<T>>>,
    /// Held by whichever call is currently applying writes. A write issued
    /// from inside a notification callback finds this taken, leaves its
    /// operation queued and returns; the holder drains it afterwards.
    drain: Mutex<()>,
    next_subscriber_id: AtomicU64,
}

/// Shared observable state container.
///
/// Cloning the store clones the handle, not the state; all clones observe
/// and mutate the same value.
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<T> Store<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                value: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
                pending: Mutex::new(VecDeque::new()),
                drain: Mutex::new(()),
                next_subscriber_id: AtomicU64::new(0),
            }),
        }
    }

    /// Return a clone of the current value.
    ///
    /// Reflects the latest committed write at call time.
    ///
    /// # Panics
    ///
    /// Panics if a subscriber callback previously panicked while the value
    /// lock was held (poisoned lock).
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.lock().unwrap().clone()
    }

    /// Replace the current value.
    ///
    /// The write is skipped (no notification) when `next` equals the
    /// current value.
    pub fn set(&self, next: T) {
        self.enqueue(WriteOp::Replace(next));
    }

    /// Replace the current value by applying `f` to it.
    ///
    /// The updater runs when the write is applied, which for a write issued
    /// inside a notification callback is after that notification completes.
    /// The write is skipped (no notification) when the updater returns a
    /// value equal to the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        self.enqueue(WriteOp::Update(Box::new(f)));
    }

    /// Attach a subscriber called with each committed value.
    ///
    /// The subscriber does not receive the current value; see [`Self::bind`]
    /// for mount-style attachment. Dropping the returned [`Subscription`]
    /// detaches the subscriber.
    pub fn subscribe<F>(&self, f: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.attach(Arc::new(f))
    }

    /// Attach a subscriber and deliver the current value to it immediately.
    ///
    /// This is the scoped-acquisition pattern a rendering tree uses: the
    /// consumer sees the present state on mount and every committed value
    /// after that, until the returned [`Subscription`] is dropped.
    pub fn bind<F>(&self, f: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(f);
        callback(&self.get());
        self.attach(callback)
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().unwrap().len()
    }

    fn attach(&self, callback: Callback<T>) -> Subscription<T> {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .unwrap()
            .push(SubscriberEntry { id, callback });
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    fn enqueue(&self, op: WriteOp<T>) {
        self.inner.pending.lock().unwrap().push_back(op);
        self.drain();
    }

    /// Apply queued writes until none remain.
    ///
    /// Only one caller drains at a time. A re-entrant call (a write from
    /// inside a notification callback) fails the `try_lock` and returns;
    /// the outer drain picks the queued operation up.
    fn drain(&self) {
        loop {
            let Ok(guard) = self.inner.drain.try_lock() else {
                return;
            };
            loop {
                // Pop in its own scope: holding the pending lock across
                // apply would deadlock a subscriber that writes.
                let op = self.inner.pending.lock().unwrap().pop_front();
                let Some(op) = op else { break };
                self.apply(op);
            }
            drop(guard);
            // An operation may have been queued between the final pop and
            // releasing the drain lock by a caller whose try_lock failed.
            if self.inner.pending.lock().unwrap().is_empty() {
                return;
            }
        }
    }

    fn apply(&self, op: WriteOp<T>) {
        let committed = {
            let mut current = self.inner.value.lock().unwrap();
            let next = match op {
                WriteOp::Replace(value) => value,
                WriteOp::Update(f) => f(&current),
            };
            if next == *current {
                tracing::debug!("write produced an unchanged value; skipping notification");
                None
            } else {
                *current = next.clone();
                Some(next)
            }
        };

        if let Some(value) = committed {
            self.notify(&value);
        }
    }

    /// Deliver `value` to subscribers in attachment order.
    ///
    /// Membership is re-checked before each delivery so a subscriber
    /// detached from inside a callback receives nothing further. The
    /// subscriber lock is not held across callback invocations, so a
    /// callback may subscribe or unsubscribe freely.
    fn notify(&self, value: &T) {
        let ids: Vec<u64> = {
            let subscribers = self.inner.subscribers.lock().unwrap();
            subscribers.iter().map(|entry| entry.id).collect()
        };
        tracing::debug!(subscriber_count = ids.len(), "notifying subscribers");

        for id in ids {
            let callback = {
                let subscribers = self.inner.subscribers.lock().unwrap();
                subscribers
                    .iter()
                    .find(|entry| entry.id == id)
                    .map(|entry| Arc::clone(&entry.callback))
            };
            if let Some(callback) = callback {
                callback(value);
            }
        }
    }
}

/// Handle to an active subscription.
///
/// Detaches the subscriber when dropped. [`Self::unsubscribe`] may be called
/// explicitly any number of times, including from inside a notification
/// callback.
pub struct Subscription<T> {
    store: Weak<StoreInner<T>>,
    id: u64,
}

impl<T> Subscription<T> {
    /// Detach the subscriber. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap()
                .retain(|entry| entry.id != self.id);
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    // Store handles cross task boundaries in the server layer.
    static_assertions::assert_impl_all!(Store<i32>: Send, Sync);
    static_assertions::assert_impl_all!(Subscription<i32>: Send, Sync);

    /// Collects delivered values for assertions.
    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &T| sink.lock().unwrap().push(value.clone()))
    }

    #[test]
    fn test_get_returns_initial_value() {
        let store = Store::new(7);

        assert_eq!(store.get(), 7);
    }

    #[test]
    fn test_set_replaces_value() {
        let store = Store::new(1);

        store.set(2);

        assert_eq!(store.get(), 2);
    }

    #[test]
    fn test_update_applies_function_to_current_value() {
        let store = Store::new(10);

        store.update(|n| n + 5);

        assert_eq!(store.get(), 15);
    }

    #[test]
    fn test_subscriber_receives_committed_values_in_order() {
        let store = Store::new(0);
        let (seen, record) = recorder();
        let _sub = store.subscribe(record);

        store.set(1);
        store.set(2);
        store.set(3);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_write_is_deduplicated() {
        let store = Store::new(5);
        let (seen, record) = recorder();
        let _sub = store.subscribe(record);

        store.set(5);
        store.update(|n| *n);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(store.get(), 5);
    }

    #[test]
    fn test_repeated_write_notifies_at_most_once() {
        let store = Store::new(0);
        let (seen, record) = recorder();
        let _sub = store.subscribe(record);

        store.update(|_| 9);
        store.update(|_| 9);

        assert_eq!(*seen.lock().unwrap(), vec![9]);
    }

    #[test]
    fn test_subscribers_notified_in_attachment_order() {
        let store = Store::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = store.subscribe(move |_: &i32| first.lock().unwrap().push("a"));
        let second = Arc::clone(&order);
        let _b = store.subscribe(move |_: &i32| second.lock().unwrap().push("b"));

        store.set(1);

        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_bind_delivers_current_value_immediately() {
        let store = Store::new(42);
        let (seen, record) = recorder();

        let _sub = store.bind(record);

        assert_eq!(*seen.lock().unwrap(), vec![42]);
    }

    #[test]
    fn test_subscribe_does_not_deliver_current_value() {
        let store = Store::new(42);
        let (seen, record) = recorder::<i32>();

        let _sub = store.subscribe(record);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dropped_subscription_stops_delivery() {
        let store = Store::new(0);
        let (seen, record) = recorder();

        let sub = store.subscribe(record);
        store.set(1);
        drop(sub);
        store.set(2);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let store = Store::new(0);
        let (seen, record) = recorder();

        let sub = store.subscribe(record);
        sub.unsubscribe();
        sub.unsubscribe();
        store.set(1);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_from_within_notification() {
        let store = Store::new(0);
        let (seen, record) = recorder();
        let sub = Arc::new(Mutex::new(None::<Subscription<i32>>));

        let slot = Arc::clone(&sub);
        let sink = Arc::new(record);
        let forward = Arc::clone(&sink);
        let handle = store.subscribe(move |value: &i32| {
            forward(value);
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        *sub.lock().unwrap() = Some(handle);

        store.set(1);
        store.set(2);

        // Detached itself while handling the first value.
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_write_during_notification_is_queued() {
        let store = Store::new(0);
        let (seen, record) = recorder();
        let _observer = store.subscribe(record);

        let writer = store.clone();
        let _trigger = store.subscribe(move |value: &i32| {
            // Chase the first committed value with a follow-up write.
            if *value == 1 {
                writer.set(2);
            }
        });

        store.set(1);

        // The observer saw 1 before 2: the nested write waited for the
        // in-flight notification to finish.
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn test_chained_writes_during_notification_drain_in_order() {
        let store = Store::new(0);
        let (seen, record) = recorder();
        let _observer = store.subscribe(record);

        let writer = store.clone();
        let _chain = store.subscribe(move |value: &i32| {
            // Each committed value below 3 triggers a follow-up update.
            if *value < 3 {
                writer.update(|n| n + 1);
            }
        });

        store.set(1);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(store.get(), 3);
    }

    #[test]
    fn test_subscriber_sees_subsequence_of_distinct_values() {
        let store = Store::new(0);
        let (seen, record) = recorder();
        let _sub = store.subscribe(record);

        for value in [1, 1, 2, 2, 2, 3, 3] {
            store.set(value);
        }

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_values() {
        let store = Store::new(0);
        store.set(1);

        let (seen, record) = recorder();
        let _sub = store.subscribe(record);
        store.set(2);

        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_clone_shares_state() {
        let store = Store::new(String::from("a"));
        let other = store.clone();

        other.set(String::from("b"));

        assert_eq!(store.get(), "b");
    }

    #[test]
    fn test_concurrent_writes_keep_store_consistent() {
        use std::thread;

        let store = Store::new(0u64);
        let (seen, record) = recorder();
        let _sub = store.subscribe(record);

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || store.update(move |n| n + i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Every committed increment was observed and the sum is intact.
        assert_eq!(store.get(), (1..=8).sum::<u64>());
        assert_eq!(seen.lock().unwrap().len(), 8);
    }
}
