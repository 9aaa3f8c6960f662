//! Subscription registry
//!
//! Observers live in a doubly linked list threaded through a slab, so
//! appending and unlinking are O(1) and a handle never has to search for its
//! node. Each node carries a shared "detached" flag:
//!
//! - the first `unsubscribe` flips it and unlinks the node, later calls are no-ops
//! - notification walks a snapshot of the list and skips detached nodes
//!
//! The snapshot is what makes it safe for an observer to subscribe or
//! unsubscribe (itself or others) from inside a notification.

use crate::error::StoreError;
use crate::observer::Observer;
use slab::Slab;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Type-erased back reference from a handle to its list
pub(crate) trait Unlink: Send + Sync {
    fn unlink(&self, key: usize);
}

struct ObserverNode<T> {
    observer: Box<dyn Observer<T>>,
    detached: Arc<AtomicBool>,
}

impl<T> ObserverNode<T> {
    fn is_attached(&self) -> bool {
        !self.detached.load(Ordering::Acquire)
    }
}

struct Slot<T> {
    node: Arc<ObserverNode<T>>,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Links<T> {
    slots: Slab<Slot<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

/// Ordered set of observers owned by a store
pub(crate) struct ObserverList<T> {
    links: Mutex<Links<T>>,
}

impl<T: 'static> ObserverList<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            links: Mutex::new(Links {
                slots: Slab::new(),
                head: None,
                tail: None,
            }),
        })
    }

    fn links(&self) -> MutexGuard<'_, Links<T>> {
        // Observer callbacks never run under this lock, so poisoning can only
        // come from a panic inside the list bookkeeping itself
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an observer at the tail
    pub(crate) fn subscribe(self: &Arc<Self>, observer: Box<dyn Observer<T>>) -> Subscription {
        let detached = Arc::new(AtomicBool::new(false));
        let node = Arc::new(ObserverNode {
            observer,
            detached: Arc::clone(&detached),
        });

        let key = {
            let mut links = self.links();
            let tail = links.tail;
            let key = links.slots.insert(Slot {
                node,
                prev: tail,
                next: None,
            });
            match tail {
                Some(tail) => links.slots[tail].next = Some(key),
                None => links.head = Some(key),
            }
            links.tail = Some(key);
            key
        };

        let list: Weak<dyn Unlink> = Arc::downgrade(self) as Weak<dyn Unlink>;
        Subscription {
            list,
            key,
            detached,
            retained: false,
        }
    }

    /// Observers in registration order, taken under the lock
    fn snapshot(&self) -> Vec<Arc<ObserverNode<T>>> {
        let links = self.links();
        let mut nodes = Vec::with_capacity(links.slots.len());
        let mut cursor = links.head;
        while let Some(key) = cursor {
            let slot = &links.slots[key];
            nodes.push(Arc::clone(&slot.node));
            cursor = slot.next;
        }
        nodes
    }

    pub(crate) fn notify_next(&self, value: &T) {
        let nodes = self.snapshot();
        log::trace!("Notifying {} observer(s)", nodes.len());
        for node in nodes {
            if node.is_attached() {
                node.observer.on_next(value);
            }
        }
    }

    pub(crate) fn notify_error(&self, error: &StoreError) {
        for node in self.snapshot() {
            if node.is_attached() {
                node.observer.on_error(error);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.links().slots.len()
    }
}

impl<T: 'static> Unlink for ObserverList<T> {
    fn unlink(&self, key: usize) {
        let mut links = self.links();
        if !links.slots.contains(key) {
            return;
        }
        let slot = links.slots.remove(key);
        match slot.prev {
            Some(prev) => links.slots[prev].next = slot.next,
            None => links.head = slot.next,
        }
        match slot.next {
            Some(next) => links.slots[next].prev = slot.prev,
            None => links.tail = slot.prev,
        }
        // The observer may own subscriptions to this list; dropping it
        // unlinks them, so the lock has to be released first
        drop(links);
        drop(slot);
    }
}

/// Handle returned by `subscribe`
///
/// Dropping the handle unsubscribes the observer. Use [`forget`](Self::forget)
/// to keep the observer registered for the lifetime of the store.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription {
    list: Weak<dyn Unlink>,
    key: usize,
    detached: Arc<AtomicBool>,
    retained: bool,
}

impl Subscription {
    /// Stop receiving notifications
    ///
    /// Idempotent: calling it again (or dropping the handle afterwards) does nothing.
    pub fn unsubscribe(&self) {
        if self.detached.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(list) = self.list.upgrade() {
            list.unlink(self.key);
        }
    }

    /// True until `unsubscribe` is called
    pub fn is_active(&self) -> bool {
        !self.detached.load(Ordering::Acquire)
    }

    /// Drop the handle but keep the observer registered
    pub fn forget(mut self) {
        self.retained = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.retained {
            self.unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::from_fn;
    use pretty_assertions::assert_eq;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(name: &'static str, log: &Log) -> Box<dyn Observer<i32>> {
        let log = Arc::clone(log);
        Box::new(from_fn(move |value: &i32| {
            log.lock().unwrap().push(format!("{name}:{value}"));
        }))
    }

    fn entries(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn test_notifies_in_registration_order() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let _a = list.subscribe(recorder("a", &log));
        let _b = list.subscribe(recorder("b", &log));
        let _c = list.subscribe(recorder("c", &log));

        list.notify_next(&1);

        assert_eq!(entries(&log), vec!["a:1", "b:1", "c:1"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_unlink_head_middle_tail_and_sole_node() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let a = list.subscribe(recorder("a", &log));
        let b = list.subscribe(recorder("b", &log));
        let c = list.subscribe(recorder("c", &log));
        let d = list.subscribe(recorder("d", &log));

        b.unsubscribe();
        list.notify_next(&1);
        assert_eq!(entries(&log), vec!["a:1", "c:1", "d:1"]);

        a.unsubscribe();
        list.notify_next(&2);
        assert_eq!(entries(&log), vec!["c:2", "d:2"]);

        d.unsubscribe();
        list.notify_next(&3);
        assert_eq!(entries(&log), vec!["c:3"]);

        c.unsubscribe();
        list.notify_next(&4);
        assert!(entries(&log).is_empty());
        assert_eq!(list.len(), 0);

        // The list is still usable once empty
        let _e = list.subscribe(recorder("e", &log));
        list.notify_next(&5);
        assert_eq!(entries(&log), vec!["e:5"]);
    }

    #[test]
    fn test_double_unsubscribe_is_noop() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let a = list.subscribe(recorder("a", &log));
        let b = list.subscribe(recorder("b", &log));

        a.unsubscribe();
        a.unsubscribe();
        assert!(!a.is_active());
        assert!(b.is_active());

        // A slot reused by a later subscriber must not be touched by a stale handle
        let c = list.subscribe(recorder("c", &log));
        a.unsubscribe();
        drop(a);

        list.notify_next(&1);
        assert_eq!(entries(&log), vec!["b:1", "c:1"]);
        drop((b, c));
    }

    #[test]
    fn test_drop_unsubscribes_and_forget_retains() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let dropped = list.subscribe(recorder("dropped", &log));
        list.subscribe(recorder("kept", &log)).forget();

        drop(dropped);
        list.notify_next(&1);

        assert_eq!(entries(&log), vec!["kept:1"]);
        assert_eq!(list.len(), 1);
    }

    /// Observer that keeps another subscription alive
    struct Owner {
        _held: Subscription,
    }

    impl Observer<i32> for Owner {
        fn on_next(&self, _value: &i32) {}
    }

    #[test]
    fn test_unsubscribe_observer_owning_subscription() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let inner = list.subscribe(recorder("inner", &log));
        let outer = list.subscribe(Box::new(Owner { _held: inner }));
        let _tail = list.subscribe(recorder("tail", &log));
        assert_eq!(list.len(), 3);

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let worker = std::thread::spawn(move || {
            outer.unsubscribe();
            done_tx.send(()).unwrap();
        });
        done_rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .expect("unsubscribe returned");
        worker.join().unwrap();

        // Dropping the owner released the inner subscription as well
        assert_eq!(list.len(), 1);
        list.notify_next(&1);
        assert_eq!(entries(&log), vec!["tail:1"]);
    }

    #[test]
    fn test_unsubscribe_after_list_dropped() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let handle = list.subscribe(recorder("a", &log));

        drop(list);
        handle.unsubscribe();
        assert!(!handle.is_active());
    }

    #[test]
    fn test_unsubscribe_other_during_notification() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::default();

        let killer_log = Arc::clone(&log);
        let killer_victim = Arc::clone(&victim);
        let _killer = list.subscribe(Box::new(from_fn(move |value: &i32| {
            killer_log.lock().unwrap().push(format!("killer:{value}"));
            if let Some(handle) = killer_victim.lock().unwrap().take() {
                handle.unsubscribe();
            }
        })));
        *victim.lock().unwrap() = Some(list.subscribe(recorder("victim", &log)));
        let _tail = list.subscribe(recorder("tail", &log));

        list.notify_next(&1);
        assert_eq!(entries(&log), vec!["killer:1", "tail:1"]);

        list.notify_next(&2);
        assert_eq!(entries(&log), vec!["killer:2", "tail:2"]);
    }

    #[test]
    fn test_subscribe_during_notification() {
        let log = Log::default();
        let list = ObserverList::<i32>::new();
        let added: Arc<Mutex<Vec<Subscription>>> = Arc::default();

        let weak_list = Arc::downgrade(&list);
        let spawner_log = Arc::clone(&log);
        let spawned = Arc::clone(&added);
        let _spawner = list.subscribe(Box::new(from_fn(move |value: &i32| {
            if *value == 1 {
                if let Some(list) = weak_list.upgrade() {
                    let handle = list.subscribe(recorder("late", &spawner_log));
                    spawned.lock().unwrap().push(handle);
                }
            }
        })));

        list.notify_next(&1);
        assert!(entries(&log).is_empty());

        list.notify_next(&2);
        assert_eq!(entries(&log), vec!["late:2"]);
    }
}
