//! In-process, name-addressed publish/subscribe hub.
//!
//! Observer callbacks for every topic run serialized on one logical dispatch
//! queue: a post made while another post is being delivered (from the same
//! callback or from another thread) is queued and delivered after the current
//! delivery finishes, in order. Only observers registered before a post see
//! its payload.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

type ObserverFn<P> = Arc<dyn Fn(&P) + Send + Sync + 'static>;

/// Identifies one observer registration. Required to detach it again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObserverHandle {
    name: String,
    id: u64,
}

impl ObserverHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

struct ObserverEntry<P> {
    id: u64,
    callback: ObserverFn<P>,
}

pub struct NotificationHub<P> {
    observers: Mutex<HashMap<String, Vec<ObserverEntry<P>>>>,
    queue: Mutex<VecDeque<(String, P)>>,
    dispatch: Mutex<()>,
    drainer: Mutex<Option<ThreadId>>,
    next_observer_id: AtomicU64,
}

impl<P> NotificationHub<P> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            observers: Mutex::new(HashMap::new()),
            queue: Mutex::new(VecDeque::new()),
            dispatch: Mutex::new(()),
            drainer: Mutex::new(None),
            next_observer_id: AtomicU64::new(0),
        })
    }

    /// Registers `callback` for notifications posted under `name`.
    pub fn add_observer<F>(&self, name: &str, callback: F) -> ObserverHandle
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = self.next_observer_id.fetch_add(1, Ordering::SeqCst);
        let mut observers = self.observers.lock().unwrap();
        observers
            .entry(name.to_owned())
            .or_default()
            .push(ObserverEntry {
                id,
                callback: Arc::new(callback),
            });
        ObserverHandle {
            name: name.to_owned(),
            id,
        }
    }

    /// Detaches an observer. Safe to call for a handle that was already
    /// removed.
    pub fn remove_observer(&self, handle: &ObserverHandle) {
        let mut observers = self.observers.lock().unwrap();
        if let Some(entries) = observers.get_mut(&handle.name) {
            entries.retain(|entry| entry.id != handle.id);
            if entries.is_empty() {
                observers.remove(&handle.name);
            }
        }
    }

    pub fn observer_count(&self, name: &str) -> usize {
        self.observers
            .lock()
            .unwrap()
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Posts `payload` under `name`, delivering it to every registered
    /// observer before returning.
    ///
    /// A post issued from within an observer callback is queued and drained
    /// by the outer delivery, so callbacks may post freely without
    /// re-entering dispatch.
    pub fn post(&self, name: &str, payload: P) {
        self.queue
            .lock()
            .unwrap()
            .push_back((name.to_owned(), payload));

        if self.current_thread_is_draining() {
            return;
        }

        let _dispatch = self.dispatch.lock().unwrap();
        *self.drainer.lock().unwrap() = Some(thread::current().id());
        while let Some((name, payload)) = self.pop_queued() {
            self.deliver(&name, &payload);
        }
        *self.drainer.lock().unwrap() = None;
    }

    fn current_thread_is_draining(&self) -> bool {
        let drainer = self.drainer.lock().unwrap();
        *drainer == Some(thread::current().id())
    }

    fn pop_queued(&self) -> Option<(String, P)> {
        self.queue.lock().unwrap().pop_front()
    }

    fn deliver(&self, name: &str, payload: &P) {
        // Snapshot so callbacks can add or remove observers mid-delivery.
        let callbacks: Vec<ObserverFn<P>> = {
            let observers = self.observers.lock().unwrap();
            observers
                .get(name)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|entry| entry.callback.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        for callback in callbacks {
            callback(payload);
        }
    }
}

/// Detaches its observer when dropped, whichever of completion or
/// cancellation comes first. Removal is idempotent.
pub struct ObserverGuard<P> {
    hub: Arc<NotificationHub<P>>,
    handle: ObserverHandle,
}

impl<P> ObserverGuard<P> {
    pub fn new(hub: Arc<NotificationHub<P>>, handle: ObserverHandle) -> Self {
        Self { hub, handle }
    }

    pub fn handle(&self) -> &ObserverHandle {
        &self.handle
    }
}

impl<P> Drop for ObserverGuard<P> {
    fn drop(&mut self) {
        self.hub.remove_observer(&self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_hub() -> (Arc<NotificationHub<String>>, Arc<Mutex<Vec<String>>>) {
        (NotificationHub::new(), Arc::new(Mutex::new(Vec::new())))
    }

    #[test]
    fn post_reaches_observers_registered_before_it() {
        let (hub, events) = capture_hub();
        let sink = events.clone();
        hub.add_observer("Topic", move |payload: &String| {
            sink.lock().unwrap().push(payload.clone());
        });

        hub.post("Topic", "one".to_string());
        hub.post("Other", "ignored".to_string());

        assert_eq!(events.lock().unwrap().as_slice(), ["one".to_string()]);
    }

    #[test]
    fn observer_registered_after_post_misses_it() {
        let (hub, events) = capture_hub();

        hub.post("Topic", "early".to_string());

        let sink = events.clone();
        hub.add_observer("Topic", move |payload: &String| {
            sink.lock().unwrap().push(payload.clone());
        });
        hub.post("Topic", "late".to_string());

        assert_eq!(events.lock().unwrap().as_slice(), ["late".to_string()]);
    }

    #[test]
    fn reentrant_post_is_delivered_after_current_delivery() {
        let (hub, events) = capture_hub();

        let reply_hub = hub.clone();
        let sink = events.clone();
        hub.add_observer("Request", move |payload: &String| {
            sink.lock().unwrap().push(format!("request:{payload}"));
            reply_hub.post("Response", format!("{payload}-reply"));
            sink.lock().unwrap().push("request-done".to_string());
        });

        let sink = events.clone();
        hub.add_observer("Response", move |payload: &String| {
            sink.lock().unwrap().push(format!("response:{payload}"));
        });

        hub.post("Request", "a".to_string());

        assert_eq!(
            events.lock().unwrap().as_slice(),
            [
                "request:a".to_string(),
                "request-done".to_string(),
                "response:a-reply".to_string(),
            ]
        );
    }

    #[test]
    fn remove_observer_is_idempotent() {
        let (hub, events) = capture_hub();
        let sink = events.clone();
        let handle = hub.add_observer("Topic", move |payload: &String| {
            sink.lock().unwrap().push(payload.clone());
        });

        hub.remove_observer(&handle);
        hub.remove_observer(&handle);
        hub.post("Topic", "after".to_string());

        assert!(events.lock().unwrap().is_empty());
        assert_eq!(hub.observer_count("Topic"), 0);
    }

    #[test]
    fn guard_detaches_on_drop() {
        let hub: Arc<NotificationHub<String>> = NotificationHub::new();
        let handle = hub.add_observer("Topic", |_: &String| {});
        assert_eq!(hub.observer_count("Topic"), 1);

        drop(ObserverGuard::new(hub.clone(), handle));
        assert_eq!(hub.observer_count("Topic"), 0);
    }

    #[test]
    fn observer_can_detach_itself_during_delivery() {
        let hub: Arc<NotificationHub<String>> = NotificationHub::new();
        let fired = Arc::new(Mutex::new(0usize));

        let detach_hub = hub.clone();
        let slot: Arc<Mutex<Option<ObserverHandle>>> = Arc::new(Mutex::new(None));
        let slot_in_callback = slot.clone();
        let count = fired.clone();
        let handle = hub.add_observer("Topic", move |_: &String| {
            *count.lock().unwrap() += 1;
            if let Some(handle) = slot_in_callback.lock().unwrap().take() {
                detach_hub.remove_observer(&handle);
            }
        });
        *slot.lock().unwrap() = Some(handle);

        hub.post("Topic", "first".to_string());
        hub.post("Topic", "second".to_string());

        assert_eq!(*fired.lock().unwrap(), 1);
    }
}
