use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::model::AuthUser;
use crate::util::Unsubscribe;

type NextFn = Arc<dyn Fn(Option<&AuthUser>) + Send + Sync + 'static>;

enum ObserverSink {
    Callback(NextFn),
    Channel(async_channel::Sender<Option<AuthUser>>),
}

struct StateObserver {
    id: u64,
    sink: ObserverSink,
}

/// Shared cell holding the latest known `Option<AuthUser>`.
///
/// Written only by the bridge's auth-state observer; read by arbitrarily many
/// concurrent consumers. A newly-registered observer is immediately handed
/// the current value, then every subsequent update — latest value wins, no
/// event log.
///
/// Observers must not register further observers from within their own
/// callback; notification holds the registration lock.
pub struct AuthStateCell {
    value: Mutex<Option<AuthUser>>,
    observers: Mutex<Vec<StateObserver>>,
    next_observer_id: AtomicU64,
}

impl AuthStateCell {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(None),
            observers: Mutex::new(Vec::new()),
            next_observer_id: AtomicU64::new(0),
        })
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> Option<AuthUser> {
        self.value.lock().unwrap().clone()
    }

    /// Registers `callback`, replaying the latest value before returning.
    pub fn observe<F>(self: &Arc<Self>, callback: F) -> Unsubscribe
    where
        F: Fn(Option<&AuthUser>) + Send + Sync + 'static,
    {
        let callback: NextFn = Arc::new(callback);
        let id = self.next_observer_id.fetch_add(1, Ordering::SeqCst);

        {
            // Replay and registration are atomic with respect to `set`: the
            // value lock is held across both, so the observer either replays
            // the old value and is registered for the new one, or replays
            // the new value. Lock order is value, then observers.
            let current = self.value.lock().unwrap();
            let mut observers = self.observers.lock().unwrap();
            callback(current.as_ref());
            observers.push(StateObserver {
                id,
                sink: ObserverSink::Callback(callback),
            });
        }

        let cell = self.clone();
        Box::new(move || cell.remove_observer(id))
    }

    /// Returns a stream of value updates, starting with the current value.
    /// Dropping the receiver detaches the underlying observer.
    pub fn updates(&self) -> async_channel::Receiver<Option<AuthUser>> {
        let (sender, receiver) = async_channel::unbounded();
        let id = self.next_observer_id.fetch_add(1, Ordering::SeqCst);

        let current = self.value.lock().unwrap();
        let mut observers = self.observers.lock().unwrap();
        let _ = sender.try_send(current.clone());
        observers.push(StateObserver {
            id,
            sink: ObserverSink::Channel(sender),
        });

        receiver
    }

    /// Stores `next` and notifies every live observer. Closed update streams
    /// are pruned here.
    pub(crate) fn set(&self, next: Option<AuthUser>) {
        *self.value.lock().unwrap() = next.clone();

        let mut observers = self.observers.lock().unwrap();
        observers.retain(|observer| match &observer.sink {
            ObserverSink::Callback(callback) => {
                callback(next.as_ref());
                true
            }
            ObserverSink::Channel(sender) => sender.try_send(next.clone()).is_ok(),
        });
    }

    fn remove_observer(&self, id: u64) {
        self.observers
            .lock()
            .unwrap()
            .retain(|observer| observer.id != id);
    }

    #[cfg(test)]
    pub(crate) fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }
}
