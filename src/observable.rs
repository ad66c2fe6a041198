//! Observable values with read-only projections
//!
//! A [`Writable`] publishes a new immutable snapshot on every change. Any
//! number of [`Readable`] projections can read the latest snapshot or
//! subscribe to future ones.

use std::sync::Arc;
use tokio::sync::watch;

/// Writable side of an observable value
#[derive(Debug)]
pub struct Writable<T> {
    sender: watch::Sender<Arc<T>>,
}

impl<T: Clone> Writable<T> {
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(Arc::new(value));
        Self { sender }
    }

    /// The latest published snapshot
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.sender.borrow())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.sender.send_replace(Arc::new(value));
    }

    /// Modify the value in place and notify subscribers
    ///
    /// Snapshots handed out earlier are left untouched.
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.sender.send_modify(|current| modify(Arc::make_mut(current)));
    }

    /// Modify the value, notifying subscribers only when `modify` returns `true`
    pub fn update_if(&self, modify: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender
            .send_if_modified(|current| modify(Arc::make_mut(current)))
    }

    /// A read-only projection of this value
    pub fn readonly(&self) -> Readable<T> {
        Readable {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Read-only projection of a [`Writable`]
#[derive(Clone, Debug)]
pub struct Readable<T> {
    receiver: watch::Receiver<Arc<T>>,
}

impl<T> Readable<T> {
    /// The latest published snapshot
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.receiver.borrow())
    }

    /// A receiver notified of every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        let mut receiver = self.receiver.clone();
        receiver.mark_unchanged();
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_sees_latest_snapshot() {
        let writable = Writable::new(vec![1]);
        let readable = writable.readonly();

        writable.update(|v| v.push(2));
        assert_eq!(*readable.get(), vec![1, 2]);

        writable.set(vec![7]);
        assert_eq!(*readable.get(), vec![7]);
    }

    #[test]
    fn earlier_snapshots_are_immutable() {
        let writable = Writable::new(vec![1]);
        let before = writable.get();

        writable.update(|v| v.push(2));

        assert_eq!(*before, vec![1]);
        assert_eq!(*writable.get(), vec![1, 2]);
    }

    #[test]
    fn update_if_reports_modification() {
        let writable = Writable::new(vec![1, 2, 3]);
        let readable = writable.readonly();
        let mut receiver = readable.subscribe();

        let changed = writable.update_if(|v| {
            let len = v.len();
            v.retain(|x| *x != 9);
            v.len() != len
        });
        assert!(!changed);
        assert!(!receiver.has_changed().unwrap_or(true));

        let changed = writable.update_if(|v| {
            v.retain(|x| *x != 2);
            true
        });
        assert!(changed);
        assert!(receiver.has_changed().unwrap_or(false));
        assert_eq!(**receiver.borrow_and_update(), vec![1, 3]);
    }

    #[tokio::test]
    async fn subscribers_are_woken_on_change() {
        let writable = Writable::new(0u32);
        let mut receiver = writable.readonly().subscribe();

        writable.set(5);
        receiver.changed().await.unwrap();
        assert_eq!(**receiver.borrow(), 5);
    }
}
