//! Single-value observable container.
//!
//! An [`Observable`] holds one value and broadcasts `(old, new)` to every
//! registered listener each time [`Observable::set_value`] is called. It is
//! built for a single logical writer on one thread: interior mutability uses
//! `Rc`/`RefCell`, so the type is neither `Send` nor `Sync`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Shared listener callback receiving `(old, new)`.
pub type Listener<T> = Rc<dyn Fn(&T, &T)>;

/// Identifies one registration returned by [`Observable::add_listener`].
///
/// Removal is by handle, so the same callback registered twice yields two
/// independent handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

pub struct Observable<T> {
    value: RefCell<Rc<T>>,
    listeners: RefCell<Vec<(ListenerHandle, Listener<T>)>>,
    next_handle: Cell<u64>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(Rc::new(initial)),
            listeners: RefCell::new(Vec::new()),
            next_handle: Cell::new(0),
        }
    }

    /// Current value. Never triggers a notification.
    pub fn value(&self) -> Rc<T> {
        Rc::clone(&self.value.borrow())
    }

    /// Store `new_value`, then notify every listener in registration order.
    ///
    /// Every call notifies; values are not compared. Listeners see the set
    /// registered when delivery starts. A panicking listener aborts delivery
    /// to the listeners after it. Listeners may call `set_value` again; the
    /// nested delivery runs to completion before the outer one continues.
    pub fn set_value(&self, new_value: T) {
        let new_value = Rc::new(new_value);
        let old_value = self.value.replace(Rc::clone(&new_value));

        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&old_value, &new_value);
        }
    }

    pub fn add_listener<F>(&self, listener: F) -> ListenerHandle
    where
        F: Fn(&T, &T) + 'static,
    {
        self.add_shared_listener(Rc::new(listener))
    }

    /// Register an already shared callback. Registering the same `Rc` twice
    /// creates two registrations.
    pub fn add_shared_listener(&self, listener: Listener<T>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.listeners.borrow_mut().push((handle, listener));
        handle
    }

    /// Returns `false` when the handle was already removed.
    pub fn remove_listener(&self, handle: ListenerHandle) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<T: Clone> Observable<T> {
    /// Owned copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().as_ref().clone()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    type Calls = Rc<RefCell<Vec<(&'static str, i32, i32)>>>;

    fn recorder(calls: &Calls, name: &'static str) -> impl Fn(&i32, &i32) + 'static {
        let calls = Rc::clone(calls);
        move |old, new| calls.borrow_mut().push((name, *old, *new))
    }

    #[test]
    fn test_value_does_not_notify() {
        let observable = Observable::new(1);
        let calls: Calls = Rc::default();
        observable.add_listener(recorder(&calls, "a"));

        assert_eq!(*observable.value(), 1);
        assert_eq!(observable.get(), 1);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_two_listeners_two_updates_in_registration_order() {
        let observable = Observable::new(0);
        let calls: Calls = Rc::default();
        observable.add_listener(recorder(&calls, "first"));
        observable.add_listener(recorder(&calls, "second"));

        observable.set_value(1);
        observable.set_value(2);

        assert_eq!(
            *calls.borrow(),
            vec![
                ("first", 0, 1),
                ("second", 0, 1),
                ("first", 1, 2),
                ("second", 1, 2),
            ]
        );
    }

    #[test]
    fn test_equal_value_still_notifies() {
        let observable = Observable::new(5);
        let calls: Calls = Rc::default();
        observable.add_listener(recorder(&calls, "a"));

        observable.set_value(5);
        observable.set_value(5);

        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_remove_by_handle() {
        let observable = Observable::new(0);
        let calls: Calls = Rc::default();
        let first = observable.add_listener(recorder(&calls, "first"));
        observable.add_listener(recorder(&calls, "second"));

        assert!(observable.remove_listener(first));
        assert!(!observable.remove_listener(first));
        observable.set_value(1);

        assert_eq!(*calls.borrow(), vec![("second", 0, 1)]);
        assert_eq!(observable.listener_count(), 1);
    }

    #[test]
    fn test_same_callback_registered_twice_is_independent() {
        let observable = Observable::new(0);
        let count = Rc::new(Cell::new(0));
        let shared: Listener<i32> = {
            let count = Rc::clone(&count);
            Rc::new(move |_, _| count.set(count.get() + 1))
        };

        let a = observable.add_shared_listener(Rc::clone(&shared));
        let b = observable.add_shared_listener(Rc::clone(&shared));
        assert_ne!(a, b);

        observable.set_value(1);
        assert_eq!(count.get(), 2);

        observable.remove_listener(a);
        observable.set_value(2);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_panicking_listener_stops_later_listeners() {
        let observable = Observable::new(0);
        let calls: Calls = Rc::default();
        observable.add_listener(recorder(&calls, "before"));
        observable.add_listener(|_, _| panic!("listener failure"));
        observable.add_listener(recorder(&calls, "after"));

        let result = catch_unwind(AssertUnwindSafe(|| observable.set_value(1)));

        assert!(result.is_err());
        assert_eq!(*calls.borrow(), vec![("before", 0, 1)]);
        assert_eq!(*observable.value(), 1);
    }

    #[test]
    fn test_reentrant_set_value_from_listener() {
        let observable = Rc::new(Observable::new(0));
        let seen: Rc<RefCell<Vec<(i32, i32)>>> = Rc::default();

        {
            let inner = Rc::clone(&observable);
            observable.add_listener(move |_, new| {
                if *new == 1 {
                    inner.set_value(2);
                }
            });
        }
        {
            let seen = Rc::clone(&seen);
            observable.add_listener(move |old, new| seen.borrow_mut().push((*old, *new)));
        }

        observable.set_value(1);

        assert_eq!(*observable.value(), 2);
        assert_eq!(*seen.borrow(), vec![(1, 2), (0, 1)]);
    }

    #[test]
    fn test_listener_added_during_delivery_misses_in_flight_value() {
        let observable = Rc::new(Observable::new(0));
        let late_calls = Rc::new(Cell::new(0));

        {
            let inner = Rc::clone(&observable);
            let late_calls = Rc::clone(&late_calls);
            observable.add_listener(move |_, new| {
                if *new == 1 {
                    let late_calls = Rc::clone(&late_calls);
                    inner.add_listener(move |_, _| late_calls.set(late_calls.get() + 1));
                }
            });
        }

        observable.set_value(1);
        assert_eq!(late_calls.get(), 0);

        observable.set_value(2);
        assert_eq!(late_calls.get(), 1);
    }
}
