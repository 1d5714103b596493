use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive;

pub type SubId = usize;

/// Observable, reactive value. Cloning shares the underlying state.
///
/// Reads performed while an observer is current (e.g. inside a resource
/// template's argument thunk) register a dependency; writes re-run the
/// dependent observers synchronously.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    id: reactive::SignalId,
    value: T,
    subs: Vec<Box<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            id: reactive::next_signal_id(),
            value,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        let inner = self.0.borrow();
        reactive::register_signal_read(inner.id);
        inner.value.clone()
    }

    pub fn set(&self, v: T) {
        let id = {
            let mut inner = self.0.borrow_mut();
            inner.value = v;
            let vref = &inner.value;
            for s in &inner.subs {
                s(vref);
            }
            inner.id
        };
        reactive::signal_changed(id);
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let id = {
            let mut inner = self.0.borrow_mut();
            f(&mut inner.value);
            let vref = &inner.value;
            for s in &inner.subs {
                s(vref);
            }
            inner.id
        };
        reactive::signal_changed(id);
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.borrow_mut().subs.push(Box::new(f));
        self.0.borrow().subs.len() - 1
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
