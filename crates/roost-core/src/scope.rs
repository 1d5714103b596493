use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::destroyable;

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Ownership scope for computation sites.
///
/// A scope is a destroyable handle with children: disposers registered on
/// it run when the scope is disposed, children first. Resource cells
/// created inside [`Scope::run`] attach their own disposal here, so
/// tearing down the scope tears down everything composed within it.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    key: destroyable::DestroyKey,
    children: RefCell<Vec<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                key: destroyable::allocate(),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_SCOPE.with(|current| {
            let prev = current.borrow().clone();
            *current.borrow_mut() = Some(Rc::downgrade(&self.inner));
            let result = f();
            *current.borrow_mut() = prev;
            result
        })
    }

    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        destroyable::register_destructor(self.inner.key, move || {
            disposer();
            Ok(())
        });
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        self.inner.children.borrow_mut().push(child.clone());
        child
    }

    pub fn dispose(self) {
        // Dispose children first
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        if let Err(e) = destroyable::destroy(self.inner.key) {
            log::error!("scope disposer failed: {e}");
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        drop(children);

        if !destroyable::is_destroyed(self.key)
            && let Err(e) = destroyable::destroy(self.key)
        {
            log::error!("scope disposer failed during drop: {e}");
        }
    }
}
