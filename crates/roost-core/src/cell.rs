use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::destroyable::{self, DestroyKey};
use crate::error::LifecycleError;
use crate::manager::{HelperState, ResourceManager};
use crate::reactive::{self, ObserverId};
use crate::resource::{Resource, ResourceTemplate};
use crate::scope;

/// One materialized use of a resource template: a computation site.
///
/// The cell resolves the template's argument thunk under dependency
/// tracking, so writing any signal the thunk reads refreshes the value
/// through the manager. Reads in between are served from cache; unrelated
/// signal writes never touch the resource.
///
/// A cell created inside [`Scope::run`](crate::scope::Scope::run) is
/// disposed with that scope. Otherwise call [`dispose`](ResourceCell::dispose)
/// when the site goes away.
pub struct ResourceCell<R: Resource> {
    inner: Rc<CellInner<R>>,
}

impl<R: Resource> Clone for ResourceCell<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct CellInner<R: Resource> {
    manager: Rc<ResourceManager>,
    template: ResourceTemplate<R>,
    state: RefCell<Option<HelperState<R>>>,
    value: RefCell<Option<R::Value>>,
    error: RefCell<Option<LifecycleError>>,
    observer: Cell<Option<ObserverId>>,
    destroyable: Cell<Option<DestroyKey>>,
    disposed: Cell<bool>,
}

impl<R: Resource> ResourceCell<R> {
    /// Wires a template to `manager`, checking the manager's declared
    /// capabilities first. Registers disposal with the current scope, if
    /// one is active.
    pub fn new(
        manager: Rc<ResourceManager>,
        template: ResourceTemplate<R>,
    ) -> Result<Self, LifecycleError> {
        let caps = manager.capabilities();
        if !caps.compatible() {
            return Err(LifecycleError::Protocol(caps.version));
        }

        let inner = Rc::new(CellInner {
            manager,
            template,
            state: RefCell::new(None),
            value: RefCell::new(None),
            error: RefCell::new(None),
            observer: Cell::new(None),
            destroyable: Cell::new(None),
            disposed: Cell::new(false),
        });

        let weak: Weak<CellInner<R>> = Rc::downgrade(&inner);
        let observer = reactive::new_observer(move || {
            if let Some(inner) = weak.upgrade()
                && let Err(e) = refresh(&inner)
            {
                log::error!("resource refresh failed: {e}");
                *inner.error.borrow_mut() = Some(e);
            }
        });
        inner.observer.set(Some(observer));

        let cell = Self { inner };
        if let Some(scope) = scope::current_scope() {
            let site = cell.clone();
            scope.add_disposer(move || {
                if let Err(e) = site.dispose() {
                    log::error!("resource cell disposal failed: {e}");
                }
            });
        }
        Ok(cell)
    }

    /// Current value, computing on first read. Later reads return the
    /// cached value until a tracked dependency changes.
    ///
    /// A failure from an eager refresh (one triggered by a signal write)
    /// is surfaced by the next `value` call.
    pub fn value(&self) -> Result<R::Value, LifecycleError> {
        if self.inner.disposed.get() {
            return Err(LifecycleError::Defunct);
        }
        if let Some(e) = self.inner.error.borrow_mut().take() {
            return Err(e);
        }
        if self.inner.value.borrow().is_none() {
            let Some(observer) = self.inner.observer.get() else {
                return Err(LifecycleError::Defunct);
            };
            reactive::with_observer(observer, || refresh(&self.inner))?;
        }
        self.inner
            .value
            .borrow()
            .as_ref()
            .cloned()
            .ok_or(LifecycleError::Defunct)
    }

    /// Releases the site: removes the observer and destroys the handle
    /// obtained from the manager. Runs at most once; later calls are
    /// no-ops.
    pub fn dispose(&self) -> Result<(), LifecycleError> {
        if self.inner.disposed.replace(true) {
            return Ok(());
        }
        if let Some(observer) = self.inner.observer.take() {
            reactive::remove_observer(observer);
        }
        if let Some(key) = self.inner.destroyable.take() {
            destroyable::destroy(key).map_err(LifecycleError::Teardown)?;
        }
        Ok(())
    }
}

/// Resolves the argument thunk and refreshes through the manager. Runs
/// with the cell's observer current, so the thunk's signal reads are
/// re-tracked on every refresh.
fn refresh<R: Resource>(inner: &Rc<CellInner<R>>) -> Result<(), LifecycleError> {
    if inner.disposed.get() {
        return Ok(());
    }
    let args = (inner.template.args)();

    let existing = inner.state.borrow().as_ref().cloned();
    let value = match existing {
        None => {
            let state = inner.manager.create_helper(&inner.template.def, args)?;
            let value = inner.manager.get_value(&state)?;
            // tracked once, for the whole life of the site
            let key = inner.manager.get_destroyable(&state)?;
            inner.destroyable.set(Some(key));
            *inner.state.borrow_mut() = Some(state);
            value
        }
        Some(state) => {
            state.set_args(args);
            inner.manager.get_value(&state)?
        }
    };
    *inner.value.borrow_mut() = Some(value);
    Ok(())
}
