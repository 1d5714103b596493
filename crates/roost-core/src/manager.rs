use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bitflags::bitflags;

use crate::destroyable::{self, DestroyKey};
use crate::error::LifecycleError;
use crate::owner::Owner;
use crate::resource::{Hooks, Lifecycle, Resource, ResourceDef};

bitflags! {
    /// What a manager implements of the host's value-computation protocol.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct CapabilityFlags: u8 {
        /// `get_value` yields a live current value.
        const HAS_VALUE = 1 << 0;
        /// `get_destroyable` yields a handle for the destructor chain.
        const HAS_DESTROYABLE = 1 << 1;
    }
}

/// Version token hosts compare against [`Capabilities::version`].
pub const PROTOCOL_VERSION: u32 = 1;

/// Version-stamped capability declaration, checked by the host before it
/// wires a manager into a computation site.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Capabilities {
    pub version: u32,
    pub flags: CapabilityFlags,
}

impl Capabilities {
    pub fn compatible(&self) -> bool {
        self.version == PROTOCOL_VERSION
    }
}

/// The lifecycle record for one computation site.
///
/// Cloning shares the record. The current instance is owned exclusively
/// by the record and replaced only through its manager; replacing it
/// always tears the previous instance down first.
pub struct HelperState<R: Resource> {
    inner: Rc<StateInner<R>>,
}

impl<R: Resource> Clone for HelperState<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct StateInner<R: Resource> {
    def: ResourceDef<R>,
    args: RefCell<R::Args>,
    instance: RefCell<Option<InstanceSlot<R>>>,
    // record-level destroyable, allocated the first time the host asks
    record_key: Cell<Option<DestroyKey>>,
}

struct InstanceSlot<R> {
    object: Rc<RefCell<R>>,
    key: DestroyKey,
    lifecycle: Lifecycle,
    // built by `create_helper` and not yet read
    fresh: bool,
}

impl<R: Resource> HelperState<R> {
    /// Replaces the argument snapshot used by the next refresh.
    pub fn set_args(&self, args: R::Args) {
        *self.inner.args.borrow_mut() = args;
    }

    /// Lifecycle strategy of the current instance, fixed at its
    /// construction. `None` once the record lost its instance.
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        self.inner.instance.borrow().as_ref().map(|s| s.lifecycle)
    }
}

/// The engine plugged into the host's value-computation protocol: builds
/// instances, refreshes them on recomputation, and exposes the right
/// handle to the destructor chain.
pub struct ResourceManager {
    owner: Owner,
}

impl ResourceManager {
    pub fn new(owner: Owner) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            version: PROTOCOL_VERSION,
            flags: CapabilityFlags::HAS_VALUE | CapabilityFlags::HAS_DESTROYABLE,
        }
    }

    /// Allocates a lifecycle record and builds its first instance.
    pub fn create_helper<R: Resource>(
        &self,
        def: &ResourceDef<R>,
        args: R::Args,
    ) -> Result<HelperState<R>, LifecycleError> {
        let state = HelperState {
            inner: Rc::new(StateInner {
                def: def.clone(),
                args: RefCell::new(args),
                instance: RefCell::new(None),
                record_key: Cell::new(None),
            }),
        };
        self.setup_instance(&state)?;
        Ok(state)
    }

    fn setup_instance<R: Resource>(&self, state: &HelperState<R>) -> Result<(), LifecycleError> {
        let inner = &state.inner;
        let mut resource = {
            let args = inner.args.borrow();
            inner
                .def
                .construct(&self.owner, &args)
                .map_err(LifecycleError::Construction)?
        };
        // fixed for the instance's whole life
        let hooks = resource.hooks();
        resource.setup().map_err(LifecycleError::Construction)?;

        let object = Rc::new(RefCell::new(resource));
        let key = destroyable::allocate();
        if hooks.contains(Hooks::TEARDOWN) {
            let object = object.clone();
            destroyable::register_destructor(key, move || object.borrow_mut().teardown());
        }

        *inner.instance.borrow_mut() = Some(InstanceSlot {
            object,
            key,
            lifecycle: Lifecycle::of(hooks),
            fresh: true,
        });
        Ok(())
    }

    /// Current value of the record, refreshed for this recomputation.
    ///
    /// Updatable instances absorb the latest argument snapshot in place.
    /// Replaceable instances are torn down and rebuilt, except on the
    /// first read, which consumes the instance built by `create_helper`.
    /// Teardown of the old instance always completes before setup of the
    /// new one begins.
    ///
    /// An `update` failure leaves the old instance live and registered.
    /// A teardown failure aborts the recreation and leaves the record
    /// without an instance; every later operation on it reports
    /// [`LifecycleError::Defunct`].
    pub fn get_value<R: Resource>(&self, state: &HelperState<R>) -> Result<R::Value, LifecycleError> {
        let inner = &state.inner;
        let (lifecycle, fresh) = {
            let slot = inner.instance.borrow();
            let slot = slot.as_ref().ok_or(LifecycleError::Defunct)?;
            (slot.lifecycle, slot.fresh)
        };

        match lifecycle {
            Lifecycle::Updatable => {
                let object = {
                    let slot = inner.instance.borrow();
                    slot.as_ref()
                        .map(|s| s.object.clone())
                        .ok_or(LifecycleError::Defunct)?
                };
                {
                    let args = inner.args.borrow();
                    object
                        .borrow_mut()
                        .update(&args)
                        .map_err(LifecycleError::Update)?;
                }
                let value = object.borrow().value();
                Ok(value)
            }
            Lifecycle::Replaceable => {
                if !fresh {
                    let old = inner
                        .instance
                        .borrow_mut()
                        .take()
                        .ok_or(LifecycleError::Defunct)?;
                    destroyable::destroy(old.key).map_err(LifecycleError::Teardown)?;
                    self.setup_instance(state)?;
                }
                let mut slot = inner.instance.borrow_mut();
                let slot = slot.as_mut().ok_or(LifecycleError::Defunct)?;
                slot.fresh = false;
                let value = slot.object.borrow().value();
                Ok(value)
            }
        }
    }

    /// The single handle the host should track for eventual release.
    ///
    /// An updatable instance keeps its identity for the record's whole
    /// life, so it is tracked directly. A replaceable instance changes on
    /// every recomputation, so the record is tracked instead; its
    /// destructor tears down whichever instance is current when it fires.
    /// The record handle is allocated once and reused on repeated calls,
    /// so no second destructor can ever stack up for the same record.
    pub fn get_destroyable<R: Resource>(
        &self,
        state: &HelperState<R>,
    ) -> Result<DestroyKey, LifecycleError> {
        let inner = &state.inner;
        let (lifecycle, instance_key) = {
            let slot = inner.instance.borrow();
            let slot = slot.as_ref().ok_or(LifecycleError::Defunct)?;
            (slot.lifecycle, slot.key)
        };

        match lifecycle {
            Lifecycle::Updatable => Ok(instance_key),
            Lifecycle::Replaceable => {
                if let Some(key) = inner.record_key.get() {
                    return Ok(key);
                }
                let key = destroyable::allocate();
                inner.record_key.set(Some(key));
                let state = state.clone();
                destroyable::register_destructor(key, move || {
                    let current = state.inner.instance.borrow_mut().take();
                    match current {
                        Some(slot) => destroyable::destroy(slot.key),
                        None => Ok(()),
                    }
                });
                Ok(key)
            }
        }
    }
}
