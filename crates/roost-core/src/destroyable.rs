//! Destructor registration for lifecycle handles.
//!
//! Every destroyable object is identified by a [`DestroyKey`]. Destructors
//! registered against a key run exactly once, when [`destroy`] is first
//! called for it. Destroying a key twice is a contract violation on the
//! caller's side; the second call is logged and ignored.

use std::cell::RefCell;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::HookError;

slotmap::new_key_type! {
    /// Identity of one destroyable object.
    pub struct DestroyKey;
}

type Destructor = Box<dyn FnOnce() -> Result<(), HookError>>;

thread_local! {
    static REGISTRY: RefCell<SlotMap<DestroyKey, SmallVec<[Destructor; 2]>>> =
        RefCell::new(SlotMap::with_key());
}

/// Allocates a fresh destroyable identity.
pub fn allocate() -> DestroyKey {
    REGISTRY.with(|r| r.borrow_mut().insert(SmallVec::new()))
}

/// Attaches `f` to `key`'s eventual destroy.
pub fn register_destructor(key: DestroyKey, f: impl FnOnce() -> Result<(), HookError> + 'static) {
    REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        if let Some(destructors) = r.get_mut(key) {
            destructors.push(Box::new(f));
        } else {
            log::warn!("register_destructor: handle already destroyed; destructor will never run");
        }
    });
}

/// Runs every destructor registered on `key`, in registration order,
/// exactly once.
///
/// The key is marked destroyed before any destructor runs. The first
/// destructor error propagates; the remaining destructors for this key
/// are dropped unrun.
pub fn destroy(key: DestroyKey) -> Result<(), HookError> {
    let destructors = REGISTRY.with(|r| r.borrow_mut().remove(key));
    let Some(destructors) = destructors else {
        log::warn!("destroy: handle already destroyed");
        return Ok(());
    };
    for d in destructors {
        d()?;
    }
    Ok(())
}

/// Whether `key` has already been destroyed.
pub fn is_destroyed(key: DestroyKey) -> bool {
    REGISTRY.with(|r| !r.borrow().contains_key(key))
}
