use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::LifecycleError;
use crate::manager::ResourceManager;
use crate::resource::Resource;

/// Explicit wiring from resource kind to the manager that drives it.
///
/// The host populates this during initialization and hands it to the
/// sites that need it; lookups never fall back to any process-global
/// state.
#[derive(Default)]
pub struct ManagerRegistry {
    managers: RefCell<HashMap<TypeId, Rc<ResourceManager>>>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `manager` to resource kind `R`, replacing any previous one.
    pub fn set_manager<R: Resource>(&self, manager: Rc<ResourceManager>) {
        self.managers
            .borrow_mut()
            .insert(TypeId::of::<R>(), manager);
    }

    pub fn manager_for<R: Resource>(&self) -> Result<Rc<ResourceManager>, LifecycleError> {
        self.managers
            .borrow()
            .get(&TypeId::of::<R>())
            .cloned()
            .ok_or_else(|| LifecycleError::Unregistered(type_name::<R>()))
    }
}
