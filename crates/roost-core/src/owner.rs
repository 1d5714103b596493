use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Ambient service container handed to resources at construction.
///
/// Cloning shares the underlying registry, so a resource may keep its
/// owner around and resolve services later in its life.
#[derive(Clone, Default)]
pub struct Owner {
    services: Rc<RefCell<HashMap<TypeId, Rc<dyn Any>>>>,
}

impl Owner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any previous one of the same type.
    pub fn provide<T: 'static>(&self, service: T) {
        self.services
            .borrow_mut()
            .insert(TypeId::of::<T>(), Rc::new(service));
    }

    pub fn lookup<T: 'static>(&self) -> Option<Rc<T>> {
        self.services
            .borrow()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|s| s.downcast::<T>().ok())
    }
}
