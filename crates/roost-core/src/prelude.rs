pub use crate::cell::ResourceCell;
pub use crate::destroyable::DestroyKey;
pub use crate::error::{HookError, LifecycleError};
pub use crate::fns::{Cleanup, FnResource, fn_resource, fn_resource_with_cleanup};
pub use crate::manager::{
    Capabilities, CapabilityFlags, HelperState, PROTOCOL_VERSION, ResourceManager,
};
pub use crate::owner::Owner;
pub use crate::registry::ManagerRegistry;
pub use crate::resource::{Hooks, Lifecycle, Resource, ResourceDef, ResourceTemplate};
pub use crate::scope::{Scope, current_scope};
pub use crate::signal::{Signal, signal};
