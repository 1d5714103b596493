use std::rc::Rc;

use bitflags::bitflags;

use crate::error::HookError;
use crate::owner::Owner;

bitflags! {
    /// Lifecycle hooks an instance declares at construction.
    ///
    /// The declared set is queried once, right after the factory returns,
    /// and fixed for the instance's entire life.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct Hooks: u8 {
        /// The instance absorbs new arguments in place and is never
        /// replaced.
        const UPDATE = 1 << 0;
        /// The instance must be told when its life ends.
        const TEARDOWN = 1 << 1;
    }
}

/// The two lifecycle strategies an instance commits to at construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lifecycle {
    /// `update` runs on every refresh; the instance is never replaced.
    Updatable,
    /// Every refresh after the first read tears the instance down and
    /// builds a fresh one.
    Replaceable,
}

impl Lifecycle {
    pub(crate) fn of(hooks: Hooks) -> Self {
        if hooks.contains(Hooks::UPDATE) {
            Lifecycle::Updatable
        } else {
            Lifecycle::Replaceable
        }
    }
}

/// A stateful object embedded in the recomputation graph.
///
/// Implementations expose an observable [`value`](Resource::value) and
/// opt into lifecycle hooks through [`hooks`](Resource::hooks). A resource
/// that declares [`Hooks::UPDATE`] is refreshed in place; one that does
/// not is destroyed and rebuilt on every refresh after the first read.
pub trait Resource: 'static {
    /// Snapshot of arguments an instance is built from.
    type Args: 'static;
    /// Externally observable result.
    type Value: Clone + 'static;

    /// Hooks this instance carries.
    fn hooks(&self) -> Hooks {
        Hooks::empty()
    }

    /// First-time initialization, e.g. opening a connection. Runs exactly
    /// once per instance, immediately after construction.
    fn setup(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    /// In-place refresh against the latest argument snapshot. Only called
    /// on instances that declared [`Hooks::UPDATE`].
    fn update(&mut self, args: &Self::Args) -> Result<(), HookError> {
        let _ = args;
        Ok(())
    }

    /// End-of-life hook. Only called on instances that declared
    /// [`Hooks::TEARDOWN`], exactly once.
    fn teardown(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    fn value(&self) -> Self::Value;
}

/// How to construct one instance of a resource.
///
/// A definition is a factory plus nothing else: it carries no per-site
/// state. The per-site state lives in the manager's lifecycle record.
/// Definitions are cheap to clone.
pub struct ResourceDef<R: Resource> {
    build: Rc<dyn Fn(&Owner, &R::Args) -> Result<R, HookError>>,
}

impl<R: Resource> Clone for ResourceDef<R> {
    fn clone(&self) -> Self {
        Self {
            build: self.build.clone(),
        }
    }
}

impl<R: Resource> ResourceDef<R> {
    /// Definition backed by a constructor closure.
    pub fn new(build: impl Fn(&Owner, &R::Args) -> Result<R, HookError> + 'static) -> Self {
        Self {
            build: Rc::new(build),
        }
    }

    /// Builds one instance bound to `owner`. The caller owns the result
    /// and is responsible for running `setup` on it.
    pub fn construct(&self, owner: &Owner, args: &R::Args) -> Result<R, HookError> {
        (self.build)(owner, args)
    }

    /// Defers this definition: pairs it with an argument thunk that the
    /// host resolves at each recomputation, once a context is available.
    pub fn template(&self, args: impl Fn() -> R::Args + 'static) -> ResourceTemplate<R> {
        ResourceTemplate {
            def: self.clone(),
            args: Rc::new(args),
        }
    }
}

/// A definition paired with an argument thunk: declared once,
/// materialized per use site.
pub struct ResourceTemplate<R: Resource> {
    pub(crate) def: ResourceDef<R>,
    pub(crate) args: Rc<dyn Fn() -> R::Args>,
}

impl<R: Resource> Clone for ResourceTemplate<R> {
    fn clone(&self) -> Self {
        Self {
            def: self.def.clone(),
            args: self.args.clone(),
        }
    }
}

impl<R: Resource> ResourceTemplate<R> {
    pub fn definition(&self) -> &ResourceDef<R> {
        &self.def
    }
}
